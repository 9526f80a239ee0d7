pub mod config;
pub mod error;
pub mod handlers;
pub mod polling;
pub mod state;
pub mod telegram;
