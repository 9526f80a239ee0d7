pub mod message;
pub mod registry;
pub mod settings;

pub use message::MongoMessageRepository;
pub use registry::MongoRegistryRepository;
pub use settings::MongoSettingsRepository;
