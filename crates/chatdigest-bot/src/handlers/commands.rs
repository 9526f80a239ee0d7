use chatdigest_digest::DigestOutcome;
use chrono::Utc;

use crate::error::{BotError, BotResult};
use crate::state::AppState;
use crate::telegram::Message;

const HELP_TEXT: &str = "Привет! Я бот для создания саммари обсуждений в чатах и топиках.\n\n\
Основные команды:\n\
/set_summary_topic - установить топик для отправки саммари\n\
/set_interval - установить интервал саммари (в минутах)\n\
/summary_on - включить автоматическое саммари\n\
/summary_off - выключить автоматическое саммари\n\
/select_topic - включить топик в саммари (без аргумента - текущий)\n\
/unselect_topic - исключить топик из саммари\n\
/summary_now - создать саммари сейчас (только для админов)";

const EMPTY_DIGEST_REPLY: &str = "Нет сообщений за последние 24 часа для саммари.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    SetSummaryTopic(Option<String>),
    SetInterval(Option<String>),
    SummaryOn,
    SummaryOff,
    SelectTopic(Option<String>),
    UnselectTopic(Option<String>),
    SummaryNow,
}

impl Command {
    /// Recognize a bot command; a `@botname` suffix is ignored.
    /// Unknown commands are `None` and get ingested like any text.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or(head);
        let arg = (!args.is_empty()).then(|| args.to_string());

        let command = match name {
            "start" => Self::Start,
            "set_summary_topic" => Self::SetSummaryTopic(arg),
            "set_interval" => Self::SetInterval(arg),
            "summary_on" => Self::SummaryOn,
            "summary_off" => Self::SummaryOff,
            "select_topic" => Self::SelectTopic(arg),
            "unselect_topic" => Self::UnselectTopic(arg),
            "summary_now" => Self::SummaryNow,
            _ => return None,
        };
        Some(command)
    }
}

/// Execute a command and reply in the thread it came from
pub async fn handle(state: &AppState, message: &Message, command: Command) {
    let chat_id = message.chat.id;
    let reply = match execute(state, message, &command).await {
        Ok(reply) => reply,
        Err(e) => {
            match &e {
                BotError::Backend(inner) => {
                    tracing::error!(conversation_id = chat_id, command = ?command, error = %inner, "Command failed")
                }
                _ => tracing::info!(conversation_id = chat_id, command = ?command, reason = %e, "Command rejected"),
            }
            Some(e.reply_text().to_string())
        }
    };

    let Some(reply) = reply else {
        return;
    };
    if let Err(e) = state
        .telegram
        .send_message(chat_id, &reply, message.message_thread_id, Some(message.message_id), false)
        .await
    {
        tracing::error!(conversation_id = chat_id, error = %e, "Failed to send command reply");
    }
}

/// `Ok(None)` means the command produced its own output
pub async fn execute(state: &AppState, message: &Message, command: &Command) -> BotResult<Option<String>> {
    let chat_id = message.chat.id;
    let persist = &state.persist;

    match command {
        Command::Start => Ok(Some(HELP_TEXT.to_string())),
        Command::SetSummaryTopic(arg) => {
            let topic_id = parse_thread_id(
                arg.as_deref(),
                "Укажите ID топика или 0 для основного чата. Пример: /set_summary_topic 12345",
                "Ошибка: не удалось установить топик. Пример: /set_summary_topic 12345",
            )?;
            persist.set_summary_topic(chat_id, topic_id).await?;
            tracing::info!(conversation_id = chat_id, topic_id, "Summary topic set");
            Ok(Some(format!("Топик для саммари установлен: {}", topic_id)))
        }
        Command::SetInterval(arg) => {
            let raw = arg.as_deref().ok_or(BotError::Configuration {
                reply: "Укажите интервал в минутах. Пример: /set_interval 60",
            })?;
            let minutes = raw
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or(BotError::Configuration {
                    reply: "Ошибка: не удалось установить интервал. Пример: /set_interval 60",
                })?;
            persist.set_summary_interval(chat_id, minutes).await?;
            tracing::info!(conversation_id = chat_id, minutes, "Summary interval set");
            Ok(Some(format!("Интервал саммари установлен: {} минут", minutes)))
        }
        Command::SummaryOn => {
            persist.set_summary_enabled(chat_id, true).await?;
            tracing::info!(conversation_id = chat_id, "Summary enabled");
            Ok(Some("Саммари включено.".to_string()))
        }
        Command::SummaryOff => {
            persist.set_summary_enabled(chat_id, false).await?;
            tracing::info!(conversation_id = chat_id, "Summary disabled");
            Ok(Some("Саммари выключено.".to_string()))
        }
        Command::SelectTopic(arg) => {
            let thread_id = match arg.as_deref() {
                None => message.thread_id(),
                raw => parse_thread_id(
                    raw,
                    "",
                    "Ошибка: не удалось выбрать топик. Пример: /select_topic 12345",
                )?,
            };
            persist.select_topic(chat_id, thread_id).await?;
            tracing::info!(conversation_id = chat_id, thread_id, "Topic selected for digests");
            Ok(Some(format!("Топик {} добавлен в саммари.", thread_id)))
        }
        Command::UnselectTopic(arg) => {
            let thread_id = match arg.as_deref() {
                None => message.thread_id(),
                raw => parse_thread_id(
                    raw,
                    "",
                    "Ошибка: не удалось исключить топик. Пример: /unselect_topic 12345",
                )?,
            };
            persist.unselect_topic(chat_id, thread_id).await?;
            tracing::info!(conversation_id = chat_id, thread_id, "Topic unselected from digests");
            Ok(Some(format!("Топик {} исключён из саммари.", thread_id)))
        }
        Command::SummaryNow => summary_now(state, message).await,
    }
}

async fn summary_now(state: &AppState, message: &Message) -> BotResult<Option<String>> {
    let chat_id = message.chat.id;
    let user_id = message
        .from
        .as_ref()
        .map(|user| user.id)
        .ok_or(BotError::PermissionDenied { user_id: 0 })?;

    let member = state
        .telegram
        .get_chat_member(chat_id, user_id)
        .await
        .map_err(BotError::AdminCheck)?;
    if !member.is_admin() {
        return Err(BotError::PermissionDenied { user_id });
    }

    tracing::info!(conversation_id = chat_id, user_id, "Manual digest requested");
    match state.runner.run_manual(chat_id, Utc::now()).await? {
        DigestOutcome::Empty => Ok(Some(EMPTY_DIGEST_REPLY.to_string())),
        DigestOutcome::Delivered(_) => Ok(None),
    }
}

/// Non-negative thread id; 0 is the main chat
fn parse_thread_id(arg: Option<&str>, missing: &'static str, invalid: &'static str) -> BotResult<i64> {
    let raw = arg.ok_or(BotError::Configuration { reply: missing })?;
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or(BotError::Configuration { reply: invalid })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(
            Command::parse("/set_interval 30"),
            Some(Command::SetInterval(Some("30".to_string())))
        );
        assert_eq!(
            Command::parse("/set_summary_topic@digest_bot   12 "),
            Some(Command::SetSummaryTopic(Some("12".to_string())))
        );
        assert_eq!(Command::parse("/select_topic"), Some(Command::SelectTopic(None)));
        assert_eq!(Command::parse("/summary_now@digest_bot"), Some(Command::SummaryNow));
    }

    #[test]
    fn test_non_commands() {
        assert_eq!(Command::parse("hello /start"), None);
        assert_eq!(Command::parse("/unknown arg"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_parse_thread_id() {
        assert_eq!(parse_thread_id(Some("0"), "m", "i").unwrap(), 0);
        assert!(matches!(
            parse_thread_id(None, "m", "i"),
            Err(BotError::Configuration { reply: "m" })
        ));
        assert!(matches!(
            parse_thread_id(Some("-3"), "m", "i"),
            Err(BotError::Configuration { reply: "i" })
        ));
        assert!(matches!(
            parse_thread_id(Some("abc"), "m", "i"),
            Err(BotError::Configuration { reply: "i" })
        ));
    }
}
