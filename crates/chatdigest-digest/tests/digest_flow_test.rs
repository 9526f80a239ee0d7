use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chatdigest_digest::{
    ChatGateway, ChatInfo, DigestOutcome, DigestRunner, DigestScheduler, Renderer, Summarizer,
    DEFAULT_MESSAGE_CEILING,
};
use chatdigest_llm::{ChatClient, ChatGenerator, OpenAIClient};
use chatdigest_persist::PersistClient;
use chrono::{Duration, Utc};
use serde_json::json;

#[derive(Default)]
struct Outbox {
    forum: bool,
    sent: Mutex<Vec<(i64, Option<i64>, String)>>,
}

#[async_trait]
impl ChatGateway for Outbox {
    async fn chat_info(&self, _conversation_id: i64) -> Result<ChatInfo> {
        Ok(ChatInfo { is_forum: self.forum })
    }

    async fn deliver(&self, conversation_id: i64, thread_id: Option<i64>, html: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((conversation_id, thread_id, html.to_string()));
        Ok(())
    }
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4-turbo-preview",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

async fn runner(server_url: String, outbox: Arc<Outbox>) -> DigestRunner {
    let client: Arc<dyn ChatClient> =
        Arc::new(OpenAIClient::new("test-key").unwrap().with_base_url(server_url));
    let generator = Arc::new(ChatGenerator::new(client, "gpt-4-turbo-preview"));
    let persist = PersistClient::builder().build().await.unwrap();
    DigestRunner::new(persist, Summarizer::new(generator), Renderer::default(), outbox)
}

#[tokio::test]
async fn test_scheduled_digest_through_openai() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Безопасность <доступа> & пароли"))
        .expect(1)
        .create_async()
        .await;

    let outbox = Arc::new(Outbox::default());
    let runner = Arc::new(runner(server.url(), outbox.clone()).await);
    let now = Utc::now();
    for text in [
        "сменили пароль",
        "ссылка https://wiki.local/sec",
        "ещё раз https://wiki.local/sec",
        "доки https://docs.local/?v=1&lang=ru",
    ] {
        runner
            .persist()
            .save_message(100, 0, "ops", text, now - Duration::minutes(20))
            .await
            .unwrap();
    }

    let report = DigestScheduler::new(runner.clone()).tick(now).await.unwrap();

    assert_eq!(report.delivered, 1);
    mock.assert_async().await;

    let sent = outbox.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    let (conversation_id, thread_id, text) = &sent[0];
    assert_eq!((*conversation_id, *thread_id), (100, None));
    assert!(text.contains("🔒 Безопасность &lt;доступа&gt; &amp; пароли (4 сообщений)"));
    assert!(!text.contains("&amp;lt;"));
    assert!(text.contains("🔗 https://docs.local/?v=1&amp;lang=ru"));
    assert!(!text.contains("&amp;amp;"));
    assert_eq!(text.matches("🔗 https://wiki.local/sec").count(), 1);
    assert!(text.chars().count() <= DEFAULT_MESSAGE_CEILING);
}

#[tokio::test]
async fn test_forum_summary_topic_merges_threads() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Разработка бота"))
        .expect(2)
        .create_async()
        .await;

    let outbox = Arc::new(Outbox {
        forum: true,
        ..Default::default()
    });
    let runner = runner(server.url(), outbox.clone()).await;
    let persist = runner.persist();
    let chat = -1001234567890;
    let now = Utc::now();
    persist.save_message(chat, 5, "a", "x", now).await.unwrap();
    persist.save_message(chat, 6, "b", "y", now).await.unwrap();
    persist.save_message(chat, 6, "b", "z", now).await.unwrap();
    persist.set_summary_topic(chat, 77).await.unwrap();

    let outcome = runner.run_manual(chat, now).await.unwrap();

    assert_eq!(outcome, DigestOutcome::Delivered(1));
    let sent = outbox.sent.lock().unwrap().clone();
    assert_eq!(sent[0].1, Some(77));
    let text = &sent[0].2;
    let first = text.find("https://t.me/c/1234567890/6").unwrap();
    let second = text.find("https://t.me/c/1234567890/5").unwrap();
    assert!(first < second);
}
