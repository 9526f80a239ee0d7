use chatdigest_llm::types::ContentPart;
use chatdigest_llm::{Content, Message};

#[test]
fn test_content_from_str() {
    let content: Content = "Test".into();
    assert_eq!(content, Content::Text("Test".to_string()));
    assert_eq!(content.to_plain_text(), "Test");
}

#[test]
fn test_content_parts_flatten() {
    let content = Content::Parts(vec![
        ContentPart::Text { text: "Релизы ".to_string() },
        ContentPart::Text { text: "и деплой".to_string() },
    ]);
    assert_eq!(content.to_plain_text(), "Релизы и деплой");
    assert!(!content.is_empty());
    assert!(Content::Parts(vec![]).is_empty());
}

#[test]
fn test_message_serialization() {
    let json = serde_json::to_value(Message::human("Hello")).unwrap();
    assert_eq!(json["role"], "user");
    assert_eq!(json["content"], "Hello");

    let json = serde_json::to_value(Message::system("Be brief")).unwrap();
    assert_eq!(json["role"], "system");
}
