use chatdigest_llm::{ChatOptions, ChatRequest, Message};

#[test]
fn test_chat_request_creation() {
    let request = ChatRequest::new("gpt-4o-mini", vec![Message::human("Hello")]);

    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.options, ChatOptions::default());
}

#[test]
fn test_chat_request_with_options() {
    let options = ChatOptions::new().temperature(0.7).max_tokens(100);
    let request = ChatRequest::new("gpt-4o-mini", vec![Message::human("Hello")]).with_options(options);

    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_tokens, Some(100));
}

#[test]
fn test_chat_options_default() {
    let options = ChatOptions::default();
    assert_eq!(options.temperature, None);
    assert_eq!(options.max_tokens, None);
}
