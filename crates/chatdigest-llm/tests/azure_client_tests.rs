use chatdigest_llm::{AzureConfig, AzureOpenAIClient, ChatClient, ChatOptions, ChatRequest, Message};
use mockito::Matcher;
use serde_json::json;

#[test]
fn test_missing_fields_are_rejected() {
    let cases = [
        (AzureConfig::new("", "https://r.openai.azure.com", "v1"), "API key"),
        (AzureConfig::new("k", " ", "v1"), "Endpoint"),
        (AzureConfig::new("k", "https://r.openai.azure.com", ""), "API version"),
    ];

    for (config, field) in cases {
        let err = AzureOpenAIClient::new(config).unwrap_err();
        assert!(err.to_string().contains(field), "{} not mentioned in {}", field, err);
    }
}

#[tokio::test]
async fn test_chat_targets_deployment_with_api_key_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/openai/deployments/digest/chat/completions")
        .match_query(Matcher::UrlEncoded("api-version".into(), "2024-02-15-preview".into()))
        .match_header("api-key", "azure-key")
        .match_body(Matcher::PartialJson(json!({ "max_tokens": 100 })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "Настройка доступа" },
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = AzureOpenAIClient::new(AzureConfig::new("azure-key", server.url(), "2024-02-15-preview")).unwrap();
    let request = ChatRequest::new("digest", vec![Message::human("hi")])
        .with_options(ChatOptions::new().max_tokens(100));

    let response = client.chat(request).await.unwrap();

    assert_eq!(response.content.as_deref(), Some("Настройка доступа"));
    mock.assert_async().await;
}
