use std::future::Future;
use std::sync::Arc;

use advisor_common::openai::{ChatCompletionRequest, Message, OpenAiClient};
use tracing::info;

use crate::error::AdvisoryError;

pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant providing information on government policies.";
pub const SUMMARY_QUERY: &str = "Summarize this policy";

const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 1024;
const TOP_P: f32 = 1.0;

/// Answers a free-text query against a context string.
pub trait Advisor {
    fn ask(
        &self,
        query: &str,
        context: &str,
    ) -> impl Future<Output = Result<String, AdvisoryError>> + Send;
}

/// Advisor backed by an OpenAI-compatible chat-completion API.
///
/// One request per call with fixed sampling parameters. Identical calls are re-sent.
#[derive(Clone)]
pub struct AdvisoryClient {
    openai: Arc<OpenAiClient>,
    model: String,
}

impl AdvisoryClient {
    pub fn new(openai: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            openai,
            model: model.into(),
        }
    }

    pub fn build_request(&self, query: &str, context: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYSTEM_INSTRUCTION),
                Message::user(format!("Context: {context}\n\nQuestion: {query}")),
            ],
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
            top_p: Some(TOP_P),
            stream: Some(false),
        }
    }
}

impl Advisor for AdvisoryClient {
    async fn ask(&self, query: &str, context: &str) -> Result<String, AdvisoryError> {
        if !self.openai.has_api_key() {
            return Err(AdvisoryError::MissingApiKey);
        }

        let request = self.build_request(query, context);
        let response = self.openai.chat_completions(&request).await?;
        let text = response
            .first_content()
            .ok_or(AdvisoryError::EmptyResponse)?
            .to_string();

        info!(
            model = %self.model,
            total_tokens = response.usage.as_ref().and_then(|u| u.total_tokens),
            "advisory response received"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_common::openai::{OpenAiClientConfig, OpenAiClientError};
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base_url: String, api_key: Option<&str>) -> AdvisoryClient {
        let config = OpenAiClientConfig::new(base_url, api_key.map(str::to_string), None, 1024);
        let openai = OpenAiClient::new(config).expect("client should build");
        AdvisoryClient::new(Arc::new(openai), "llama3-8b-8192")
    }

    #[test]
    fn request_carries_fixed_parameters() {
        let advisor = client("http://localhost:1".to_string(), Some("k"));
        let body = serde_json::to_value(advisor.build_request("What is it?", "Scheme text"))
            .expect("serialize");
        assert_eq!(
            body,
            json!({
                "model": "llama3-8b-8192",
                "messages": [
                    {"role": "system", "content": SYSTEM_INSTRUCTION},
                    {"role": "user", "content": "Context: Scheme text\n\nQuestion: What is it?"}
                ],
                "temperature": 0.5,
                "max_tokens": 1024,
                "top_p": 1.0,
                "stream": false
            })
        );
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_a_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200);
            })
            .await;

        let err = client(server.base_url(), None)
            .ask(SUMMARY_QUERY, "details")
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::MissingApiKey));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .body_includes("Context: Covers tuition\\n\\nQuestion: Summarize this policy");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "A tuition scheme."}}],
                    "usage": {"total_tokens": 42}
                }));
            })
            .await;

        let advisor = client(server.base_url(), Some("k"));
        let text = advisor
            .ask(SUMMARY_QUERY, "Covers tuition")
            .await
            .expect("ask should succeed");
        assert_eq!(text, "A tuition scheme.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn identical_calls_are_not_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"content": "same"}}]
                }));
            })
            .await;

        let advisor = client(server.base_url(), Some("k"));
        for _ in 0..2 {
            advisor.ask("q", "c").await.expect("ask should succeed");
        }
        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn no_choices_is_empty_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let err = client(server.base_url(), Some("k"))
            .ask("q", "c")
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisoryError::EmptyResponse));
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429)
                    .json_body(json!({"error": {"message": "rate limited"}}));
            })
            .await;

        let err = client(server.base_url(), Some("k"))
            .ask("q", "c")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdvisoryError::Client(OpenAiClientError::Upstream { ref message, .. }) if message == "rate limited"
        ));
    }
}
