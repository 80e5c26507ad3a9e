use std::sync::Arc;

use quill_llm::{ChatMessage, CompletionClient, CompletionRequest, OpenAiCompatClient};
use serde::Serialize;

use crate::error::TransformError;
use crate::settings::{AiSettings, SettingsSource};

#[derive(Debug, Serialize, PartialEq)]
pub struct TransformResult {
    pub answer: String,
}

/// Forwards a piece of text and an instruction to the configured completion
/// endpoint and returns the transformed text.
#[derive(Clone)]
pub struct TransformService {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl TransformService {
    /// Validates the AI settings and binds a completion client to the
    /// configured endpoint. Validation happens here, once per instance,
    /// never on the call path.
    pub fn from_settings(source: &dyn SettingsSource) -> Result<Self, TransformError> {
        let settings = AiSettings::from_source(source)?;
        let client = OpenAiCompatClient::new(settings.base_url, settings.api_key);

        Ok(Self::with_client(settings.model, Arc::new(client)))
    }

    pub fn with_client(model: impl Into<String>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Single-turn completion: the instruction goes in as the system message,
    /// the text to transform as the user message. Client failures propagate
    /// unchanged; a response without usable content is its own error.
    pub async fn transform(
        &self,
        text: &str,
        prompt: &str,
    ) -> Result<TransformResult, TransformError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(prompt), ChatMessage::user(text)],
        };

        let response = self.client.create_completion(request).await?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(TransformError::EmptyResponse)?;

        Ok(TransformResult { answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quill_llm::{Choice, CompletionError, CompletionResponse, ResponseMessage};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::settings::{AI_API_KEY, AI_BASE_URL, AI_MODEL};

    struct FakeSettings(HashMap<String, String>);

    impl FakeSettings {
        fn with_keys(keys: &[&str]) -> Self {
            let values = [
                (AI_BASE_URL, "http://example.com"),
                (AI_API_KEY, "test-key"),
                (AI_MODEL, "test-model"),
            ];
            Self(
                values
                    .iter()
                    .filter(|(key, _)| keys.contains(key))
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl SettingsSource for FakeSettings {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    /// Returns a canned reply and counts invocations.
    struct MockClient {
        reply: Result<CompletionResponse, String>,
        calls: AtomicUsize,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl MockClient {
        fn replying(response: CompletionResponse) -> Self {
            Self {
                reply: Ok(response),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn create_completion(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(request);

            match &self.reply {
                Ok(response) => Ok(response.clone()),
                Err(message) => Err(CompletionError::Api(message.clone())),
            }
        }
    }

    fn response_with_content(content: Option<&str>) -> CompletionResponse {
        CompletionResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: content.map(str::to_string),
                },
            }],
        }
    }

    fn service_with(client: Arc<MockClient>) -> TransformService {
        TransformService::with_client("test-model", client)
    }

    #[test]
    fn construction_fails_when_any_setting_is_missing() {
        let cases = [
            [AI_API_KEY, AI_MODEL],
            [AI_BASE_URL, AI_MODEL],
            [AI_BASE_URL, AI_API_KEY],
        ];

        for remaining in cases {
            let error = TransformService::from_settings(&FakeSettings::with_keys(&remaining))
                .err()
                .expect("construction must fail");
            assert!(error.to_string().contains("AI configuration not set"));
        }
    }

    #[test]
    fn construction_succeeds_with_full_configuration() {
        let settings = FakeSettings::with_keys(&[AI_BASE_URL, AI_API_KEY, AI_MODEL]);
        assert!(TransformService::from_settings(&settings).is_ok());
    }

    #[tokio::test]
    async fn transform_propagates_client_errors() {
        let client = Arc::new(MockClient::failing("Mocked client error"));
        let service = service_with(client);

        let error = service.transform("hello", "prompt").await.unwrap_err();
        assert!(matches!(error, TransformError::Remote(_)));
        assert!(error.to_string().contains("Mocked client error"));
    }

    #[tokio::test]
    async fn transform_rejects_null_answer_content() {
        let client = Arc::new(MockClient::replying(response_with_content(None)));
        let service = service_with(client);

        let error = service.transform("hello", "prompt").await.unwrap_err();
        assert!(matches!(error, TransformError::EmptyResponse));
        assert!(error
            .to_string()
            .contains("AI response does not contain an answer"));
    }

    #[tokio::test]
    async fn transform_rejects_response_without_choices() {
        let client = Arc::new(MockClient::replying(CompletionResponse { choices: vec![] }));
        let service = service_with(client);

        let error = service.transform("hello", "prompt").await.unwrap_err();
        assert!(error
            .to_string()
            .contains("AI response does not contain an answer"));
    }

    #[tokio::test]
    async fn transform_returns_first_choice_content() {
        let client = Arc::new(MockClient::replying(response_with_content(Some("Salut"))));
        let service = service_with(client);

        let result = service.transform("hello", "prompt").await.unwrap();
        assert_eq!(
            result,
            TransformResult {
                answer: "Salut".to_string()
            }
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "answer": "Salut" })
        );
    }

    #[tokio::test]
    async fn transform_builds_a_single_turn_request() {
        let client = Arc::new(MockClient::replying(response_with_content(Some("ok"))));
        let service = service_with(client.clone());

        service.transform("hello", "make it formal").await.unwrap();

        let request = client.seen.lock().unwrap().take().unwrap();
        assert_eq!(request.model, "test-model");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "make it formal");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "hello");
    }

    #[tokio::test]
    async fn transform_calls_the_client_once_per_invocation() {
        let client = Arc::new(MockClient::replying(response_with_content(Some("Salut"))));
        let service = service_with(client.clone());

        let first = service.transform("hello", "prompt").await.unwrap();
        let second = service.transform("hello", "prompt").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }
}
