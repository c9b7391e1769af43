//! Client for the chat-completions service.

use crate::error::{GeneratorError, Result};
use crate::retry::RetryPolicy;
use crate::transport::{ReqwestTransport, Transport};
use querysmith_core::generate::build_request;
use querysmith_core::{parse_response, Catalog, GeneratorConfig, RawPart};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A model offered by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

type SleepFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Turns prompts into raw parts by asking a chat model.
pub struct GeneratorClient<T: Transport = ReqwestTransport> {
    transport: T,
    api_base: String,
    model: String,
    generation: RetryPolicy,
    lookup: RetryPolicy,
    sleep: SleepFn,
}

impl GeneratorClient<ReqwestTransport> {
    /// Build a client from config, reading the API key from the environment.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| GeneratorError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;
        Ok(Self::with_transport(config, ReqwestTransport::new(api_key)))
    }
}

impl<T: Transport> GeneratorClient<T> {
    pub fn with_transport(config: &GeneratorConfig, transport: T) -> Self {
        GeneratorClient {
            transport,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            generation: RetryPolicy::generation(config),
            lookup: RetryPolicy::lookup(config),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the pause between retries.
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// List the models the service offers.
    #[instrument(skip(self))]
    pub fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.api_base);
        let response = self
            .lookup
            .execute(|timeout| self.transport.get(&url, timeout), &*self.sleep)?;

        let list: ModelList = serde_json::from_str(&response.body)
            .map_err(|e| GeneratorError::invalid_response(format!("model list: {}", e)))?;
        debug!(count = list.data.len(), "Fetched model list");
        Ok(list.data)
    }

    /// Ask the model for a part list for `prompt`.
    ///
    /// A reply that cannot be read as a part list yields the prompt as a
    /// single text part. Transport and service failures are errors.
    #[instrument(skip(self, catalog), fields(model = %self.model))]
    pub fn generate(&self, prompt: &str, catalog: &Catalog) -> Result<Vec<RawPart>> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = build_request(&self.model, prompt, catalog);

        let response = self.generation.execute(
            |timeout| self.transport.post_json(&url, &body, timeout),
            &*self.sleep,
        )?;

        let content = completion_content(&response.body)?;
        let parts = parse_response(&content).into_parts(prompt);
        info!(parts = parts.len(), "Generated query parts");
        Ok(parts)
    }
}

/// Pull `choices[0].message.content` out of a completion body.
fn completion_content(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GeneratorError::invalid_response(format!("completion: {}", e)))?;

    match value["choices"][0]["message"]["content"].as_str() {
        Some(content) => Ok(content.to_string()),
        None => {
            warn!("Completion has no message content");
            Err(GeneratorError::invalid_response(
                "completion has no message content",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpResponse, TransportError};
    use parking_lot::Mutex;
    use querysmith_core::Language;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Arc;

    type Outcome = std::result::Result<HttpResponse, TransportError>;

    #[derive(Default)]
    struct Recorded {
        outcomes: VecDeque<Outcome>,
        urls: Vec<String>,
        bodies: Vec<Value>,
        timeouts: Vec<Duration>,
    }

    #[derive(Clone, Default)]
    struct ScriptedTransport(Arc<Mutex<Recorded>>);

    impl ScriptedTransport {
        fn new(outcomes: Vec<Outcome>) -> Self {
            let recorded = Recorded {
                outcomes: outcomes.into(),
                ..Default::default()
            };
            ScriptedTransport(Arc::new(Mutex::new(recorded)))
        }

        fn next(&self, url: &str, body: Option<&Value>, timeout: Duration) -> Outcome {
            let mut rec = self.0.lock();
            rec.urls.push(url.to_string());
            if let Some(body) = body {
                rec.bodies.push(body.clone());
            }
            rec.timeouts.push(timeout);
            rec.outcomes
                .pop_front()
                .unwrap_or(Err(TransportError::Network("script exhausted".into())))
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str, timeout: Duration) -> Outcome {
            self.next(url, None, timeout)
        }

        fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Outcome {
            self.next(url, Some(body), timeout)
        }
    }

    fn completion(content: &str) -> HttpResponse {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        });
        HttpResponse::new(200, body.to_string())
    }

    fn client(transport: ScriptedTransport) -> GeneratorClient<ScriptedTransport> {
        GeneratorClient::with_transport(&GeneratorConfig::default(), transport).with_sleep(|_| {})
    }

    #[test]
    fn test_generate_parses_parts() {
        let transport = ScriptedTransport::new(vec![Ok(completion(
            r#"[{"type":"text","value":"marketing"},{"type":"operator","value":"harvard.edu","operatorId":"site"}]"#,
        ))]);
        let catalog = Catalog::builtin(Language::En);

        let parts = client(transport.clone())
            .generate("marketing site:harvard.edu", &catalog)
            .unwrap();

        assert_eq!(
            parts,
            vec![
                RawPart::text("marketing"),
                RawPart::operator("site", "harvard.edu")
            ]
        );

        let rec = transport.0.lock();
        assert_eq!(rec.urls, vec!["https://openrouter.ai/api/v1/chat/completions"]);
        assert_eq!(rec.timeouts, vec![Duration::from_secs(30)]);
        assert_eq!(rec.bodies[0]["model"], "openai/gpt-oss-20b:free");
    }

    #[test]
    fn test_malformed_reply_falls_back_to_prompt() {
        let transport = ScriptedTransport::new(vec![Ok(completion("I cannot help with that."))]);
        let catalog = Catalog::builtin(Language::En);

        let parts = client(transport).generate("rust books", &catalog).unwrap();
        assert_eq!(parts, vec![RawPart::text("rust books")]);
    }

    #[test]
    fn test_generate_retries_server_errors() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(500, "")),
            Err(TransportError::Timeout),
            Ok(completion(r#"[{"type":"text","value":"ok"}]"#)),
        ]);
        let catalog = Catalog::builtin(Language::En);
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        let recorded = sleeps.clone();

        let parts = GeneratorClient::with_transport(&GeneratorConfig::default(), transport)
            .with_sleep(move |d| recorded.lock().push(d))
            .generate("ok", &catalog)
            .unwrap();

        assert_eq!(parts, vec![RawPart::text("ok")]);
        assert_eq!(
            *sleeps.lock(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn test_generate_client_error() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(401, "no key"))]);
        let catalog = Catalog::builtin(Language::En);

        let err = client(transport.clone())
            .generate("anything", &catalog)
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(transport.0.lock().urls.len(), 1);
    }

    #[test]
    fn test_completion_without_content() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, r#"{"choices":[]}"#))]);
        let catalog = Catalog::builtin(Language::En);

        let err = client(transport).generate("x", &catalog).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidResponse { .. }));
    }

    #[test]
    fn test_list_models() {
        let body = json!({
            "data": [
                {"id": "openai/gpt-oss-20b:free", "name": "gpt-oss-20b", "context_length": 131072},
                {"id": "other/model"}
            ]
        });
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Network("refused".into())),
            Ok(HttpResponse::new(200, body.to_string())),
        ]);

        let models = client(transport.clone()).list_models().unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name.as_deref(), Some("gpt-oss-20b"));
        assert_eq!(models[1].name, None);

        let rec = transport.0.lock();
        assert_eq!(rec.urls[0], "https://openrouter.ai/api/v1/models");
        assert!(rec.timeouts.iter().all(|t| *t == Duration::from_secs(10)));
    }

    #[test]
    fn test_set_model() {
        let mut c = client(ScriptedTransport::default());
        c.set_model("some/model");
        assert_eq!(c.model(), "some/model");
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = GeneratorConfig::default();
        config.api_key_env = "QUERYSMITH_TEST_KEY_THAT_IS_NOT_SET".to_string();

        let err = GeneratorClient::from_config(&config).err().unwrap();
        assert!(matches!(err, GeneratorError::MissingApiKey { .. }));
    }
}
