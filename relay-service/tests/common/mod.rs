use relay_service::config::{GeminiSettings, PromptLogSettings, RelayConfig};
use relay_service::models::ResponseRecord;
use relay_service::startup::Application;
use secrecy::Secret;
use serde_json::{Value, json};
use service_core::config::Config;
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PRIMARY_MODEL: &str = "gemini-primary";
pub const FALLBACK_MODEL: &str = "gemini-fallback";
pub const TEST_API_KEY: &str = "test-api-key";

pub struct TestApp {
    pub address: String,
    pub gemini: MockServer,
    pub log_path: PathBuf,
    _log_dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let gemini = MockServer::start().await;
        let log_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let log_path = log_dir.path().join("data.json");

        let config = RelayConfig {
            common: Config {
                port: 0, // Random port
            },
            gemini: GeminiSettings {
                api_key: Secret::new(TEST_API_KEY.to_string()),
                primary_model: PRIMARY_MODEL.to_string(),
                fallback_model: FALLBACK_MODEL.to_string(),
                api_base_url: gemini.uri(),
            },
            prompt_log: PromptLogSettings {
                path: log_path.clone(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            gemini,
            log_path,
            _log_dir: log_dir,
        }
    }

    /// POST a JSON body to /generate_response.
    pub async fn post_generate(&self, body: &Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/generate_response", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Respond 200 to model lookups for the given model.
    pub async fn mock_model_available(&self, model: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/models/{}", model)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": format!("models/{}", model)
            })))
            .mount(&self.gemini)
            .await;
    }

    /// Respond 404 to model lookups for the given model.
    pub async fn mock_model_missing(&self, model: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/models/{}", model)))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": 404, "message": format!("Model {} not found", model) }
            })))
            .mount(&self.gemini)
            .await;
    }

    /// Respond to generation requests for the given model with the given text.
    pub async fn mock_generation(&self, model: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", model)))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(text)))
            .mount(&self.gemini)
            .await;
    }

    /// Raw bytes of the prompt log file.
    pub fn raw_log(&self) -> String {
        std::fs::read_to_string(&self.log_path).expect("Failed to read log file")
    }

    /// Parsed records from the prompt log file.
    pub fn logged_records(&self) -> Vec<ResponseRecord> {
        serde_json::from_str(&self.raw_log()).expect("Log file is not valid JSON")
    }

    /// Overwrite the prompt log file.
    pub fn write_raw_log(&self, contents: &str) {
        std::fs::write(&self.log_path, contents).expect("Failed to write log file");
    }
}

/// A minimal Gemini generateContent response body.
pub fn gemini_response(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                },
                "finishReason": "STOP"
            }
        ]
    })
}
