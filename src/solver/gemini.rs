//! Solver backed by the Gemini `generateContent` REST endpoint.

use super::{Solver, SolverError, SYSTEM_INSTRUCTION};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Sampling temperature sent with every query.
pub const TEMPERATURE: f64 = 0.1;

/// Body of a `generateContent` call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined.
    fn answer(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Build the request for one query: the calculator instruction, the query
/// as a single user turn and a low temperature.
pub fn request_body(query: &str) -> GenerateRequest {
    GenerateRequest {
        system_instruction: Content::text(None, SYSTEM_INSTRUCTION),
        contents: vec![Content::text(Some("user"), query)],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

/// Asks a hosted Gemini model.
///
/// The key is read from `api_key_env` on every query. When it is unset
/// the query fails with `MissingCredentials` before any request is made.
#[derive(Clone, Debug)]
pub struct GeminiSolver {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key_env: String,
}

impl GeminiSolver {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key_env: api_key_env.into(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn api_key(&self) -> Result<String, SolverError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(SolverError::MissingCredentials {
                variable: self.api_key_env.clone(),
            }),
        }
    }
}

#[async_trait]
impl Solver for GeminiSolver {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn solve(&self, query: &str) -> Result<String, SolverError> {
        let api_key = self.api_key()?;

        debug!(model = %self.model, "posting query");
        let response = self
            .http_client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request_body(query))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SolverError::Backend(format!("{status}: {}", body.trim())));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|error| SolverError::Backend(format!("unexpected response: {error}")))?;
        parsed.answer().ok_or(SolverError::EmptyAnswer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    /// Answer a single HTTP request with `status` and `body`; the task
    /// yields the raw request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let task = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, task)
    }

    fn local_solver(endpoint: String, api_key_env: &str) -> GeminiSolver {
        GeminiSolver {
            http_client: reqwest::Client::builder().no_proxy().build().unwrap(),
            ..GeminiSolver::new(endpoint, DEFAULT_MODEL, api_key_env)
        }
    }

    #[test]
    fn request_carries_instruction_and_temperature() {
        let body = serde_json::to_value(request_body("6 times 7")).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            SYSTEM_INSTRUCTION
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "6 times 7");
        assert_eq!(body["generationConfig"]["temperature"], 0.1);
    }

    #[test]
    fn answer_joins_first_candidate_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"4"},{"text":"2\n"}]}},
                {"content":{"parts":[{"text":"7"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.answer().as_deref(), Some("42"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.answer(), None);
    }

    #[tokio::test]
    async fn missing_key_fails_before_request() {
        let solver = GeminiSolver::new(
            "http://127.0.0.1:9",
            DEFAULT_MODEL,
            "KEYCALC_TEST_GEMINI_UNSET_KEY",
        );

        let result = solver.solve("1 + 1").await;
        assert!(
            matches!(result, Err(SolverError::MissingCredentials { variable }) if variable == "KEYCALC_TEST_GEMINI_UNSET_KEY")
        );
    }

    #[tokio::test]
    async fn posts_query_and_reads_answer() {
        std::env::set_var("KEYCALC_TEST_GEMINI_KEY_OK", "secret");
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"42\n"}]}}]}"#,
        )
        .await;

        let solver = local_solver(endpoint, "KEYCALC_TEST_GEMINI_KEY_OK");
        assert_eq!(solver.solve("what is 6 times 7").await.unwrap(), "42");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /models/gemini-2.5-flash:generateContent "));
        assert!(request.to_lowercase().contains("x-goog-api-key: secret"));
        assert!(request.contains(r#""temperature":0.1"#));
        assert!(request.contains("what is 6 times 7"));
    }

    #[tokio::test]
    async fn error_status_is_a_backend_error() {
        std::env::set_var("KEYCALC_TEST_GEMINI_KEY_STATUS", "secret");
        let (endpoint, server) =
            serve_once("400 Bad Request", r#"{"error":{"message":"bad"}}"#).await;

        let solver = local_solver(endpoint, "KEYCALC_TEST_GEMINI_KEY_STATUS");
        let result = solver.solve("1 + 1").await;
        assert!(matches!(result, Err(SolverError::Backend(message)) if message.contains("400")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn no_candidates_is_an_empty_answer() {
        std::env::set_var("KEYCALC_TEST_GEMINI_KEY_EMPTY", "secret");
        let (endpoint, server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;

        let solver = local_solver(endpoint, "KEYCALC_TEST_GEMINI_KEY_EMPTY");
        assert!(matches!(
            solver.solve("1 + 1").await,
            Err(SolverError::EmptyAnswer)
        ));
        server.await.unwrap();
    }
}
