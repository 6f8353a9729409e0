//! HTTP backend for a live FactoryOS API gateway.
//!
//! Non-2xx responses are not transport errors here: the body is read and
//! turned into [`Error::Api`] so callers can inspect the server's message
//! (e.g. "already exists").

use crate::backend::{Backend, Method};
use crate::error::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Default address of a local API gateway.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Blocking HTTP backend.
///
/// # Example
///
/// ```no_run
/// use factoryos::backend::http::HttpBackend;
/// use factoryos::backend::{Backend, Method};
///
/// let backend = HttpBackend::new("http://localhost:4000");
/// let health = backend.send(Method::Get, "/api/health", None, None).unwrap();
/// println!("{health}");
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL, without trailing slash.
    base_url: String,
}

impl HttpBackend {
    /// Create a backend using ureq's default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, None)
    }

    /// Create a backend with an overall per-request timeout.
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        let base_url: String = base_url.into();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Attach the common headers and, when present, the bearer token.
fn with_headers<B>(
    request: ureq::RequestBuilder<B>,
    token: Option<&str>,
) -> ureq::RequestBuilder<B> {
    let request = request.header("Accept", "application/json");
    match token {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}

impl Backend for HttpBackend {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value> {
        let url = self.url(path);
        log::debug!("{method} {url}");

        let result = match method {
            Method::Get => with_headers(self.agent.get(&url), token).call(),
            Method::Post => {
                let request = with_headers(self.agent.post(&url), token);
                match body {
                    Some(body) => request.send_json(body),
                    None => request.send_empty(),
                }
            }
            Method::Patch => {
                let request = with_headers(self.agent.patch(&url), token);
                match body {
                    Some(body) => request.send_json(body),
                    None => request.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| Error::Unreachable {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        log::trace!("{method} {url} -> {status}: {text}");

        if !(200..300).contains(&status) {
            return Err(Error::from_status(status, &text));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer a single request on a local port with `status` and a JSON body.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_url() {
        let backend = HttpBackend::new("http://localhost:4000");
        assert_eq!(
            backend.url("/api/v1/machines"),
            "http://localhost:4000/api/v1/machines"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://factory.local:4000/");
        assert_eq!(backend.base_url(), "http://factory.local:4000");
        assert_eq!(
            backend.url("/api/health"),
            "http://factory.local:4000/api/health"
        );
    }

    #[test]
    fn test_default_impl() {
        let backend = HttpBackend::default();
        assert_eq!(backend.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_conflict_status_becomes_ignorable_error() {
        let url = serve_once("409 Conflict", r#"{"error":"Username already exists"}"#);
        let backend = HttpBackend::with_timeout(url, Some(Duration::from_secs(5)));

        let err = backend
            .send(
                Method::Post,
                "/api/v1/auth/register",
                Some(&json!({"username": "amit.patel"})),
                Some("token"),
            )
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: 409, .. }));
        assert!(err.to_string().starts_with("HTTP 409: "));
        assert!(err.says_already_exists());
        assert!(err.is_ignorable());
    }

    #[test]
    fn test_success_body_is_parsed() {
        let url = serve_once("201 Created", r#"{"success":true,"plan":{"plan_id":7}}"#);
        let backend = HttpBackend::with_timeout(url, Some(Duration::from_secs(5)));

        let value = backend
            .send(Method::Post, "/api/v1/plans", Some(&json!({})), Some("token"))
            .unwrap();

        assert_eq!(value["plan"]["plan_id"], 7);
    }

    #[test]
    fn test_unreachable_host() {
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let backend = HttpBackend::with_timeout("http://127.0.0.1:9", Some(Duration::from_secs(2)));
        let err = backend
            .send(Method::Get, "/api/health", None, None)
            .unwrap_err();
        assert!(matches!(err, Error::Unreachable { .. }));
    }
}
