//! Theme store client
//!
//! Talks to the host's settings API. The host is the sole authority over
//! the theme list; everything this crate keeps locally is a cache of it.
//!
//! All three operations go through one request wrapper that attaches the
//! host headers, serializes JSON bodies, treats a bare textual `OK`
//! response as a no-payload success, and converts non-2xx responses into a
//! typed failure carrying the server's error message when parseable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[cfg(test)]
use mockall::automock;

use crate::error::SyncError;

/// Payload field every real host theme carries. Import validation rejects
/// blobs that lack it.
pub const THEME_MARKER_FIELD: &str = "main_text_color";

/// A theme as the host persists it: a unique name plus an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Globally unique identifier and the encoding surface for tags.
    pub name: String,

    /// Every other field the host defines. Preserved unmodified on rename.
    #[serde(flatten)]
    pub settings: serde_json::Map<String, Value>,
}

impl Theme {
    /// Copy of this theme under a different name, payload untouched.
    ///
    /// Rename is always copy-then-mutate-name, never a reconstruction.
    pub fn renamed(&self, new_name: &str) -> Theme {
        Theme {
            name: new_name.to_string(),
            settings: self.settings.clone(),
        }
    }

    /// Whether the payload carries the defining marker field.
    pub fn has_marker(&self) -> bool {
        self.settings.contains_key(THEME_MARKER_FIELD)
    }
}

/// The host's persistence API, as much of it as the engine depends on.
#[cfg_attr(test, automock)]
pub trait ThemeStore {
    /// Idempotent read of all persisted themes.
    fn list(&self) -> Result<Vec<Theme>, SyncError>;

    /// Upsert by name; overwrites an existing theme with the same name.
    fn save(&self, theme: &Theme) -> Result<(), SyncError>;

    /// Remove by exact name. Missing-on-server maps to [`SyncError::NotFound`].
    fn delete(&self, name: &str) -> Result<(), SyncError>;
}

/// HTTP response abstraction for testing
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Trait for HTTP operations (allows mocking)
#[cfg_attr(test, automock)]
pub trait HttpClient: Send + Sync {
    /// Send a POST request with JSON body
    fn post(&self, url: &str, headers: Vec<(String, String)>, body: String) -> Result<HttpResponse>;
}

/// Real HTTP client using ureq
#[derive(Default)]
pub struct UreqHttpClient;

impl HttpClient for UreqHttpClient {
    fn post(&self, url: &str, headers: Vec<(String, String)>, body: String) -> Result<HttpResponse> {
        let mut request = ureq::post(url);
        for (key, value) in &headers {
            request = request.set(key, value);
        }
        match request.send_string(&body) {
            Ok(response) => {
                let status = response.status();
                let body = response.into_string().context("Failed to read response body")?;
                Ok(HttpResponse { status, body })
            }
            // Non-2xx still has a body worth surfacing to the user.
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Ok(HttpResponse { status, body })
            }
            Err(err) => Err(err).context("HTTP POST failed"),
        }
    }
}

/// Theme store over the host's REST endpoints.
pub struct HttpStore<H: HttpClient = UreqHttpClient> {
    /// Host base URL, e.g. `http://127.0.0.1:8000`.
    base_url: String,

    /// Session token forwarded as `X-CSRF-Token` when present.
    token: Option<String>,

    /// HTTP client
    http: H,
}

impl HttpStore<UreqHttpClient> {
    /// Create a store client for the given host.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http: UreqHttpClient,
        }
    }
}

impl<H: HttpClient> HttpStore<H> {
    /// Create store with custom HTTP client (for testing)
    pub fn with_http_client(base_url: &str, token: Option<String>, http: H) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        }
    }

    fn build_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), "themetree".to_string()),
        ];
        if let Some(ref token) = self.token {
            headers.push(("X-CSRF-Token".to_string(), token.clone()));
        }
        headers
    }

    /// POST `body` to `/api/{endpoint}` and normalize the response.
    ///
    /// Returns `Value::Null` for empty or bare-`OK` bodies; otherwise the
    /// parsed JSON payload.
    fn request(&self, endpoint: &str, body: Value) -> Result<Value, SyncError> {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        crate::debug::log_api(endpoint, "->");

        let response = self
            .http
            .post(&url, self.build_headers(), body.to_string())
            .map_err(|err| SyncError::Transport(format!("{endpoint}: {err:#}")))?;

        crate::debug::log_api(endpoint, &format!("<- HTTP {}", response.status));

        if !(200..300).contains(&response.status) {
            return Err(Self::failure_from(endpoint, &response));
        }

        let text = response.body.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("ok") {
            return Ok(Value::Null);
        }

        serde_json::from_str(text)
            .map_err(|err| SyncError::Transport(format!("{endpoint}: unparseable response: {err}")))
    }

    /// Best error we can extract from a non-2xx response: the server's
    /// `error` field, else the raw body, else the HTTP status.
    fn failure_from(endpoint: &str, response: &HttpResponse) -> SyncError {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .or_else(|| {
                let raw = response.body.trim();
                (!raw.is_empty()).then(|| raw.to_string())
            })
            .unwrap_or_else(|| format!("HTTP {}", response.status));

        if response.status == 404 {
            SyncError::NotFound(message)
        } else {
            SyncError::Transport(format!("{endpoint}: {message}"))
        }
    }
}

impl<H: HttpClient> ThemeStore for HttpStore<H> {
    fn list(&self) -> Result<Vec<Theme>, SyncError> {
        let settings = self.request("settings/get", json!({}))?;
        match settings.get("themes") {
            Some(themes) => serde_json::from_value(themes.clone())
                .map_err(|err| SyncError::Transport(format!("settings/get: bad themes list: {err}"))),
            // A host with no saved themes omits the key entirely.
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, theme: &Theme) -> Result<(), SyncError> {
        let body = serde_json::to_value(theme)
            .map_err(|err| SyncError::InvalidInput(format!("unserializable theme: {err}")))?;
        self.request("themes/save", body)?;
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), SyncError> {
        self.request("themes/delete", json!({ "name": name }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_json(name: &str) -> String {
        format!(
            r#"{{"name":"{name}","main_text_color":"rgba(220,220,210,1)","blur_strength":10}}"#
        )
    }

    #[test]
    fn test_theme_payload_survives_rename() {
        let theme: Theme = serde_json::from_str(&theme_json("[A] X")).unwrap();
        let renamed = theme.renamed("[B] X");

        assert_eq!(renamed.name, "[B] X");
        assert_eq!(renamed.settings, theme.settings);
        assert_eq!(
            renamed.settings.get("main_text_color").unwrap(),
            "rgba(220,220,210,1)"
        );
    }

    #[test]
    fn test_theme_flatten_roundtrip() {
        let theme: Theme = serde_json::from_str(&theme_json("Midnight")).unwrap();
        let back = serde_json::to_value(&theme).unwrap();

        assert_eq!(back.get("name").unwrap(), "Midnight");
        assert_eq!(back.get("blur_strength").unwrap(), 10);
    }

    #[test]
    fn test_theme_marker_detection() {
        let with_marker: Theme = serde_json::from_str(&theme_json("X")).unwrap();
        assert!(with_marker.has_marker());

        let without: Theme = serde_json::from_str(r#"{"name":"X","foo":1}"#).unwrap();
        assert!(!without.has_marker());
    }

    #[test]
    fn test_list_parses_themes() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .withf(|url: &str, _, _| url.ends_with("/api/settings/get"))
            .returning(|_, _, _| {
                Ok(HttpResponse {
                    status: 200,
                    body: format!(r#"{{"themes":[{}]}}"#, theme_json("[A] X")),
                })
            });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        let themes = store.list().unwrap();

        assert_eq!(themes.len(), 1);
        assert_eq!(themes[0].name, "[A] X");
    }

    #[test]
    fn test_list_missing_themes_key_is_empty() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().returning(|_, _, _| {
            Ok(HttpResponse {
                status: 200,
                body: r#"{"power_user":{}}"#.to_string(),
            })
        });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_bare_ok_response_is_success() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .withf(|url: &str, _, _| url.ends_with("/api/themes/delete"))
            .returning(|_, _, _| {
                Ok(HttpResponse {
                    status: 200,
                    body: "OK".to_string(),
                })
            });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        assert!(store.delete("[A] X").is_ok());
    }

    #[test]
    fn test_save_sends_flattened_payload() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .withf(|url: &str, _, body: &String| {
                url.ends_with("/api/themes/save")
                    && body.contains("main_text_color")
                    && body.contains("\"name\":\"[A] X\"")
            })
            .returning(|_, _, _| {
                Ok(HttpResponse {
                    status: 200,
                    body: String::new(),
                })
            });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        let theme: Theme = serde_json::from_str(&theme_json("[A] X")).unwrap();
        assert!(store.save(&theme).is_ok());
    }

    #[test]
    fn test_error_message_extracted_from_json_body() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().returning(|_, _, _| {
            Ok(HttpResponse {
                status: 500,
                body: r#"{"error":"disk full"}"#.to_string(),
            })
        });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        let err = store.delete("X").unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_error_falls_back_to_raw_body() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().returning(|_, _, _| {
            Ok(HttpResponse {
                status: 500,
                body: "Internal Server Error".to_string(),
            })
        });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        let err = store.delete("X").unwrap_err();
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_error_falls_back_to_status() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().returning(|_, _, _| {
            Ok(HttpResponse {
                status: 502,
                body: String::new(),
            })
        });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        let err = store.delete("X").unwrap_err();
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_missing_theme_maps_to_not_found() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().returning(|_, _, _| {
            Ok(HttpResponse {
                status: 404,
                body: r#"{"error":"no such theme"}"#.to_string(),
            })
        });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        assert!(matches!(store.delete("X"), Err(SyncError::NotFound(_))));
    }

    #[test]
    fn test_token_header_attached() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .withf(|_, headers: &Vec<(String, String)>, _| {
                headers
                    .iter()
                    .any(|(k, v)| k == "X-CSRF-Token" && v == "tok-123")
            })
            .returning(|_, _, _| {
                Ok(HttpResponse {
                    status: 200,
                    body: "OK".to_string(),
                })
            });

        let store =
            HttpStore::with_http_client("http://localhost:8000/", Some("tok-123".to_string()), mock);
        assert!(store.delete("X").is_ok());
    }

    #[test]
    fn test_network_error_is_transport() {
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .returning(|_, _, _| Err(anyhow::anyhow!("connection refused")));

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        let err = store.list().unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_unparseable_success_body_is_transport() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().returning(|_, _, _| {
            Ok(HttpResponse {
                status: 200,
                body: "<html>surprise</html>".to_string(),
            })
        });

        let store = HttpStore::with_http_client("http://localhost:8000", None, mock);
        assert!(matches!(store.list(), Err(SyncError::Transport(_))));
    }
}
