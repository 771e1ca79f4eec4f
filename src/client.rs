//! Resolved action → HTTP request against the Holded API
//!
//! Builds a request from a method, a concrete path, query pairs, extra headers
//! and an optional body, sends it, and maps non-2xx statuses to errors.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::{multipart, Client as HttpClient, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::DispatchError;

pub const DEFAULT_BASE_URL: &str = "https://api.holded.com";
pub const DEFAULT_PING_PATH: &str = "/api/invoicing/v1/contacts";
pub const API_KEY_ENV: &str = "HOLDED_API_KEY";

const USER_AGENT_VALUE: &str = concat!("holdedcli/", env!("CARGO_PKG_VERSION"));
const SNIPPET_LIMIT: usize = 200;
const API_KEY_HEADER: &str = "key";

/// Where the API key in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    Flag,
    Env,
    Config,
    None,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::Config => "config",
            Self::None => "none",
        }
    }
}

/// Pick the API key by priority: flag, then environment, then config file.
pub fn resolve_api_key(
    flag_value: Option<&str>,
    env_value: Option<&str>,
    config_value: Option<&str>,
) -> (String, CredentialSource) {
    let candidates = [
        (flag_value, CredentialSource::Flag),
        (env_value, CredentialSource::Env),
        (config_value, CredentialSource::Config),
    ];
    for (value, source) in candidates {
        if let Some(key) = value.map(str::trim).filter(|k| !k.is_empty()) {
            return (key.to_string(), source);
        }
    }
    (String::new(), CredentialSource::None)
}

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Raw JSON bytes, sent with `Content-Type: application/json`
    Json(Vec<u8>),
    /// File uploaded as multipart field `file`
    File(PathBuf),
}

/// A single API call.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

/// Successful API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// Blocking Holded API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

impl Client {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let raw = match base_url.trim() {
            "" => DEFAULT_BASE_URL,
            other => other,
        };
        let base_url = Url::parse(raw).map_err(|source| DispatchError::InvalidBaseUrl {
            url: raw.to_string(),
            source,
        })?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(DispatchError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.trim().to_string(),
        })
    }

    /// GET `path` and return the status code.
    pub fn ping(&self, path: &str) -> Result<reqwest::StatusCode, DispatchError> {
        let resp = self.execute(ApiRequest {
            method: "GET".to_string(),
            path: path.to_string(),
            ..Default::default()
        })?;
        Ok(resp.status)
    }

    pub fn execute(&self, request: ApiRequest) -> Result<ApiResponse, DispatchError> {
        let method = match request.method.trim() {
            "" => Method::GET,
            m => m
                .to_uppercase()
                .parse()
                .map_err(|_| DispatchError::UnsupportedMethod {
                    method: request.method.clone(),
                })?,
        };
        let url = self.resolve_path(&request.path)?;
        debug!(%method, %url, "sending API request");

        let json_body = matches!(request.body, RequestBody::Json(_));
        let headers = self.request_headers(&request.headers, json_body)?;
        let mut req = self.http.request(method, url).headers(headers);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        req = match request.body {
            RequestBody::Empty => req,
            RequestBody::Json(bytes) => req.body(bytes),
            RequestBody::File(path) => {
                let form = multipart::Form::new().file("file", &path).map_err(|source| {
                    DispatchError::FileRead {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                req.multipart(form)
            }
        };

        send_request(req)
    }

    /// Default headers, then caller headers. A caller header replaces a
    /// default of the same name.
    fn request_headers(
        &self,
        extra: &[(String, String)],
        json_body: bool,
    ) -> Result<HeaderMap, DispatchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.api_key).map_err(|_| DispatchError::InvalidHeader {
                name: API_KEY_HEADER.to_string(),
            })?,
        );
        if json_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for (name, val) in extra {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }
            let invalid = || DispatchError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(trimmed.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(val).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    fn resolve_path(&self, path: &str) -> Result<Url, DispatchError> {
        let trimmed = path.trim();
        let relative = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        self.base_url
            .join(&relative)
            .map_err(|source| DispatchError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }
}

fn send_request(req: RequestBuilder) -> Result<ApiResponse, DispatchError> {
    let resp = req.send().map_err(DispatchError::RequestFailed)?;
    let status = resp.status();
    let body = resp.text().map_err(DispatchError::ResponseRead)?;

    if !status.is_success() {
        return Err(DispatchError::Api {
            status,
            snippet: clean_snippet(&body),
        });
    }

    Ok(ApiResponse { status, body })
}

/// Collapse whitespace and cap the length of an error body.
fn clean_snippet(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(SNIPPET_LIMIT) {
        Some((idx, _)) => collapsed[..idx].to_string(),
        None => collapsed,
    }
}
