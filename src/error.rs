//! Error types for the holded-cli crate.

use thiserror::Error;

/// Errors raised while pulling the embedded payload out of a docs page.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("ssr props payload not found")]
    NotFound,
}

/// Errors raised while turning a decoded docs payload into actions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("invalid docs payload")]
    Decode(#[source] serde_json::Error),

    #[error("missing API title in docs payload")]
    MissingTitle,
}

/// Errors that abort a catalog build.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("building docs HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("fetching docs page {slug}")]
    Fetch {
        slug: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("docs page {slug} returned status {status}")]
    Status {
        slug: String,
        status: reqwest::StatusCode,
    },

    #[error("parsing docs page {slug}")]
    Extract {
        slug: String,
        #[source]
        source: ExtractError,
    },

    #[error("building actions from {slug}")]
    Schema {
        slug: String,
        #[source]
        source: SchemaError,
    },
}

/// Errors returned by [`Catalog::find`](crate::catalog::Catalog::find).
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LookupError {
    #[error("missing action reference")]
    EmptyReference,

    #[error("action not found: {reference}")]
    NotFound { reference: String },

    #[error("ambiguous action {reference:?}, choose one of: {}", candidates.join(", "))]
    Ambiguous {
        reference: String,
        candidates: Vec<String>,
    },
}

/// Errors returned when filling a path template.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    #[error("empty action path")]
    EmptyPath,

    #[error("missing required --path {name}=<value>")]
    MissingPathParam { name: String },
}

/// Errors that can occur while calling the Holded API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid request path: {path}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported HTTP method: {method}")]
    UnsupportedMethod { method: String },

    #[error("invalid header: {name}")]
    InvalidHeader { name: String },

    #[error("failed to read upload file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("building HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("HTTP request failed")]
    RequestFailed(#[source] reqwest::Error),

    #[error("failed to read response body")]
    ResponseRead(#[source] reqwest::Error),

    #[error("holded API returned status {}{}", status.as_u16(), snippet_suffix(snippet))]
    Api {
        status: reqwest::StatusCode,
        snippet: String,
    },
}

fn snippet_suffix(snippet: &str) -> String {
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}

/// Errors reading or writing the credential file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("reading config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("writing config file {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("encoding config")]
    Encode(#[source] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_error_lists_candidates() {
        let err = LookupError::Ambiguous {
            reference: "get contact".into(),
            candidates: vec!["invoice.get-contact".into(), "crm.get-contact".into()],
        };
        assert_eq!(
            err.to_string(),
            r#"ambiguous action "get contact", choose one of: invoice.get-contact, crm.get-contact"#
        );
    }

    #[test]
    fn api_error_omits_empty_snippet() {
        let err = DispatchError::Api {
            status: reqwest::StatusCode::UNAUTHORIZED,
            snippet: String::new(),
        };
        assert_eq!(err.to_string(), "holded API returned status 401");

        let err = DispatchError::Api {
            status: reqwest::StatusCode::BAD_REQUEST,
            snippet: "bad".into(),
        };
        assert_eq!(err.to_string(), "holded API returned status 400: bad");
    }

    #[test]
    fn missing_path_param_names_parameter() {
        let err = PathError::MissingPathParam {
            name: "contactId".into(),
        };
        assert!(err.to_string().contains("contactId"));
    }
}
