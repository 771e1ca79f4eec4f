//! Command-line client for the Holded API.
//!
//! The action catalog is not bundled: it is scraped at run time from the
//! public reference docs, whose pages embed an OpenAPI-like document in a
//! `<script id="ssr-props">` tag. Each page yields typed [`Action`]s that can
//! be listed, described, validated and executed against the live API.
//!
//! # Usage
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::time::Duration;
//!
//! use holded_cli::{load_catalog, resolve_path_template, CatalogConfig, HttpDocsSource};
//!
//! let docs = HttpDocsSource::new("https://developers.holded.com", Duration::from_secs(15))?;
//! let catalog = load_catalog(&docs, &CatalogConfig::default())?;
//!
//! let action = catalog.find("invoice.get-contact")?;
//! let params = HashMap::from([("contactId".to_string(), "123".to_string())]);
//! let path = resolve_path_template(&action.path, &params)?;
//! println!("{} {path}", action.method);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod builder;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod spec;
pub mod template;
pub mod validate;

pub use app::{App, CommandError, ErrorCode};
pub use builder::build_cli;
pub use catalog::{load_catalog, Catalog, CatalogConfig, DocsSource, HttpDocsSource};
pub use client::{resolve_api_key, ApiRequest, ApiResponse, Client, CredentialSource, RequestBody};
pub use error::{
    CatalogError, ConfigError, DispatchError, ExtractError, LookupError, PathError, SchemaError,
};
pub use extract::extract_ssr_props;
pub use spec::{build_actions, Action, ActionBodyField, ActionParameter, ActionRequestBody};
pub use template::resolve_path_template;
pub use validate::{validate_body_parameters, BodyIssue, IssueKind};

// Re-export dependencies for downstream crates
pub use clap;
pub use reqwest;
