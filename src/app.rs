//! Command handlers for the `holded` binary
//!
//! Parses arguments with the tree from [`build_cli`], runs the matching
//! handler, and renders either plain text or a versioned JSON envelope.
//! Failures are reduced to a stable error code plus an exit code.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::ArgMatches;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::builder::{build_cli, split_key_value};
use crate::catalog::{
    load_catalog, Catalog, CatalogConfig, DocsSource, HttpDocsSource, DEFAULT_DOCS_BASE_URL,
};
use crate::client::{
    resolve_api_key, ApiRequest, Client, CredentialSource, RequestBody, API_KEY_ENV,
    DEFAULT_BASE_URL, DEFAULT_PING_PATH,
};
use crate::config::{self, Config, CONFIG_PATH_ENV};
use crate::error::{CatalogError, ConfigError, DispatchError, LookupError, PathError};
use crate::spec::{Action, ActionBodyField};
use crate::template::resolve_path_template;
use crate::validate::validate_body_parameters;

const OUTPUT_VERSION: &str = "v1";
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Stable machine-readable failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Usage,
    Config,
    MissingApiKey,
    InvalidBaseUrl,
    Catalog,
    ActionNotFound,
    AmbiguousAction,
    MissingPathParam,
    InvalidBody,
    InvalidBodyParameters,
    Api,
    Network,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usage => "USAGE_ERROR",
            Self::Config => "CONFIG_ERROR",
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::InvalidBaseUrl => "INVALID_BASE_URL",
            Self::Catalog => "CATALOG_ERROR",
            Self::ActionNotFound => "ACTION_NOT_FOUND",
            Self::AmbiguousAction => "AMBIGUOUS_ACTION",
            Self::MissingPathParam => "MISSING_PATH_PARAM",
            Self::InvalidBody => "INVALID_BODY",
            Self::InvalidBodyParameters => "INVALID_BODY_PARAMETERS",
            Self::Api => "API_ERROR",
            Self::Network => "NETWORK_ERROR",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage | Self::MissingPathParam => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed command, ready to be rendered.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
    /// Structured context (candidate ids, body issues) for JSON output
    pub details: Option<Value>,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Usage, message)
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Render an error and its sources as "outer: inner: root".
fn error_chain(err: &dyn StdError) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorCode::Config, error_chain(&err))
    }
}

impl From<CatalogError> for CommandError {
    fn from(err: CatalogError) -> Self {
        Self::new(
            ErrorCode::Catalog,
            format!("loading actions catalog: {}", error_chain(&err)),
        )
    }
}

impl From<LookupError> for CommandError {
    fn from(err: LookupError) -> Self {
        let message = err.to_string();
        match err {
            LookupError::EmptyReference => Self::usage(message),
            LookupError::NotFound { .. } => Self::new(ErrorCode::ActionNotFound, message),
            LookupError::Ambiguous { candidates, .. } => {
                Self::new(ErrorCode::AmbiguousAction, message)
                    .with_details(json!({ "candidates": candidates }))
            }
        }
    }
}

impl From<PathError> for CommandError {
    fn from(err: PathError) -> Self {
        match &err {
            PathError::MissingPathParam { name } => {
                Self::new(ErrorCode::MissingPathParam, err.to_string())
                    .with_details(json!({ "parameter": name }))
            }
            PathError::EmptyPath => Self::usage(err.to_string()),
        }
    }
}

impl From<DispatchError> for CommandError {
    fn from(err: DispatchError) -> Self {
        let code = match &err {
            DispatchError::InvalidBaseUrl { .. } => ErrorCode::InvalidBaseUrl,
            DispatchError::Api { .. } => ErrorCode::Api,
            DispatchError::FileRead { .. } => ErrorCode::InvalidBody,
            DispatchError::InvalidPath { .. }
            | DispatchError::UnsupportedMethod { .. }
            | DispatchError::InvalidHeader { .. } => ErrorCode::Usage,
            DispatchError::ClientBuild(_)
            | DispatchError::RequestFailed(_)
            | DispatchError::ResponseRead(_) => ErrorCode::Network,
        };
        Self::new(code, error_chain(&err))
    }
}

#[derive(Serialize)]
struct JsonResponse<'a> {
    version: &'static str,
    success: bool,
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError<'a>>,
}

#[derive(Serialize)]
struct JsonError<'a> {
    code: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

#[derive(Serialize)]
struct ActionSummary<'a> {
    id: &'a str,
    api: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_id: Option<&'a str>,
    method: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
}

impl<'a> From<&'a Action> for ActionSummary<'a> {
    fn from(action: &'a Action) -> Self {
        Self {
            id: &action.id,
            api: &action.api,
            operation_id: action.operation_id.as_deref(),
            method: &action.method,
            path: &action.path,
            summary: action.summary.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct ActionsListData<'a> {
    generated_at: String,
    source: &'a str,
    count: usize,
    skipped_operations: usize,
    actions: Vec<ActionSummary<'a>>,
}

#[derive(Serialize)]
struct ActionsDescribeData<'a> {
    generated_at: String,
    source: &'a str,
    action: &'a Action,
}

#[derive(Serialize)]
struct ActionRunData<'a> {
    action_id: &'a str,
    api: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_id: Option<&'a str>,
    method: &'a str,
    path: &'a str,
    status_code: u16,
    credential_source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<Value>,
}

type DocsFactory<'a> =
    Box<dyn Fn(Duration) -> Result<Box<dyn DocsSource + 'a>, CatalogError> + 'a>;

/// The `holded` command-line application.
pub struct App<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    getenv: Box<dyn Fn(&str) -> Option<String> + 'a>,
    config_path: Option<PathBuf>,
    docs_source: DocsFactory<'a>,
    catalog_config: CatalogConfig,
    json: bool,
}

impl<'a> App<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self {
            out,
            err,
            getenv: Box::new(|name| std::env::var(name).ok()),
            config_path: None,
            docs_source: Box::new(http_docs_source),
            catalog_config: CatalogConfig::default(),
            json: false,
        }
    }

    /// Replace environment lookups.
    pub fn with_getenv(mut self, getenv: impl Fn(&str) -> Option<String> + 'a) -> Self {
        self.getenv = Box::new(getenv);
        self
    }

    /// Use a fixed config file instead of the default location.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Replace how docs pages are fetched; the argument is the catalog timeout.
    pub fn with_docs_source(
        mut self,
        factory: impl Fn(Duration) -> Result<Box<dyn DocsSource + 'a>, CatalogError> + 'a,
    ) -> Self {
        self.docs_source = Box::new(factory);
        self
    }

    pub fn with_catalog_config(mut self, config: CatalogConfig) -> Self {
        self.catalog_config = config;
        self
    }

    /// Run with full argv (program name first) and return the exit code.
    pub fn run<I, S>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.json = args.iter().skip(1).any(|a| a == "--json");
        let command = detected_command(args.get(1..).unwrap_or_default());

        let matches = match build_cli().try_get_matches_from(&args) {
            Ok(matches) => matches,
            Err(err) => return self.handle_clap_error(&command, err),
        };

        match self.execute(&matches) {
            Ok(()) => 0,
            Err(err) => self.handle_error(&command, &err),
        }
    }

    fn execute(&mut self, matches: &ArgMatches) -> Result<(), CommandError> {
        match matches.subcommand() {
            Some(("auth", sub)) => match sub.subcommand() {
                Some(("set", m)) => self.auth_set(m),
                Some(("status", _)) => self.auth_status(),
                _ => Err(CommandError::usage("missing auth subcommand")),
            },
            Some(("ping", m)) => self.ping(m),
            Some(("actions", sub)) => match sub.subcommand() {
                Some(("list", m)) => self.actions_list(m),
                Some(("describe", m)) => self.actions_describe(m),
                Some(("run", m)) => self.actions_run(m),
                _ => Err(CommandError::usage("missing actions subcommand")),
            },
            _ => Err(CommandError::usage("missing command")),
        }
    }

    // -- auth --

    fn auth_set(&mut self, m: &ArgMatches) -> Result<(), CommandError> {
        let api_key = arg(m, "api-key").unwrap_or_default().trim();
        if api_key.is_empty() {
            return Err(CommandError::usage("missing required flag: --api-key"));
        }

        let (path, mut cfg) = self.read_config()?;
        cfg.api_key = api_key.to_string();
        config::save(&path, &cfg)?;

        self.success(
            "auth set",
            "API key saved",
            json!({ "config_path": path.display().to_string() }),
        )
    }

    fn auth_status(&mut self) -> Result<(), CommandError> {
        let (_, cfg) = self.read_config()?;
        let env_key = (self.getenv)(API_KEY_ENV);
        let (key, source) = resolve_api_key(None, env_key.as_deref(), Some(&cfg.api_key));
        let configured = !key.is_empty();

        if self.json {
            return self.success(
                "auth status",
                "authentication status loaded",
                json!({ "configured": configured, "source": source.as_str() }),
            );
        }

        if configured {
            self.line(format_args!("API key configured (source: {})", source.as_str()));
        } else {
            self.line("API key not configured");
        }
        Ok(())
    }

    // -- ping --

    fn ping(&mut self, m: &ArgMatches) -> Result<(), CommandError> {
        let (key, source) = self.api_key(m)?;
        let base_url = arg(m, "base-url").unwrap_or(DEFAULT_BASE_URL);
        let path = arg(m, "path").unwrap_or(DEFAULT_PING_PATH);

        let client = Client::new(base_url, &key, duration(m, "timeout"))?;
        let status = client.ping(path).map_err(|err| {
            let mut cmd_err = CommandError::from(err);
            cmd_err.message = format!("ping failed: {}", cmd_err.message);
            cmd_err
        })?;

        self.success(
            "ping",
            "Holded API reachable",
            json!({
                "base_url": base_url.trim(),
                "path": path.trim(),
                "status_code": status.as_u16(),
                "credential_source": source.as_str(),
            }),
        )
    }

    // -- actions --

    fn actions_list(&mut self, m: &ArgMatches) -> Result<(), CommandError> {
        let catalog = self.load_catalog(duration(m, "timeout"))?;
        let actions = catalog.filter(arg(m, "filter").unwrap_or_default());

        if self.json {
            let data = ActionsListData {
                generated_at: catalog.generated_at.to_rfc3339(),
                source: &catalog.source,
                count: actions.len(),
                skipped_operations: catalog.skipped_operations,
                actions: actions.iter().map(|a| ActionSummary::from(*a)).collect(),
            };
            return self.success("actions list", "actions catalog loaded", to_value(&data));
        }

        let mut current_api: Option<&str> = None;
        for action in &actions {
            if current_api != Some(action.api.as_str()) {
                if current_api.is_some() {
                    self.line("");
                }
                self.line(&action.api);
                current_api = Some(action.api.as_str());
            }
            let label = match &action.operation_id {
                Some(op) => format!("{} ({op})", action.id),
                None => action.id.clone(),
            };
            self.line(format_args!("  {label} {:<6} {}", action.method, action.path));
        }
        self.line(format_args!("\nTotal actions: {}", actions.len()));
        Ok(())
    }

    fn actions_describe(&mut self, m: &ArgMatches) -> Result<(), CommandError> {
        let reference = arg(m, "action").unwrap_or_default();
        let catalog = self.load_catalog(duration(m, "timeout"))?;
        let action = catalog.find(reference)?;

        if self.json {
            let data = ActionsDescribeData {
                generated_at: catalog.generated_at.to_rfc3339(),
                source: &catalog.source,
                action,
            };
            return self.success("actions describe", "action metadata loaded", to_value(&data));
        }

        self.line(format_args!("ID: {}", action.id));
        self.line(format_args!("API: {}", action.api));
        if let Some(op) = &action.operation_id {
            self.line(format_args!("Operation: {op}"));
        }
        self.line(format_args!("Method: {}", action.method));
        self.line(format_args!("Path: {}", action.path));
        if let Some(summary) = &action.summary {
            self.line(format_args!("Summary: {summary}"));
        }
        if let Some(description) = &action.description {
            self.line(format_args!("Description: {description}"));
        }

        if !action.parameters.is_empty() {
            self.line("\nParameters:");
            for p in &action.parameters {
                let mut line = format!(
                    "- {} ({}, {})",
                    p.name,
                    p.location,
                    requiredness(p.required)
                );
                if let Some(kind) = &p.kind {
                    line.push_str(&format!(" type={kind}"));
                }
                if !p.enum_values.is_empty() {
                    line.push_str(&format!(" enum={}", p.enum_values.join(",")));
                }
                if let Some(description) = &p.description {
                    line.push_str(&format!(" - {description}"));
                }
                self.line(line);
            }
        }

        if let Some(body) = &action.request_body {
            self.line("\nRequest body:");
            self.line(format_args!("- {}", requiredness(body.required)));
            if !body.content_types.is_empty() {
                self.line(format_args!("- content types: {}", body.content_types.join(", ")));
            }
            if !body.fields.is_empty() {
                self.line("- fields:");
                let mut lines = Vec::new();
                describe_fields(&body.fields, 1, &mut lines);
                for line in lines {
                    self.line(line);
                }
            }
        }
        Ok(())
    }

    fn actions_run(&mut self, m: &ArgMatches) -> Result<(), CommandError> {
        let reference = arg(m, "action").unwrap_or_default();

        let path_params: HashMap<String, String> = pairs(m, "path")?.into_iter().collect();
        let query = pairs(m, "query")?;
        let headers = pairs(m, "header")?;
        let body = read_body_input(m)?;

        let (key, source) = self.api_key(m)?;

        let catalog = self.load_catalog(duration(m, "catalog-timeout"))?;
        let action = catalog.find(reference)?;
        let resolved_path = resolve_path_template(&action.path, &path_params)?;

        if let RequestBody::Json(bytes) = &body {
            let issues = validate_body_parameters(action, bytes);
            if !issues.is_empty() {
                let summary: Vec<String> = issues.iter().map(ToString::to_string).collect();
                return Err(CommandError::new(
                    ErrorCode::InvalidBodyParameters,
                    format!(
                        "invalid body parameters for {}: {}",
                        action.id,
                        summary.join("; ")
                    ),
                )
                .with_details(json!({ "action_id": action.id, "issues": issues })));
            }
        }

        let base_url = arg(m, "base-url").unwrap_or(DEFAULT_BASE_URL);
        let client = Client::new(base_url, &key, duration(m, "timeout"))?;
        debug!(action = %action.id, path = %resolved_path, "running action");

        let response = client
            .execute(ApiRequest {
                method: action.method.clone(),
                path: resolved_path.clone(),
                query,
                headers,
                body,
            })
            .map_err(|err| {
                let mut cmd_err = CommandError::from(err);
                cmd_err.message = format!("action {} failed: {}", action.id, cmd_err.message);
                cmd_err
            })?;

        let decoded = decode_response_body(&response.body);

        if self.json {
            let data = ActionRunData {
                action_id: &action.id,
                api: &action.api,
                operation_id: action.operation_id.as_deref(),
                method: &action.method,
                path: &resolved_path,
                status_code: response.status.as_u16(),
                credential_source: source.as_str(),
                response: decoded,
            };
            return self.success("actions run", "action executed", to_value(&data));
        }

        self.line(format_args!(
            "{} {} -> HTTP {}",
            action.method,
            resolved_path,
            response.status.as_u16()
        ));
        if let Some(value) = decoded {
            self.line("");
            self.line(pretty_body(&value));
        }
        Ok(())
    }

    // -- helpers --

    fn load_catalog(&self, timeout: Duration) -> Result<Catalog, CommandError> {
        let source = (self.docs_source)(timeout)?;
        Ok(load_catalog(source.as_ref(), &self.catalog_config)?)
    }

    fn read_config(&self) -> Result<(PathBuf, Config), CommandError> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => config::default_path((self.getenv)(CONFIG_PATH_ENV).as_deref())?,
        };
        let cfg = config::load(&path)?;
        Ok((path, cfg))
    }

    fn api_key(&self, m: &ArgMatches) -> Result<(String, CredentialSource), CommandError> {
        let (_, cfg) = self.read_config()?;
        let env_key = (self.getenv)(API_KEY_ENV);
        let (key, source) =
            resolve_api_key(arg(m, "api-key"), env_key.as_deref(), Some(&cfg.api_key));
        if key.is_empty() {
            return Err(CommandError::new(
                ErrorCode::MissingApiKey,
                "missing Holded API key; use --api-key, HOLDED_API_KEY, or `holded auth set --api-key ...`",
            ));
        }
        Ok((key, source))
    }

    fn success(&mut self, command: &str, message: &str, data: Value) -> Result<(), CommandError> {
        if self.json {
            self.write_json(&JsonResponse {
                version: OUTPUT_VERSION,
                success: true,
                command,
                message: Some(message),
                data: Some(data),
                error: None,
            });
        } else {
            self.line(message);
        }
        Ok(())
    }

    fn handle_error(&mut self, command: &str, err: &CommandError) -> i32 {
        if self.json {
            self.write_json(&JsonResponse {
                version: OUTPUT_VERSION,
                success: false,
                command,
                message: None,
                data: None,
                error: Some(JsonError {
                    code: err.code.as_str(),
                    message: &err.message,
                    details: err.details.as_ref(),
                }),
            });
        } else {
            let _ = writeln!(self.err, "{}", err.message);
            if err.code == ErrorCode::Usage {
                let _ = writeln!(self.err, "\n{}", build_cli().render_usage());
            }
        }
        err.code.exit_code()
    }

    fn handle_clap_error(&mut self, command: &str, err: clap::Error) -> i32 {
        if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            let _ = write!(self.out, "{}", err.render());
            return 0;
        }

        if self.json {
            let message = err
                .to_string()
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            return self.handle_error(command, &CommandError::usage(message));
        }

        let _ = write!(self.err, "{}", err.render());
        ErrorCode::Usage.exit_code()
    }

    fn line(&mut self, text: impl fmt::Display) {
        let _ = writeln!(self.out, "{text}");
    }

    fn write_json(&mut self, payload: &JsonResponse<'_>) {
        if let Ok(text) = serde_json::to_string_pretty(payload) {
            let _ = writeln!(self.out, "{text}");
        }
    }
}

fn http_docs_source<'a>(timeout: Duration) -> Result<Box<dyn DocsSource + 'a>, CatalogError> {
    Ok(Box::new(HttpDocsSource::new(DEFAULT_DOCS_BASE_URL, timeout)?))
}

fn arg<'m>(m: &'m ArgMatches, name: &str) -> Option<&'m str> {
    m.get_one::<String>(name).map(String::as_str)
}

fn duration(m: &ArgMatches, name: &str) -> Duration {
    m.get_one::<Duration>(name)
        .copied()
        .unwrap_or(FALLBACK_TIMEOUT)
}

fn pairs(m: &ArgMatches, name: &str) -> Result<Vec<(String, String)>, CommandError> {
    m.get_many::<String>(name)
        .into_iter()
        .flatten()
        .map(|pair| {
            split_key_value(pair)
                .ok_or_else(|| CommandError::usage(format!("invalid key=value pair: {pair:?}")))
        })
        .collect()
}

fn read_body_input(m: &ArgMatches) -> Result<RequestBody, CommandError> {
    if let Some(path) = arg(m, "file").map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(RequestBody::File(PathBuf::from(path)));
    }
    if let Some(path) = arg(m, "body-file").map(str::trim).filter(|p| !p.is_empty()) {
        let bytes = std::fs::read(path).map_err(|err| {
            CommandError::new(ErrorCode::InvalidBody, format!("reading --body-file: {err}"))
        })?;
        return Ok(RequestBody::Json(bytes));
    }
    match arg(m, "body").map(str::trim).filter(|b| !b.is_empty()) {
        Some(inline) => Ok(RequestBody::Json(inline.as_bytes().to_vec())),
        None => Ok(RequestBody::Empty),
    }
}

/// Command label used in the JSON envelope, e.g. "actions run".
fn detected_command(args: &[String]) -> String {
    let args: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--json")
        .collect();
    match args.as_slice() {
        [] => "holded".to_string(),
        [group @ ("auth" | "actions"), sub, ..] => format!("{group} {sub}"),
        [first, ..] => first.to_string(),
    }
}

fn requiredness(required: bool) -> &'static str {
    if required {
        "required"
    } else {
        "optional"
    }
}

fn describe_fields(fields: &[ActionBodyField], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for field in fields {
        let kind = if field.kind.is_empty() { "any" } else { &field.kind };
        let mut line = format!(
            "{indent}- {} ({kind}, {})",
            field.name,
            requiredness(field.required)
        );
        if !field.enum_values.is_empty() {
            line.push_str(&format!(" enum={}", field.enum_values.join(",")));
        }
        if let Some(description) = &field.description {
            line.push_str(&format!(" - {description}"));
        }
        lines.push(line);
        if let Some(item) = &field.item {
            describe_fields(&item.fields, depth + 1, lines);
        }
    }
}

fn decode_response_body(body: &str) -> Option<Value> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
}

fn pretty_body(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn to_value(data: &impl Serialize) -> Value {
    serde_json::to_value(data).unwrap_or(Value::Null)
}
