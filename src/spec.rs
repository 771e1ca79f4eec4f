//! Docs payload → normalized `Action` records
//!
//! Each reference page carries an OpenAPI-like fragment for one API family.
//! The fragment is decoded into a typed intermediate tree, then flattened into
//! one `Action` per (path, method) with merged parameters and the request
//! body's field tree.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::SchemaError;

/// Maximum nesting of body field items decoded from a schema.
pub const MAX_FIELD_DEPTH: usize = 32;

const HTTP_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];
const FALLBACK_API_SHORT: &str = "holded";

/// A normalized callable API action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Action {
    /// Catalog-unique id, e.g. "invoice.list-contacts"
    pub id: String,
    /// API family title, e.g. "Invoice API"
    pub api: String,
    /// operationId from the docs, not guaranteed unique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// HTTP method (GET, POST, PUT, DELETE, PATCH)
    pub method: String,
    /// Absolute path template (e.g. "/api/invoicing/v1/contacts/{contactId}")
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered by location, then name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ActionRequestBody>,
}

/// An accepted parameter of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ActionParameter {
    pub name: String,
    /// Lower-cased location: path, query, header
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

/// Request body metadata of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ActionRequestBody {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_types: Vec<String>,
    /// Top-level JSON body fields, sorted by name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ActionBodyField>,
}

/// One declared property of a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ActionBodyField {
    pub name: String,
    pub required: bool,
    /// string, integer, number, boolean, object, array or "array[T]"
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Shape of a nested object or of the elements of an array of objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Box<ActionBodyItem>>,
}

/// Nested object shape of a body field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ActionBodyItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<ActionBodyField>,
}

/// Actions decoded from one docs page.
#[derive(Debug, Clone, Default)]
pub struct PageActions {
    pub actions: Vec<Action>,
    /// Operation objects that could not be decoded and were left out
    pub skipped: usize,
}

// -- intermediate tree --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SsrProps {
    document: Option<RawDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    api: Option<RawApi>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawApi {
    schema: Option<RawSchemaDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSchemaDocument {
    info: Option<RawInfo>,
    servers: Option<Vec<RawServer>>,
    paths: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInfo {
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawServer {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawOperation {
    operation_id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    parameters: Option<Vec<Value>>,
    request_body: Option<RawRequestBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRequestBody {
    required: Option<bool>,
    content: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawParameter {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    name: Option<String>,
    #[serde(rename = "in")]
    location: Option<String>,
    required: Option<bool>,
    description: Option<String>,
    schema: Option<RawSchema>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSchema {
    #[serde(rename = "type")]
    kind: Option<TypeTag>,
    items: Option<Box<RawSchema>>,
    #[serde(rename = "enum")]
    enum_values: Option<Vec<Value>>,
    properties: Option<BTreeMap<String, Value>>,
    /// A list of names at object level; anything else is ignored
    required: Option<Value>,
    description: Option<String>,
}

/// `type` is a single name, or a list of names in newer schema dialects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeTag {
    Single(String),
    Union(Vec<String>),
}

impl TypeTag {
    fn primary(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s.trim()).filter(|s| !s.is_empty()),
            Self::Union(names) => names
                .iter()
                .map(|s| s.trim())
                .find(|s| !s.is_empty() && *s != "null"),
        }
    }
}

impl RawSchema {
    fn primary_type(&self) -> Option<&str> {
        self.kind.as_ref().and_then(TypeTag::primary)
    }

    fn is_object(&self) -> bool {
        match self.primary_type() {
            Some(kind) => kind == "object",
            None => self.properties.is_some(),
        }
    }

    fn required_names(&self) -> Vec<&str> {
        self.required
            .as_ref()
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Decode an ssr-props payload into the actions it declares.
pub fn build_actions(props_json: &[u8]) -> Result<PageActions, SchemaError> {
    let props: SsrProps = serde_json::from_slice(props_json).map_err(SchemaError::Decode)?;
    let schema = props
        .document
        .and_then(|d| d.api)
        .and_then(|a| a.schema)
        .unwrap_or_default();

    let api_name = schema
        .info
        .and_then(|i| i.title)
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    if api_name.is_empty() {
        return Err(SchemaError::MissingTitle);
    }

    let prefix = server_prefix(schema.servers.as_deref().unwrap_or_default());
    let api_short = api_short_name(&api_name);

    let mut page = PageActions::default();
    for (path_value, item) in schema.paths.unwrap_or_default() {
        let Some(item) = item.as_object() else {
            debug!(path = %path_value, "skipping non-object path item");
            continue;
        };

        let full_path = join_path(&prefix, &path_value);
        let path_params = item
            .get("parameters")
            .and_then(Value::as_array)
            .map(|list| decode_parameters(list))
            .unwrap_or_default();

        for (method_key, raw_operation) in item {
            let method = method_key.trim().to_uppercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }

            let operation = match RawOperation::deserialize(raw_operation) {
                Ok(op) => op,
                Err(err) => {
                    debug!(%method, path = %full_path, error = %err, "skipping undecodable operation");
                    page.skipped += 1;
                    continue;
                }
            };

            page.actions.push(build_action(
                &api_name,
                &api_short,
                &method,
                &full_path,
                &path_params,
                operation,
            ));
        }
    }

    Ok(page)
}

fn build_action(
    api_name: &str,
    api_short: &str,
    method: &str,
    full_path: &str,
    path_params: &[ActionParameter],
    operation: RawOperation,
) -> Action {
    let operation_id = non_empty(operation.operation_id);
    let id_base = match &operation_id {
        Some(op_id) => op_id.clone(),
        None => format!("{method} {full_path}"),
    };
    let operation_params = decode_parameters(operation.parameters.as_deref().unwrap_or_default());

    Action {
        id: format!("{api_short}.{}", slugify(&id_base)),
        api: api_name.to_string(),
        operation_id,
        method: method.to_string(),
        path: full_path.to_string(),
        summary: non_empty(operation.summary),
        description: non_empty(operation.description),
        parameters: merge_parameters(path_params.to_vec(), operation_params),
        request_body: operation.request_body.map(decode_request_body),
    }
}

/// Lower-case, collapse non-alphanumeric runs to '-', trim dashes.
pub fn slugify(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            result.push(c);
        } else if !result.is_empty() && !result.ends_with('-') {
            result.push('-');
        }
    }
    while result.ends_with('-') {
        result.pop();
    }
    result
}

fn api_short_name(api_name: &str) -> String {
    let lowered = api_name.to_lowercase();
    let short = slugify(lowered.strip_suffix(" api").unwrap_or(&lowered));
    if short.is_empty() {
        FALLBACK_API_SHORT.to_string()
    } else {
        short
    }
}

fn server_prefix(servers: &[RawServer]) -> String {
    let Some(raw) = servers
        .first()
        .and_then(|s| s.url.as_deref())
        .map(str::trim)
        .filter(|u| !u.is_empty())
    else {
        return "/".to_string();
    };

    let path = match url::Url::parse(raw) {
        Ok(parsed) => parsed.path().to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
        Err(_) => String::new(),
    };

    if path.trim().is_empty() {
        "/".to_string()
    } else {
        path
    }
}

/// Join a server prefix and a path template with exactly one slash between.
fn join_path(prefix: &str, path_value: &str) -> String {
    let left = prefix.trim().trim_matches('/');
    let right = path_value.trim().trim_matches('/');

    match (left.is_empty(), right.is_empty()) {
        (true, _) => format!("/{right}"),
        (false, true) => format!("/{left}"),
        (false, false) => format!("/{left}/{right}"),
    }
}

fn decode_parameters(list: &[Value]) -> Vec<ActionParameter> {
    let mut params: Vec<ActionParameter> = list.iter().filter_map(decode_parameter).collect();
    params.sort_by(|a, b| (&a.location, &a.name).cmp(&(&b.location, &b.name)));
    params
}

fn decode_parameter(raw: &Value) -> Option<ActionParameter> {
    let param = RawParameter::deserialize(raw).ok()?;
    // External references are not expanded
    if param.reference.as_deref().is_some_and(|r| !r.trim().is_empty()) {
        return None;
    }

    let name = non_empty(param.name)?;
    let location = non_empty(param.location)?.to_lowercase();
    let required = param.required.unwrap_or(false) || location == "path";

    let (kind, enum_values) = match &param.schema {
        Some(schema) => (schema_type(schema), stringify_enum(schema)),
        None => (None, Vec::new()),
    };

    Some(ActionParameter {
        name,
        location,
        required,
        kind,
        description: non_empty(param.description),
        enum_values,
    })
}

/// Merge path-level + operation-level parameters.
/// Operation-level overrides path-level on the same (location, name).
fn merge_parameters(
    path_level: Vec<ActionParameter>,
    operation_level: Vec<ActionParameter>,
) -> Vec<ActionParameter> {
    let mut param_map: HashMap<(String, String), ActionParameter> = HashMap::new();
    for p in path_level.into_iter().chain(operation_level) {
        param_map.insert((p.location.to_lowercase(), p.name.to_lowercase()), p);
    }

    let mut merged: Vec<ActionParameter> = param_map.into_values().collect();
    merged.sort_by(|a, b| (&a.location, &a.name).cmp(&(&b.location, &b.name)));
    merged
}

fn decode_request_body(raw: RawRequestBody) -> ActionRequestBody {
    let content = raw.content.unwrap_or_default();
    // BTreeMap keys are already sorted
    let content_types: Vec<String> = content.keys().cloned().collect();

    let fields = json_media_schema(&content)
        .and_then(|node| RawSchema::deserialize(node).ok())
        .map(|schema| decode_fields(&schema, 0))
        .unwrap_or_default();

    ActionRequestBody {
        required: raw.required.unwrap_or(false),
        content_types,
        fields,
    }
}

/// Schema node of the JSON media type, preferring `application/json`.
fn json_media_schema(content: &BTreeMap<String, Value>) -> Option<&Value> {
    content
        .get("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(media_type, _)| media_type.contains("json"))
                .map(|(_, media)| media)
        })
        .and_then(|media| media.get("schema"))
}

fn decode_fields(schema: &RawSchema, depth: usize) -> Vec<ActionBodyField> {
    let Some(properties) = &schema.properties else {
        return Vec::new();
    };
    let required = schema.required_names();

    properties
        .iter()
        .filter_map(|(name, node)| match RawSchema::deserialize(node) {
            Ok(prop) => Some(decode_field(name, &prop, required.contains(&name.as_str()), depth)),
            Err(err) => {
                debug!(field = %name, error = %err, "skipping undecodable body field");
                None
            }
        })
        .collect()
}

fn decode_field(name: &str, prop: &RawSchema, required: bool, depth: usize) -> ActionBodyField {
    let kind = schema_type(prop).unwrap_or_else(|| {
        if prop.is_object() {
            "object".to_string()
        } else {
            String::new()
        }
    });

    let item = if depth < MAX_FIELD_DEPTH {
        nested_item(prop, depth + 1)
    } else {
        None
    };

    ActionBodyField {
        name: name.to_string(),
        required,
        kind,
        description: non_empty(prop.description.clone()),
        enum_values: stringify_enum(prop),
        item,
    }
}

fn nested_item(prop: &RawSchema, depth: usize) -> Option<Box<ActionBodyItem>> {
    let shape = if prop.is_object() {
        prop
    } else if prop.primary_type() == Some("array") {
        prop.items.as_deref().filter(|items| items.is_object())?
    } else {
        return None;
    };

    Some(Box::new(ActionBodyItem {
        kind: "object".to_string(),
        fields: decode_fields(shape, depth),
    }))
}

/// Type tag of a schema, rendering arrays as `array[elem]`.
fn schema_type(schema: &RawSchema) -> Option<String> {
    let kind = schema.primary_type()?;
    if kind == "array" {
        if let Some(item_type) = schema.items.as_deref().and_then(schema_type) {
            return Some(format!("array[{item_type}]"));
        }
    }
    Some(kind.to_string())
}

fn stringify_enum(schema: &RawSchema) -> Vec<String> {
    schema
        .enum_values
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(schema: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({ "document": { "api": { "schema": schema } } })).unwrap()
    }

    fn invoice_schema(paths: Value) -> Vec<u8> {
        props(json!({
            "info": { "title": "Invoice API" },
            "servers": [{ "url": "https://api.holded.com/api/invoicing/v1" }],
            "paths": paths
        }))
    }

    fn find<'a>(actions: &'a [Action], method: &str, path: &str) -> &'a Action {
        actions
            .iter()
            .find(|a| a.method == method && a.path == path)
            .unwrap_or_else(|| panic!("no action {method} {path}"))
    }

    #[test]
    fn build_actions_prefixes_paths_with_server_path() {
        let raw = invoice_schema(json!({
            "/contacts": {
                "get": { "operationId": "List Contacts", "summary": "List all contacts" }
            },
            "/contacts/{contactId}": {
                "delete": { "operationId": "Delete Contact" },
                "parameters": [{ "name": "contactId", "in": "path" }]
            }
        }));

        let page = build_actions(&raw).unwrap();
        assert_eq!(page.actions.len(), 2);
        assert_eq!(page.skipped, 0);

        let list = find(&page.actions, "GET", "/api/invoicing/v1/contacts");
        assert_eq!(list.id, "invoice.list-contacts");
        assert_eq!(list.api, "Invoice API");
        assert_eq!(list.operation_id.as_deref(), Some("List Contacts"));
        assert_eq!(list.summary.as_deref(), Some("List all contacts"));

        let delete = find(&page.actions, "DELETE", "/api/invoicing/v1/contacts/{contactId}");
        assert_eq!(delete.id, "invoice.delete-contact");
        assert_eq!(delete.parameters.len(), 1);
        assert_eq!(delete.parameters[0].name, "contactId");
        assert_eq!(delete.parameters[0].location, "path");
        assert!(delete.parameters[0].required);
    }

    #[test]
    fn build_actions_yields_one_action_per_supported_method() {
        let raw = invoice_schema(json!({
            "/a": { "get": {}, "post": {}, "put": {}, "delete": {}, "patch": {} },
            "/b": { "GET": {}, "head": {}, "options": {}, "summary": "not a method" }
        }));

        let page = build_actions(&raw).unwrap();
        assert_eq!(page.actions.len(), 6);
        assert!(page
            .actions
            .iter()
            .all(|a| a.path.starts_with("/api/invoicing/v1/")));
    }

    #[test]
    fn build_actions_requires_title() {
        let raw = props(json!({ "info": { "title": "  " }, "paths": {} }));
        assert!(matches!(build_actions(&raw), Err(SchemaError::MissingTitle)));

        let raw = props(json!({ "paths": {} }));
        assert!(matches!(build_actions(&raw), Err(SchemaError::MissingTitle)));
    }

    #[test]
    fn build_actions_rejects_malformed_json() {
        assert!(matches!(build_actions(b"{not json"), Err(SchemaError::Decode(_))));
    }

    #[test]
    fn build_actions_defaults_prefix_to_root() {
        let raw = props(json!({
            "info": { "title": "CRM API" },
            "paths": { "/funnels": { "get": { "operationId": "listFunnels" } } }
        }));

        let page = build_actions(&raw).unwrap();
        assert_eq!(page.actions[0].path, "/funnels");
        assert_eq!(page.actions[0].id, "crm.listfunnels");

        let raw = props(json!({
            "info": { "title": "CRM API" },
            "servers": [{ "url": "https://api.holded.com" }],
            "paths": { "funnels/": { "get": {} } }
        }));
        let page = build_actions(&raw).unwrap();
        assert_eq!(page.actions[0].path, "/funnels");
    }

    #[test]
    fn build_actions_accepts_relative_server_url() {
        let raw = props(json!({
            "info": { "title": "Team API" },
            "servers": [{ "url": "/api/team/v1?x=1" }],
            "paths": { "/employees": { "get": {} } }
        }));

        let page = build_actions(&raw).unwrap();
        assert_eq!(page.actions[0].path, "/api/team/v1/employees");
    }

    #[test]
    fn build_actions_falls_back_to_method_and_path_for_id() {
        let raw = invoice_schema(json!({
            "/contacts/{contactId}/attachments": { "get": { "operationId": "  " } }
        }));

        let page = build_actions(&raw).unwrap();
        let action = &page.actions[0];
        assert!(action.operation_id.is_none());
        assert_eq!(
            action.id,
            "invoice.get-api-invoicing-v1-contacts-contactid-attachments"
        );
    }

    #[test]
    fn build_actions_uses_generic_short_name_for_bare_api_title() {
        let raw = props(json!({
            "info": { "title": "API" },
            "paths": { "/x": { "get": { "operationId": "Do It" } } }
        }));
        // "api" does not end with " api", so it survives as the short name
        assert_eq!(build_actions(&raw).unwrap().actions[0].id, "api.do-it");

        let raw = props(json!({
            "info": { "title": "*** API" },
            "paths": { "/x": { "get": { "operationId": "Do It" } } }
        }));
        assert_eq!(build_actions(&raw).unwrap().actions[0].id, "holded.do-it");
    }

    #[test]
    fn build_actions_skips_and_counts_undecodable_operations() {
        let raw = invoice_schema(json!({
            "/contacts": {
                "get": "not an object",
                "post": { "operationId": "Create Contact", "parameters": "nope" },
                "put": { "operationId": "Update Contacts" }
            }
        }));

        let page = build_actions(&raw).unwrap();
        assert_eq!(page.actions.len(), 1);
        assert_eq!(page.actions[0].method, "PUT");
        assert_eq!(page.skipped, 2);
    }

    #[test]
    fn parameters_merge_with_operation_override() {
        let raw = invoice_schema(json!({
            "/items/{itemId}": {
                "parameters": [
                    { "name": "itemId", "in": "path", "required": false,
                      "description": "Path-level description", "schema": { "type": "string" } },
                    { "name": "shared", "in": "query",
                      "description": "Path-level shared param", "schema": { "type": "string" } }
                ],
                "get": {
                    "operationId": "GetItem",
                    "parameters": [
                        { "name": "shared", "in": "QUERY", "required": true,
                          "description": "Operation-level override",
                          "schema": { "type": "integer", "enum": [1, 2] } },
                        { "name": "format", "in": "query",
                          "schema": { "type": "string", "enum": ["pdf", "json"] } }
                    ]
                }
            }
        }));

        let page = build_actions(&raw).unwrap();
        let params = &page.actions[0].parameters;
        let names: Vec<(&str, &str)> = params
            .iter()
            .map(|p| (p.location.as_str(), p.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![("path", "itemId"), ("query", "format"), ("query", "shared")]
        );

        // Path parameters are always required
        assert!(params[0].required);
        assert_eq!(params[0].description.as_deref(), Some("Path-level description"));

        assert_eq!(params[1].enum_values, vec!["pdf", "json"]);

        let shared = &params[2];
        assert!(shared.required);
        assert_eq!(shared.description.as_deref(), Some("Operation-level override"));
        assert_eq!(shared.kind.as_deref(), Some("integer"));
        assert_eq!(shared.enum_values, vec!["1", "2"]);
    }

    #[test]
    fn parameters_skip_refs_and_incomplete_entries() {
        let raw = invoice_schema(json!({
            "/contacts": {
                "get": {
                    "parameters": [
                        { "$ref": "#/components/parameters/page" },
                        { "name": "", "in": "query" },
                        { "name": "nameOnly" },
                        42,
                        { "name": "tags", "in": "query",
                          "schema": { "type": "array", "items": { "type": "string" } } }
                    ]
                }
            }
        }));

        let page = build_actions(&raw).unwrap();
        let params = &page.actions[0].parameters;
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "tags");
        assert_eq!(params[0].kind.as_deref(), Some("array[string]"));
        assert!(!params[0].required);
    }

    #[test]
    fn request_body_decodes_nested_fields() {
        let raw = invoice_schema(json!({
            "/documents/{docType}": {
                "post": {
                    "operationId": "Create Document",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {},
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "required": ["contactId", "items"],
                                    "properties": {
                                        "contactId": { "type": "string" },
                                        "date": { "type": "integer", "description": "Unix time" },
                                        "items": {
                                            "type": "array",
                                            "items": {
                                                "type": "object",
                                                "required": ["name"],
                                                "properties": {
                                                    "name": { "type": "string" },
                                                    "units": { "type": "number" }
                                                }
                                            }
                                        },
                                        "meta": {
                                            "properties": { "source": { "type": "string" } }
                                        },
                                        "status": { "type": "string", "enum": ["draft", "sent"] }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }));

        let page = build_actions(&raw).unwrap();
        let body = page.actions[0].request_body.as_ref().unwrap();
        assert!(body.required);
        assert_eq!(body.content_types, vec!["application/json", "multipart/form-data"]);

        let names: Vec<&str> = body.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["contactId", "date", "items", "meta", "status"]);

        assert!(body.fields[0].required);
        assert!(!body.fields[1].required);
        assert_eq!(body.fields[1].description.as_deref(), Some("Unix time"));

        let items = &body.fields[2];
        assert!(items.required);
        assert_eq!(items.kind, "array[object]");
        let item = items.item.as_ref().unwrap();
        assert_eq!(item.kind, "object");
        assert_eq!(item.fields.len(), 2);
        assert_eq!(item.fields[0].name, "name");
        assert!(item.fields[0].required);
        assert_eq!(item.fields[1].kind, "number");
        assert!(!item.fields[1].required);

        let meta = &body.fields[3];
        assert_eq!(meta.kind, "object");
        assert_eq!(meta.item.as_ref().unwrap().fields[0].name, "source");

        assert_eq!(body.fields[4].enum_values, vec!["draft", "sent"]);
        assert!(body.fields[4].item.is_none());
    }

    #[test]
    fn request_body_without_json_content_has_no_fields() {
        let raw = invoice_schema(json!({
            "/upload": {
                "post": {
                    "requestBody": {
                        "content": { "multipart/form-data": { "schema": {
                            "type": "object",
                            "properties": { "file": { "type": "string" } }
                        } } }
                    }
                }
            }
        }));

        let page = build_actions(&raw).unwrap();
        let body = page.actions[0].request_body.as_ref().unwrap();
        assert!(!body.required);
        assert_eq!(body.content_types, vec!["multipart/form-data"]);
        assert!(body.fields.is_empty());
    }

    #[test]
    fn request_body_recursion_stops_at_depth_limit() {
        let mut node = json!({ "type": "string" });
        for _ in 0..(MAX_FIELD_DEPTH + 8) {
            node = json!({ "type": "object", "properties": { "child": node } });
        }
        let raw = invoice_schema(json!({
            "/deep": { "post": { "requestBody": { "content": {
                "application/json": { "schema": node }
            } } } }
        }));

        let page = build_actions(&raw).unwrap();
        let body = page.actions[0].request_body.as_ref().unwrap();

        let mut field = &body.fields[0];
        let mut levels = 0;
        while let Some(item) = &field.item {
            levels += 1;
            field = &item.fields[0];
        }
        assert_eq!(levels, MAX_FIELD_DEPTH);
        assert_eq!(field.kind, "object");
    }

    #[test]
    fn type_union_picks_first_non_null() {
        let raw = invoice_schema(json!({
            "/x": { "get": { "parameters": [
                { "name": "q", "in": "query", "schema": { "type": ["null", "string"] } }
            ] } }
        }));

        let page = build_actions(&raw).unwrap();
        assert_eq!(page.actions[0].parameters[0].kind.as_deref(), Some("string"));
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Get Contact"), "get-contact");
        assert_eq!(slugify("GET_CONTACT"), "get-contact");
        assert_eq!(slugify("  --List  (all) Items!! "), "list-all-items");
        assert_eq!(slugify("Café"), "caf");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn join_path_uses_single_slashes() {
        assert_eq!(join_path("/", "/contacts"), "/contacts");
        assert_eq!(join_path("/api/v1/", "contacts"), "/api/v1/contacts");
        assert_eq!(join_path("/api/v1", "/"), "/api/v1");
        assert_eq!(join_path("", ""), "/");
    }
}
