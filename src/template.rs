//! Path template → concrete request path

use std::collections::HashMap;

use crate::error::PathError;

/// Replace `{name}` placeholders with percent-encoded values.
pub fn resolve_path_template(
    template: &str,
    path_params: &HashMap<String, String>,
) -> Result<String, PathError> {
    let template = template.trim();
    if template.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };

        let name = &rest[open + 1..close];
        let value = path_params.get(name).map(|v| v.trim()).unwrap_or_default();
        if value.is_empty() {
            return Err(PathError::MissingPathParam {
                name: name.to_string(),
            });
        }

        resolved.push_str(&rest[..open]);
        resolved.push_str(&urlencoding::encode(value));
        rest = &rest[close + 1..];
    }
    resolved.push_str(rest);

    Ok(resolved)
}
