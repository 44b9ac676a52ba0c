//! Post-processing of the merged document.
//!
//! A [`PostProcessor`] runs once on the finished document. Its failure never aborts
//! generation: the generator logs the error and returns the document as merged.

use crate::document::Document;
use serde_json::Value;
use std::collections::HashSet;

/// HTTP methods that name operations inside a path item
const OPERATION_KEYS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// Validates and optionally rewrites the merged document.
pub trait PostProcessor {
    fn process(&self, document: &Document) -> anyhow::Result<Document>;
}

/// Returns the document untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPostProcessor;

impl PostProcessor for NoopPostProcessor {
    fn process(&self, document: &Document) -> anyhow::Result<Document> {
        Ok(document.clone())
    }
}

/// Checks the baseline structure of an OpenAPI 3 document.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaselineValidator;

/// Every structural problem found by [`BaselineValidator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} validation issue(s): {}", self.issues.len(), self.issues.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl PostProcessor for BaselineValidator {
    fn process(&self, document: &Document) -> anyhow::Result<Document> {
        let issues = self.validate(document);
        if issues.is_empty() {
            Ok(document.clone())
        } else {
            Err(ValidationError { issues }.into())
        }
    }
}

impl BaselineValidator {
    /// Collects every issue in the document. An empty vector means the document is valid.
    pub fn validate(&self, document: &Document) -> Vec<String> {
        let mut issues = Vec::new();

        match document.get("openapi").and_then(Value::as_str) {
            Some(version) if version.starts_with("3.") => {}
            _ => issues.push("'openapi' must be a 3.x version string".to_string()),
        }

        match document.get("info") {
            Some(Value::Object(info)) => {
                for field in ["title", "version"] {
                    if !info.get(field).is_some_and(Value::is_string) {
                        issues.push(format!("'info.{}' is required", field));
                    }
                }
            }
            _ => issues.push("'info' must be a mapping".to_string()),
        }

        match document.get("paths") {
            Some(Value::Object(paths)) => {
                for (template, item) in paths {
                    check_path_item(template, item, &mut issues);
                }
            }
            _ => issues.push("'paths' must be a mapping".to_string()),
        }

        if let Some(tags) = document.get("tags") {
            check_tags(tags, &mut issues);
        }

        let mut refs = Vec::new();
        for value in document.as_map().values() {
            collect_refs(value, &mut refs);
        }
        for reference in refs {
            if let Some(fragment) = reference.strip_prefix('#') {
                if document.pointer(&fragment_to_pointer(fragment)).is_none() {
                    issues.push(format!("unresolved reference '{}'", reference));
                }
            }
        }

        issues
    }
}

fn check_path_item(template: &str, item: &Value, issues: &mut Vec<String>) {
    if !template.starts_with('/') {
        issues.push(format!("path '{}' must start with '/'", template));
    }
    let Value::Object(item) = item else {
        issues.push(format!("path '{}' must be a mapping", template));
        return;
    };

    for (method, operation) in item {
        if !OPERATION_KEYS.contains(&method.as_str()) {
            continue;
        }
        match operation.get("responses") {
            Some(Value::Object(responses)) if !responses.is_empty() => {}
            _ => issues.push(format!("operation {} {} has no responses", method, template)),
        }
    }
}

fn check_tags(tags: &Value, issues: &mut Vec<String>) {
    let Value::Array(tags) = tags else {
        issues.push("'tags' must be a sequence".to_string());
        return;
    };

    let mut seen = HashSet::new();
    for tag in tags {
        match tag.get("name").and_then(Value::as_str) {
            Some(name) if !seen.insert(name) => issues.push(format!("duplicate tag '{}'", name)),
            Some(_) => {}
            None => issues.push("every tag needs a string 'name'".to_string()),
        }
    }
}

/// Turns a URI fragment into a JSON pointer, percent-decoding each token on its own so an
/// encoded `/` or `~` stays inside its token.
fn fragment_to_pointer(fragment: &str) -> String {
    fragment
        .split('/')
        .map(|token| percent_decode(token).replace('~', "~0").replace('/', "~1"))
        .collect::<Vec<_>>()
        .join("/")
}

/// Decodes `%XX` escapes; malformed escapes are kept as written.
fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }

    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = match (bytes[i], bytes.get(i + 1..i + 3)) {
            (b'%', Some(hex)) => std::str::from_utf8(hex)
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok()),
            _ => None,
        };
        match escaped {
            Some(byte) => {
                decoded.push(byte);
                i += 3;
            }
            None => {
                decoded.push(bytes[i]);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn collect_refs(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(reference)) => refs.push(reference.clone()),
                    _ => collect_refs(child, refs),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_refs(item, refs)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => Document::from(map),
            _ => unreachable!(),
        }
    }

    fn valid() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "Shop", "version": "1.0.0"},
            "paths": {
                "/orders": {
                    "get": {
                        "responses": {
                            "200": {"$ref": "#/components/responses/OrderList"}
                        }
                    }
                }
            },
            "components": {"responses": {"OrderList": {"description": "Orders"}}},
            "tags": [{"name": "orders"}]
        })
    }

    #[test]
    fn test_valid_document_passes() {
        let doc = document(valid());
        assert!(BaselineValidator.validate(&doc).is_empty());
        assert_eq!(BaselineValidator.process(&doc).unwrap(), doc);
    }

    #[test]
    fn test_missing_info_fields() {
        let mut value = valid();
        value["info"] = json!({"title": "Shop"});
        let issues = BaselineValidator.validate(&document(value));
        assert_eq!(issues, vec!["'info.version' is required".to_string()]);
    }

    #[test]
    fn test_operation_without_responses() {
        let mut value = valid();
        value["paths"]["/orders"]["post"] = json!({"operationId": "createOrder"});
        value["paths"]["/orders"]["parameters"] = json!([]);
        let issues = BaselineValidator.validate(&document(value));
        assert_eq!(issues, vec!["operation post /orders has no responses".to_string()]);
    }

    #[test]
    fn test_path_must_start_with_slash() {
        let mut value = valid();
        value["paths"]["orders"] = json!({});
        let issues = BaselineValidator.validate(&document(value));
        assert_eq!(issues, vec!["path 'orders' must start with '/'".to_string()]);
    }

    #[test]
    fn test_unresolved_reference() {
        let mut value = valid();
        value["paths"]["/orders"]["get"]["parameters"] =
            json!([{"$ref": "#/components/parameters/limit"}, {"$ref": "https://example.com/p.yaml"}]);
        let issues = BaselineValidator.validate(&document(value));
        assert_eq!(
            issues,
            vec!["unresolved reference '#/components/parameters/limit'".to_string()]
        );
    }

    #[test]
    fn test_percent_encoded_reference_resolves() {
        let mut value = valid();
        value["components"]["schemas"] = json!({"Foo Bar": {"type": "object"}, "a/b": {"type": "string"}});
        value["paths"]["/orders"]["get"]["parameters"] = json!([
            {"$ref": "#/components/schemas/Foo%20Bar"},
            {"$ref": "#/components/schemas/a%2Fb"},
            {"$ref": "#/components/schemas/Foo%2"}
        ]);

        let issues = BaselineValidator.validate(&document(value));
        assert_eq!(
            issues,
            vec!["unresolved reference '#/components/schemas/Foo%2'".to_string()]
        );
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("Foo%20Bar"), "Foo Bar");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn test_duplicate_tags() {
        let mut value = valid();
        value["tags"] = json!([{"name": "orders"}, {"name": "orders"}, {"description": "x"}]);
        let issues = BaselineValidator.validate(&document(value));
        assert_eq!(
            issues,
            vec![
                "duplicate tag 'orders'".to_string(),
                "every tag needs a string 'name'".to_string()
            ]
        );
    }

    #[test]
    fn test_process_reports_all_issues() {
        let doc = document(json!({"openapi": "2.0", "paths": []}));
        let err = BaselineValidator.process(&doc).unwrap_err();
        let validation = err.downcast_ref::<ValidationError>().unwrap();
        assert_eq!(validation.issues.len(), 3);
    }

    #[test]
    fn test_noop_returns_document() {
        let doc = document(json!({"anything": true}));
        assert_eq!(NoopPostProcessor.process(&doc).unwrap(), doc);
    }
}
