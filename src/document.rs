use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OpenAPI version stamped on every generated document
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Root properties kept from the caller's definition, with their empty defaults
const ROOT_PROPERTIES: [(&str, RootKind); 7] = [
    ("info", RootKind::Object),
    ("servers", RootKind::Sequence),
    ("paths", RootKind::Object),
    ("components", RootKind::Object),
    ("security", RootKind::Sequence),
    ("tags", RootKind::Sequence),
    ("externalDocs", RootKind::Object),
];

#[derive(Clone, Copy)]
enum RootKind {
    Object,
    Sequence,
}

impl RootKind {
    fn empty(self) -> Value {
        match self {
            RootKind::Object => Value::Object(Map::new()),
            RootKind::Sequence => Value::Array(Vec::new()),
        }
    }
}

/// The aggregated OpenAPI document.
///
/// Backed by an insertion-ordered JSON map so that keys keep the order in which fragments
/// contributed them. Unrecognized top-level keys from fragments are allowed to live here
/// alongside the standard OpenAPI properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    /// Builds the merge seed from the caller's root definition.
    ///
    /// Every top-level key outside `info`, `servers`, `paths`, `components`, `security`,
    /// `tags` and `externalDocs` is dropped, `openapi` is set to [`OPENAPI_VERSION`], and
    /// each of the seven properties is filled with an empty object or sequence when it is
    /// missing or falsy. The definition is consumed; the caller keeps no alias to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDefinition`] if the definition is not a mapping.
    pub fn from_definition(definition: Value) -> Result<Self> {
        let mut definition = match definition {
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidDefinition(format!(
                    "expected a mapping, found {}",
                    value_kind(&other)
                )))
            }
        };

        for key in definition.keys() {
            if !ROOT_PROPERTIES.iter().any(|(name, _)| *name == key.as_str()) {
                debug!("Dropping unsupported root property: {}", key);
            }
        }

        let mut root = Map::new();
        root.insert("openapi".to_string(), Value::from(OPENAPI_VERSION));
        for (name, kind) in ROOT_PROPERTIES {
            let value = match definition.remove(name) {
                Some(value) if !is_falsy(Some(&value)) => value,
                _ => kind.empty(),
            };
            root.insert(name.to_string(), value);
        }

        Ok(Self { root })
    }

    /// Returns the value stored under a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Looks up a value by JSON pointer, e.g. `/paths/~1users/get`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        match rest.split_once('/') {
            None => self.root.get(&unescape_token(rest)),
            Some((head, tail)) => self
                .root
                .get(&unescape_token(head))?
                .pointer(&format!("/{}", tail)),
        }
    }

    /// Returns the slot for a top-level key, inserting `null` if it does not exist yet.
    pub(crate) fn slot(&mut self, key: &str) -> &mut Value {
        self.root.entry(key).or_insert(Value::Null)
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Consumes the document and returns it as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Absent, `null`, `false`, `0` and `""` count as "no value" for defaults and merges.
pub(crate) fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Short human-readable name of a value's type, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
