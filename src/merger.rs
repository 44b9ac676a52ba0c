//! Fragment merging.
//!
//! Folds decoded fragments into the live [`Document`]. Each top-level key of a fragment is
//! routed through a [`MergePolicy`] chosen by the key's name; keys are visited in the
//! fragment's own order.

use crate::document::{is_falsy, value_kind, Document};
use crate::error::{Error, Result};
use log::{debug, warn};
use serde_json::{Map, Value};

/// A decoded unit of partial OpenAPI content
pub type Fragment = Value;

/// Component kinds accepted under `components`
pub const COMPONENT_KINDS: [&str; 9] = [
    "schemas",
    "responses",
    "parameters",
    "examples",
    "requestBodies",
    "headers",
    "securitySchemes",
    "links",
    "callbacks",
];

/// How an incoming top-level fragment key is combined with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Append tags whose `name` is not present yet
    Tags,
    /// Merge each allow-listed component kind
    Components,
    /// Merge each path template of a `paths` mapping into `paths`
    Paths,
    /// The key itself is a path template (`/users: {...}`)
    PathItem,
    /// Generic merge into the same-named top-level property
    PassThrough,
}

impl MergePolicy {
    pub fn for_key(key: &str) -> Self {
        match key {
            "tags" => MergePolicy::Tags,
            "components" => MergePolicy::Components,
            "paths" => MergePolicy::Paths,
            k if k.starts_with('/') => MergePolicy::PathItem,
            _ => MergePolicy::PassThrough,
        }
    }
}

/// Merges an ordered sequence of fragments into the document.
///
/// Fragments are applied in slice order. Unrecognized component kinds are removed from the
/// fragment's own `components` mapping as they are discarded, so callers can observe what
/// was dropped.
///
/// # Errors
///
/// Returns [`Error::InvalidFragment`] if any fragment is not a mapping. The check covers the
/// whole slice before the document is touched.
pub fn merge_fragments(document: &mut Document, fragments: &mut [Fragment]) -> Result<()> {
    if let Some((index, fragment)) = fragments
        .iter()
        .enumerate()
        .find(|(_, f)| !f.is_object())
    {
        return Err(Error::InvalidFragment {
            index,
            found: value_kind(fragment),
        });
    }

    for fragment in fragments.iter_mut() {
        if let Value::Object(properties) = fragment {
            merge_fragment(document, properties);
        }
    }

    Ok(())
}

/// Merges a single fragment's properties into the document.
pub fn merge_fragment(document: &mut Document, fragment: &mut Map<String, Value>) {
    for (key, value) in fragment.iter_mut() {
        let policy = MergePolicy::for_key(key);
        debug!("Merging fragment key '{}' as {:?}", key, policy);

        match policy {
            MergePolicy::Tags => add_tags(document, value),
            MergePolicy::Components => add_components(document, value),
            MergePolicy::Paths => match value {
                Value::Object(templates) => {
                    for (template, item) in templates.iter() {
                        merge_path_item(document, template, item.clone());
                    }
                }
                other => warn!("Ignoring 'paths' fragment that is {}", value_kind(other)),
            },
            MergePolicy::PathItem => merge_path_item(document, key, value.clone()),
            MergePolicy::PassThrough => merge_into(document.slot(key), value.clone()),
        }
    }
}

/// Appends tags whose `name` has not been seen yet. The first occurrence wins.
fn add_tags(document: &mut Document, incoming: &Value) {
    let Value::Array(incoming) = incoming else {
        warn!("Ignoring 'tags' fragment that is {}", value_kind(incoming));
        return;
    };

    let slot = document.slot("tags");
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    let Value::Array(tags) = slot else {
        return;
    };

    for tag in incoming {
        let name = tag.get("name");
        if tags.iter().any(|existing| existing.get("name") == name) {
            debug!("Skipping duplicate tag {:?}", name);
            continue;
        }
        tags.push(tag.clone());
    }
}

/// Merges allow-listed component kinds and prunes the rest from the fragment.
fn add_components(document: &mut Document, incoming: &mut Value) {
    let Value::Object(kinds) = incoming else {
        warn!("Ignoring 'components' fragment that is {}", value_kind(incoming));
        return;
    };

    kinds.retain(|kind, _| {
        let known = COMPONENT_KINDS.contains(&kind.as_str());
        if !known {
            warn!("Discarding unknown component kind '{}'", kind);
        }
        known
    });

    let slot = document.slot("components");
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    let Value::Object(components) = slot else {
        return;
    };

    for (kind, value) in kinds.iter() {
        let entry = components.entry(kind.as_str()).or_insert(Value::Null);
        merge_into(entry, value.clone());
    }
}

fn merge_path_item(document: &mut Document, template: &str, item: Value) {
    let slot = document.slot("paths");
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(paths) = slot {
        let entry = paths.entry(template).or_insert(Value::Null);
        merge_into(entry, item);
    }
}

fn merge_into(slot: &mut Value, incoming: Value) {
    let existing = std::mem::take(slot);
    *slot = merge_values(existing, incoming);
}

/// Combines an existing value with an incoming one.
///
/// - two sequences are concatenated, existing first;
/// - a sequence paired with a falsy value is kept as is;
/// - everything else becomes a new mapping holding the existing keys, then the incoming
///   keys, so incoming values replace existing ones wholesale on collision. Only mappings
///   contribute keys.
///
/// `null` stands for an absent value.
pub fn merge_values(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (Value::Array(mut a), Value::Array(b)) => {
            a.extend(b);
            Value::Array(a)
        }
        (a, Value::Array(b)) if is_falsy(Some(&a)) => Value::Array(b),
        (Value::Array(a), b) if is_falsy(Some(&b)) => Value::Array(a),
        (a, b) => {
            let mut merged = Map::new();
            for side in [a, b] {
                if let Value::Object(map) = side {
                    // Map::insert keeps the original position of a replaced key
                    for (key, value) in map {
                        merged.insert(key, value);
                    }
                }
            }
            Value::Object(merged)
        }
    }
}
