//! Field-level comparison of two entity snapshots.

use std::collections::BTreeSet;

use port_migrator_client::Entity;
use serde::Serialize;
use serde_json::{Map, Value};

/// Audit and routing fields ignored at every nesting level.
pub const EXCLUDED_FIELDS: [&str; 5] = [
    "blueprint",
    "createdAt",
    "updatedAt",
    "createdBy",
    "updatedBy",
];

fn is_excluded(key: &str) -> bool {
    EXCLUDED_FIELDS.contains(&key)
}

/// One leaf difference. `None` means the field is absent on that side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub path: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// The part of an entity that takes part in comparison. An empty title is
/// the same as no title.
fn comparable(entity: &Entity) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Some(title) = entity.title.as_ref().filter(|title| !title.is_empty()) {
        fields.insert("title".to_string(), Value::String(title.clone()));
    }
    fields.insert(
        "properties".to_string(),
        Value::Object(entity.properties.clone()),
    );
    if let Some(relations) = &entity.relations {
        fields.insert("relations".to_string(), relations.clone());
    }
    fields
}

/// Copy of `value` with excluded keys removed from every nested mapping.
fn strip_excluded(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !is_excluded(key))
                .map(|(key, v)| (key.clone(), strip_excluded(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_excluded).collect()),
        scalar => scalar.clone(),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn collect_changes(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    prefix: &str,
    out: &mut Vec<FieldChange>,
) {
    let keys: BTreeSet<&str> = old
        .keys()
        .chain(new.keys())
        .map(String::as_str)
        .filter(|key| !is_excluded(key))
        .collect();

    for key in keys {
        let path = join(prefix, key);
        match (old.get(key), new.get(key)) {
            (Some(Value::Object(a)), Some(Value::Object(b))) => {
                collect_changes(a, b, &path, out);
            }
            (a, b) => {
                let a = a.map(strip_excluded);
                let b = b.map(strip_excluded);
                if a != b {
                    out.push(FieldChange {
                        path,
                        old_value: a,
                        new_value: b,
                    });
                }
            }
        }
    }
}

/// Leaf differences between two mappings, ordered by path.
pub fn map_changes(old: &Map<String, Value>, new: &Map<String, Value>) -> Vec<FieldChange> {
    let mut out = Vec::new();
    collect_changes(old, new, "", &mut out);
    out
}

/// Leaf differences between the title, properties and relations of two
/// entities. Empty exactly when the entities compare equal.
pub fn entity_changes(old: &Entity, new: &Entity) -> Vec<FieldChange> {
    map_changes(&comparable(old), &comparable(new))
}
