//! In-memory Planka entities and their JSON mapping.
//!
//! Each entity declares its fields statically. The JSON boundary is handled
//! by [`Model`]: `parse` and `load_json` copy only recognized keys and
//! `as_mapping` walks the declared fields, emitting child entities as nested
//! objects.

mod board;
mod card;
mod list;
mod project;

pub use board::Board;
pub use card::Card;
pub use list::List;
pub use project::Project;

use serde_json::{Map, Value};

/// A JSON object, the generic document shape for every entity.
pub type Mapping = Map<String, Value>;

/// Value of one declared field, as seen at the JSON boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain JSON value (numbers, strings, booleans, lists of strings).
    Scalar(Value),
    /// Ordered child entities, already rendered as mappings.
    Children(Vec<Mapping>),
}

impl FieldValue {
    fn id(id: Option<i64>) -> Self {
        FieldValue::Scalar(id.map(Value::from).unwrap_or(Value::Null))
    }

    fn text(text: &Option<String>) -> Self {
        FieldValue::Scalar(text.clone().map(Value::from).unwrap_or(Value::Null))
    }

    fn int(value: i64) -> Self {
        FieldValue::Scalar(Value::from(value))
    }

    fn children<M: Model>(children: &[M]) -> Self {
        FieldValue::Children(children.iter().map(Model::as_mapping).collect())
    }
}

/// Shared JSON behaviour for Planka entities.
pub trait Model: Default + Sized {
    /// Entity name used in log lines and `Display`.
    const KIND: &'static str;

    /// Keys recognized by `parse`, `load_json` and `as_mapping`.
    const FIELDS: &'static [&'static str];

    /// Merge `doc` into this entity.
    ///
    /// Scalar fields are replaced only when `force` is set or they still hold
    /// their default value. Child collections are always re-parsed.
    fn load_json(&mut self, doc: &Mapping, force: bool);

    /// The declared fields in declaration order.
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;

    /// Build a new entity from `doc`. Unknown keys are ignored.
    fn parse(doc: &Mapping) -> Self {
        let mut model = Self::default();
        model.load_json(doc, true);
        model
    }

    /// Nested mapping view with falsy values left out.
    fn as_mapping(&self) -> Mapping {
        let mut out = Mapping::new();
        for (key, value) in self.fields() {
            match value {
                FieldValue::Scalar(value) => {
                    if value.is_boolean() || is_truthy(&value) {
                        out.insert(key.to_string(), value);
                    }
                }
                FieldValue::Children(children) => {
                    if !children.is_empty() {
                        out.insert(
                            key.to_string(),
                            Value::Array(children.into_iter().map(Value::Object).collect()),
                        );
                    }
                }
            }
        }
        out
    }
}

/// JSON truthiness: null, false, 0, "" and empty containers are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Keys of `doc` that `M` does not recognize and will ignore.
pub fn unknown_keys<'a, M: Model>(doc: &'a Mapping) -> Vec<&'a str> {
    doc.keys()
        .map(String::as_str)
        .filter(|key| !M::FIELDS.contains(key))
        .collect()
}

/// Parse a JSON array of child objects. Entries that are not objects become
/// empty children.
pub(crate) fn parse_children<M: Model>(value: &Value) -> Vec<M> {
    let empty = Mapping::new();
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| M::parse(item.as_object().unwrap_or(&empty)))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn merge_id(slot: &mut Option<i64>, value: &Value, force: bool) {
    if !(force || slot.is_none()) {
        return;
    }
    match value {
        Value::Null => *slot = None,
        other => {
            if let Some(v) = other.as_i64() {
                *slot = Some(v);
            }
        }
    }
}

pub(crate) fn merge_text(slot: &mut Option<String>, value: &Value, force: bool) {
    if !(force || slot.is_none()) {
        return;
    }
    match value {
        Value::Null => *slot = None,
        Value::String(s) => *slot = Some(s.clone()),
        _ => {}
    }
}

pub(crate) fn merge_int(slot: &mut i64, value: &Value, force: bool) {
    if !(force || *slot == 0) {
        return;
    }
    if let Some(v) = value.as_i64() {
        *slot = v;
    }
}

pub(crate) fn merge_strings(slot: &mut Vec<String>, value: &Value, force: bool) {
    if !(force || slot.is_empty()) {
        return;
    }
    if let Some(items) = value.as_array() {
        *slot = items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect();
    }
}

/// `"<Kind>: <id> - <name>"`, with `?` for an unresolved id.
pub(crate) fn describe(
    f: &mut std::fmt::Formatter<'_>,
    kind: &str,
    id: Option<i64>,
    name: &Option<String>,
) -> std::fmt::Result {
    match id {
        Some(id) => write!(f, "{}: {} - {}", kind, id, name.as_deref().unwrap_or("")),
        None => write!(f, "{}: ? - {}", kind, name.as_deref().unwrap_or("")),
    }
}
