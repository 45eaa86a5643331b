use std::borrow::Cow;

use crate::reflect::{DynamicSlot, MapView, Reflect, Slot, View};
use crate::value::Value;

// ═══════════════════════════════════════════════════════════════
//  serde_json::Value as a source and a dynamic destination
// ═══════════════════════════════════════════════════════════════

impl Reflect for serde_json::Value {
    fn view(&self) -> View<'_> {
        match self {
            serde_json::Value::Null => View::Null,
            serde_json::Value::Bool(b) => View::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    View::Int(i)
                } else if let Some(u) = n.as_u64() {
                    View::Uint(u)
                } else {
                    View::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => View::Text(Cow::Borrowed(s)),
            serde_json::Value::Array(items) => View::Seq(items),
            serde_json::Value::Object(map) => View::Map(map),
        }
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }
}

impl DynamicSlot for serde_json::Value {
    fn assign(&mut self, value: Value) {
        *self = value.into();
    }
}

impl MapView for serde_json::Map<String, serde_json::Value> {
    fn len(&self) -> usize {
        serde_json::Map::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

// ═══════════════════════════════════════════════════════════════
//  Value ↔ serde_json::Value
// ═══════════════════════════════════════════════════════════════

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Value::Text(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Bytes become an array of numbers; non-finite floats become `null`.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::json!(i),
            Value::Uint(u) => serde_json::json!(u),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Text(s) => serde_json::Value::String(s),
            Value::Bytes(b) => serde_json::json!(b),
            Value::Seq(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (key_text(k), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn key_text(key: Value) -> String {
    match key {
        Value::Text(s) => s,
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) => u.to_string(),
        Value::Float(f) => crate::parse::format_float(f),
        other => serde_json::Value::from(other).to_string(),
    }
}
