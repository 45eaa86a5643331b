//! Builders for the environment and override layers.
//!
//! Both produce a nested [`Value::Map`]: key segments become nested maps and
//! every leaf is a sequence of the values given for that key. A list setting
//! takes the whole sequence, a scalar setting collapses it to the last value.

use structcast::Value;

use crate::error::CliError;

/// Settings from environment variables named `{prefix}KEY`. Names are
/// lowercased and `__` separates nesting levels.
pub fn from_env(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Value {
    let mut entries = Vec::new();
    for (name, value) in vars {
        let Some(key) = name.strip_prefix(prefix) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        let key = key.to_ascii_lowercase();
        let path: Vec<&str> = key.split("__").collect();
        tracing::debug!(var = %name, key = %key, "environment setting");
        insert_path(&mut entries, &path, Value::Text(value));
    }
    Value::Map(entries)
}

/// Settings from `KEY=VALUE` pairs; `.` separates nesting levels.
pub fn from_overrides(pairs: &[String]) -> Result<Value, CliError> {
    let mut entries = Vec::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(CliError::Config {
                context: "set",
                detail: format!("expected KEY=VALUE, got '{pair}'"),
            });
        };
        let path: Vec<&str> = key.trim().split('.').collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(CliError::Config {
                context: "set",
                detail: format!("empty key segment in '{pair}'"),
            });
        }
        insert_path(&mut entries, &path, Value::Text(value.to_string()));
    }
    Ok(Value::Map(entries))
}

fn entry_mut<'a>(entries: &'a mut [(Value, Value)], key: &str) -> Option<&'a mut Value> {
    entries
        .iter_mut()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}

fn insert_path(entries: &mut Vec<(Value, Value)>, path: &[&str], value: Value) {
    let Some((&head, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        match entry_mut(entries, head) {
            Some(Value::Seq(items)) => items.push(value),
            Some(existing) => *existing = Value::Seq(vec![value]),
            None => entries.push((Value::from(head), Value::Seq(vec![value]))),
        }
        return;
    }

    match entry_mut(entries, head) {
        Some(Value::Map(child)) => insert_path(child, rest, value),
        Some(other) => {
            let mut child = Vec::new();
            insert_path(&mut child, rest, value);
            *other = Value::Map(child);
        }
        None => {
            let mut child = Vec::new();
            insert_path(&mut child, rest, value);
            entries.push((Value::from(head), Value::Map(child)));
        }
    }
}
