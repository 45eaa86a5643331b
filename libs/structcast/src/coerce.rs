//! The recursive conversion algorithm.
//!
//! Each step dispatches on the destination slot kind, then on the source view
//! kind. Records are matched by resolved external name (see [`crate::resolve`]).

use crate::error::CoerceError;
use crate::parse::{format_float, parse_bool, parse_float, parse_int};
use crate::record::Record;
use crate::reflect::{MapView, Reflect, Slot, View};
use crate::resolve::{locate, locate_mut, resolve, resolve_view};
use crate::value::{Kind, Value};

/// Convert `src` into `dest`, coercing kinds along the way.
///
/// Fields that have no counterpart in `src` keep their current value, so
/// repeated calls merge sources into the destination. An absent source is a
/// no-op.
///
/// # Errors
///
/// The first failing field aborts the conversion. `dest` may then be
/// partially written.
pub fn convert(dest: &mut dyn Reflect, src: &dyn Reflect) -> Result<(), CoerceError> {
    match unwrap_optional(src.view()) {
        View::Null => Ok(()),
        _ => coerce(dest, src.view()),
    }
}

/// Convert `src` into a default-constructed `T`.
pub fn from_source<T: Reflect + Default>(src: &dyn Reflect) -> Result<T, CoerceError> {
    let mut dest = T::default();
    convert(&mut dest, src)?;
    Ok(dest)
}

/// Snapshot any source into an owned [`Value`].
///
/// Records become text-keyed maps of their resolved external names, absent
/// optionals become `Null`.
pub fn to_value(src: &dyn Reflect) -> Value {
    capture(src.view())
}

fn capture(view: View<'_>) -> Value {
    match view {
        View::Null | View::Optional(None) => Value::Null,
        View::Bool(v) => Value::Bool(v),
        View::Int(v) => Value::Int(v),
        View::Uint(v) => Value::Uint(v),
        View::Float(v) => Value::Float(v),
        View::Text(v) => Value::Text(v.into_owned()),
        View::Bytes(v) => Value::Bytes(v.into_owned()),
        View::Optional(Some(inner)) => capture(inner.view()),
        View::Seq(items) => Value::Seq(
            (0..items.len())
                .map(|i| items.item(i).map_or(Value::Null, to_value))
                .collect(),
        ),
        View::Map(map) => Value::Map(
            map.entries()
                .map(|(k, v)| (to_value(k), to_value(v)))
                .collect(),
        ),
        View::Record(record) => {
            let fields = resolve_view(record);
            Value::Map(
                fields
                    .iter()
                    .filter_map(|entry| {
                        let field = locate(record, &entry.path)?;
                        Some((Value::Text(entry.name.clone()), to_value(field)))
                    })
                    .collect(),
            )
        }
    }
}

/// Strip nullable wrappers. An absent value becomes `Null`.
fn unwrap_optional(view: View<'_>) -> View<'_> {
    match view {
        View::Optional(Some(inner)) => unwrap_optional(inner.view()),
        View::Optional(None) => View::Null,
        other => other,
    }
}

fn coerce(dest: &mut dyn Reflect, view: View<'_>) -> Result<(), CoerceError> {
    if let Some(hook) = dest.text_hook() {
        match &view {
            View::Text(text) => return hook.unmarshal_text(text.as_bytes()),
            View::Bytes(bytes) => return hook.unmarshal_text(bytes),
            _ => {}
        }
    }

    let view = unwrap_optional(view);

    // Anything but a sequence fed a sequence takes its last element. An
    // optional defers to its target.
    let dest_kind = dest.slot().kind();
    if !matches!(dest_kind, Kind::Seq | Kind::Optional) {
        match &view {
            View::Seq(items) => {
                tracing::trace!(dest = %dest_kind, len = items.len(), "collapsing sequence to its last element");
                return match items.len().checked_sub(1).and_then(|last| items.item(last)) {
                    Some(last) => coerce(dest, last.view()),
                    None => Ok(()),
                };
            }
            View::Bytes(bytes) => {
                tracing::trace!(dest = %dest_kind, len = bytes.len(), "collapsing bytes to the last byte");
                return match bytes.last() {
                    Some(&last) => coerce(dest, View::Int(i64::from(last))),
                    None => Ok(()),
                };
            }
            _ => {}
        }
    }

    match dest.slot() {
        Slot::Optional(opt) => coerce(opt.get_or_insert(), view),
        Slot::Int(slot) => {
            let value = match view {
                View::Text(text) => parse_int(&text)?,
                View::Int(v) => v,
                View::Uint(v) => return slot.set_uint(v),
                View::Float(v) => v as i64,
                View::Bool(v) => i64::from(v),
                other => return Err(CoerceError::unsupported(Kind::Int, other.kind())),
            };
            slot.set_int(value);
            Ok(())
        }
        Slot::Float(slot) => {
            let value = match view {
                View::Text(text) => parse_float(&text)?,
                View::Int(v) => v as f64,
                View::Uint(v) => v as f64,
                View::Float(v) => v,
                View::Bool(v) => f64::from(u8::from(v)),
                other => return Err(CoerceError::unsupported(Kind::Float, other.kind())),
            };
            slot.set_float(value);
            Ok(())
        }
        Slot::Bool(slot) => {
            *slot = match view {
                View::Text(text) => parse_bool(&text)?,
                View::Int(v) => v != 0,
                View::Uint(v) => v != 0,
                View::Float(v) => v != 0.0,
                View::Bool(v) => v,
                other => return Err(CoerceError::unsupported(Kind::Bool, other.kind())),
            };
            Ok(())
        }
        Slot::Text(slot) => {
            *slot = match view {
                View::Text(text) => text.into_owned(),
                View::Int(v) => v.to_string(),
                View::Uint(v) => v.to_string(),
                View::Float(v) => format_float(v),
                View::Bool(v) => v.to_string(),
                other => return Err(CoerceError::unsupported(Kind::Text, other.kind())),
            };
            Ok(())
        }
        Slot::Seq(seq) => match view {
            View::Seq(items) => seq.rebuild(items.len(), &mut |i: usize, item: &mut dyn Reflect| {
                coerce(item, items.item(i).map_or(View::Null, |src| src.view()))
            }),
            View::Bytes(bytes) => seq.rebuild(bytes.len(), &mut |i: usize, item: &mut dyn Reflect| {
                coerce(item, View::Int(i64::from(bytes[i])))
            }),
            other => Err(CoerceError::unsupported(Kind::Seq, other.kind())),
        },
        Slot::Record(record) => match view {
            View::Map(map) => coerce_map(record, map),
            View::Record(src) => coerce_record(record, src),
            other => Err(CoerceError::unsupported(Kind::Record, other.kind())),
        },
        Slot::Dynamic(slot) => {
            slot.assign(capture(view));
            Ok(())
        }
        Slot::Opaque(kind) => Err(CoerceError::unsupported(kind, view.kind())),
    }
}

fn coerce_map(record: &mut dyn Record, map: &dyn MapView) -> Result<(), CoerceError> {
    let fields = resolve(record);
    tracing::trace!(record = record.type_name(), keys = map.len(), "filling record from map");
    for (key, value) in map.entries() {
        let name = match key.view() {
            View::Text(name) => name,
            other => return Err(CoerceError::UnknownSourceMapKeyType(other.kind())),
        };
        let Some(path) = fields.get(&name) else {
            tracing::trace!(record = record.type_name(), key = %name, "ignoring unknown source key");
            continue;
        };
        if let Some(field) = locate_mut(record, path) {
            coerce(field, value.view())?;
        }
    }
    Ok(())
}

fn coerce_record(record: &mut dyn Record, src: &dyn Record) -> Result<(), CoerceError> {
    if record.assign_from(src) {
        return Ok(());
    }

    let dest_fields = resolve(record);
    let src_fields = resolve_view(src);
    for entry in src_fields.iter() {
        let Some(path) = dest_fields.get(&entry.name) else {
            continue;
        };
        let Some(value) = locate(src, &entry.path) else {
            continue;
        };
        if let Some(field) = locate_mut(record, path) {
            coerce(field, value.view())?;
        }
    }
    Ok(())
}
