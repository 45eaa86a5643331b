//! Field resolution: external name → location inside a record.
//!
//! Locations are index paths from the root record. A path longer than one
//! step passes through flattened sub-records, so multi-level flattening
//! still yields a single flat table.

use std::collections::HashMap;

use crate::record::{FieldDef, IGNORE_ALIAS, Record};
use crate::reflect::{Reflect, Slot, View};

/// Index path from a root record to one of its (possibly flattened) fields.
pub type FieldPath = Vec<usize>;

pub struct FieldEntry {
    pub name: String,
    pub path: FieldPath,
}

/// Resolved name table of one record.
///
/// Entries keep first-registration order; a later registration of the same
/// name replaces the path in place.
#[derive(Default)]
pub struct FieldMap {
    entries: Vec<FieldEntry>,
    index: HashMap<String, usize>,
}

impl FieldMap {
    pub fn get(&self, name: &str) -> Option<&FieldPath> {
        self.index.get(name).map(|&i| &self.entries[i].path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter()
    }

    fn insert(&mut self, name: &str, path: FieldPath) {
        match self.index.get(name) {
            Some(&i) => {
                tracing::trace!(name, from = ?self.entries[i].path, to = ?path, "field name overwritten");
                self.entries[i].path = path;
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(FieldEntry {
                    name: name.to_string(),
                    path,
                });
            }
        }
    }
}

enum Binding<'d> {
    Named(&'d str),
    Flatten,
    Hidden,
}

fn binding(def: &FieldDef) -> Binding<'_> {
    match def.alias {
        Some(alias) if alias != IGNORE_ALIAS => Binding::Named(alias),
        _ if def.flatten => Binding::Flatten,
        _ if def.exported => Binding::Named(def.ident),
        _ => Binding::Hidden,
    }
}

/// Resolve the external names of a destination record.
///
/// A flattened field holding an absent `Option` is filled with its default
/// first, so that writes through the hoisted names have somewhere to land.
pub fn resolve(record: &mut dyn Record) -> FieldMap {
    let mut map = FieldMap::default();
    resolve_into(&mut map, record, &mut Vec::new());
    map
}

fn resolve_into(map: &mut FieldMap, record: &mut dyn Record, prefix: &mut Vec<usize>) {
    let type_name = record.type_name();
    for (index, def) in record.field_defs().iter().enumerate() {
        prefix.push(index);
        match binding(def) {
            Binding::Named(name) => map.insert(name, prefix.clone()),
            Binding::Flatten => match record.field_mut(index).and_then(record_mut) {
                Some(child) => resolve_into(map, child, prefix),
                None => tracing::debug!(
                    record = type_name,
                    field = def.ident,
                    "flatten marker on a non-record field"
                ),
            },
            Binding::Hidden => {}
        }
        prefix.pop();
    }
}

/// Read-only resolution, used for source records.
///
/// Absent flattened optionals contribute no names.
pub fn resolve_view(record: &dyn Record) -> FieldMap {
    let mut map = FieldMap::default();
    resolve_view_into(&mut map, record, &mut Vec::new());
    map
}

fn resolve_view_into(map: &mut FieldMap, record: &dyn Record, prefix: &mut Vec<usize>) {
    for (index, def) in record.field_defs().iter().enumerate() {
        prefix.push(index);
        match binding(def) {
            Binding::Named(name) => map.insert(name, prefix.clone()),
            Binding::Flatten => {
                if let Some(child) = record.field(index).and_then(record_ref) {
                    resolve_view_into(map, child, prefix);
                }
            }
            Binding::Hidden => {}
        }
        prefix.pop();
    }
}

/// Descend into the record behind `field`, allocating absent optionals.
pub(crate) fn record_mut(field: &mut dyn Reflect) -> Option<&mut dyn Record> {
    match field.slot() {
        Slot::Record(record) => Some(record),
        Slot::Optional(opt) => {
            tracing::trace!("descending into optional field");
            record_mut(opt.get_or_insert())
        }
        _ => None,
    }
}

pub(crate) fn record_ref(field: &dyn Reflect) -> Option<&dyn Record> {
    match field.view() {
        View::Record(record) => Some(record),
        View::Optional(Some(inner)) => record_ref(inner),
        _ => None,
    }
}

/// Walk `path` from `record` to a writable field.
pub fn locate_mut<'a>(record: &'a mut dyn Record, path: &[usize]) -> Option<&'a mut dyn Reflect> {
    let (&first, rest) = path.split_first()?;
    let field = record.field_mut(first)?;
    if rest.is_empty() {
        return Some(field);
    }
    locate_mut(record_mut(field)?, rest)
}

/// Walk `path` from `record` to a readable field.
pub fn locate<'a>(record: &'a dyn Record, path: &[usize]) -> Option<&'a dyn Reflect> {
    let (&first, rest) = path.split_first()?;
    let field = record.field(first)?;
    if rest.is_empty() {
        return Some(field);
    }
    locate(record_ref(field)?, rest)
}
