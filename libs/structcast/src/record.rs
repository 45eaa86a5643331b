use std::any::Any;

use crate::reflect::Reflect;

/// Alias value that means "no alias": resolution falls through to the
/// flatten and visibility rules.
pub const IGNORE_ALIAS: &str = "-";

/// Compile-time metadata for one field of a record.
///
/// Emitted by `#[derive(Reflect)]`; hand-written [`Record`] impls build
/// these directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust identifier of the field.
    pub ident: &'static str,
    /// External name from `#[reflect(rename = "...")]`.
    pub alias: Option<&'static str>,
    /// `#[reflect(flatten)]`: hoist the sub-record's names into the parent.
    pub flatten: bool,
    /// Declared with any visibility, `pub(crate)` included.
    pub exported: bool,
}

impl FieldDef {
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            alias: None,
            flatten: false,
            exported: true,
        }
    }

    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn flatten(mut self) -> Self {
        self.flatten = true;
        self
    }

    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// A structured record with indexed fields.
///
/// Field indices follow declaration order and match [`Record::field_defs`].
pub trait Record {
    fn type_name(&self) -> &'static str;

    fn field_defs(&self) -> &'static [FieldDef];

    fn field(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn as_any(&self) -> &dyn Any;

    /// Whole-record copy from `src` when it has the same concrete type.
    /// Returns `false`, leaving `self` untouched, otherwise.
    fn assign_from(&mut self, src: &dyn Record) -> bool;
}
