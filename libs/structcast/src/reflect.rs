//! Read and write handles over reflectable values.
//!
//! Every type that can take part in a conversion implements [`Reflect`]:
//! - [`Reflect::view`] exposes it as a read-only source ([`View`])
//! - [`Reflect::slot`] exposes it as a writable destination ([`Slot`])
//!
//! Records get both from `#[derive(Reflect)]`. Types that want to bypass the
//! generic rules when fed text or bytes return a hook from
//! [`Reflect::text_hook`]; see [`reflect_from_str!`](crate::reflect_from_str).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::error::CoerceError;
use crate::record::Record;
use crate::value::{Kind, Value};

pub trait Reflect {
    fn view(&self) -> View<'_>;

    fn slot(&mut self) -> Slot<'_>;

    /// Custom parse-from-text capability. When present and the source is
    /// text or bytes, the coercer delegates to it and skips its own rules.
    fn text_hook(&mut self) -> Option<&mut dyn UnmarshalText> {
        None
    }
}

/// Destination-side override for text and byte sources.
pub trait UnmarshalText {
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), CoerceError>;
}

/// Borrowed, read-only view of a source value.
#[derive(Clone)]
pub enum View<'a> {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned value above `i64::MAX`.
    Uint(u64),
    Float(f64),
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Seq(&'a dyn SeqView),
    Map(&'a dyn MapView),
    Record(&'a dyn Record),
    /// Nullable wrapper; `None` is an absent value.
    Optional(Option<&'a dyn Reflect>),
}

impl View<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            View::Null => Kind::Null,
            View::Bool(_) => Kind::Bool,
            View::Int(_) => Kind::Int,
            View::Uint(_) => Kind::Uint,
            View::Float(_) => Kind::Float,
            View::Text(_) => Kind::Text,
            View::Bytes(_) => Kind::Bytes,
            View::Seq(_) => Kind::Seq,
            View::Map(_) => Kind::Map,
            View::Record(_) => Kind::Record,
            View::Optional(_) => Kind::Optional,
        }
    }
}

/// Writable handle to a destination location.
pub enum Slot<'a> {
    Int(&'a mut dyn IntSlot),
    Float(&'a mut dyn FloatSlot),
    Bool(&'a mut bool),
    Text(&'a mut String),
    Seq(&'a mut dyn SeqSlot),
    Record(&'a mut dyn Record),
    Optional(&'a mut dyn OptionalSlot),
    Dynamic(&'a mut dyn DynamicSlot),
    /// Readable but not assignable (maps, borrowed strings).
    Opaque(Kind),
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Slot::Int(_) => Kind::Int,
            Slot::Float(_) => Kind::Float,
            Slot::Bool(_) => Kind::Bool,
            Slot::Text(_) => Kind::Text,
            Slot::Seq(_) => Kind::Seq,
            Slot::Record(_) => Kind::Record,
            Slot::Optional(_) => Kind::Optional,
            Slot::Dynamic(_) => Kind::Dynamic,
            Slot::Opaque(kind) => *kind,
        }
    }
}

pub trait IntSlot {
    /// Store `value`, truncating or wrapping to the slot's width.
    fn set_int(&mut self, value: i64);

    /// Store an unsigned value above `i64::MAX`. Fails unless the slot's type
    /// holds it exactly.
    fn set_uint(&mut self, value: u64) -> Result<(), CoerceError>;
}

pub trait FloatSlot {
    fn set_float(&mut self, value: f64);
}

pub trait SeqSlot {
    /// Replace the sequence with `len` fresh elements, each filled by `fill`.
    ///
    /// The old contents are only replaced once every element has been filled.
    fn rebuild(
        &mut self,
        len: usize,
        fill: &mut dyn FnMut(usize, &mut dyn Reflect) -> Result<(), CoerceError>,
    ) -> Result<(), CoerceError>;
}

pub trait OptionalSlot {
    /// The contained value, allocated from `Default` when absent.
    fn get_or_insert(&mut self) -> &mut dyn Reflect;
}

pub trait DynamicSlot {
    fn assign(&mut self, value: Value);
}

pub trait SeqView {
    fn len(&self) -> usize;

    fn item(&self, index: usize) -> Option<&dyn Reflect>;
}

pub trait MapView {
    fn len(&self) -> usize;

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

macro_rules! reflect_int {
    ($($ty:ty),*) => {$(
        impl IntSlot for $ty {
            fn set_int(&mut self, value: i64) {
                *self = value as $ty;
            }

            fn set_uint(&mut self, value: u64) -> Result<(), CoerceError> {
                *self = <$ty>::try_from(value)
                    .map_err(|_| CoerceError::unsupported(Kind::Int, Kind::Uint))?;
                Ok(())
            }
        }

        impl Reflect for $ty {
            #[allow(unreachable_patterns, clippy::unnecessary_fallible_conversions)]
            fn view(&self) -> View<'_> {
                match i64::try_from(*self) {
                    Ok(value) => View::Int(value),
                    Err(_) => View::Uint(*self as u64),
                }
            }

            fn slot(&mut self) -> Slot<'_> {
                Slot::Int(self)
            }
        }
    )*};
}

reflect_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! reflect_float {
    ($($ty:ty),*) => {$(
        impl FloatSlot for $ty {
            fn set_float(&mut self, value: f64) {
                *self = value as $ty;
            }
        }

        impl Reflect for $ty {
            fn view(&self) -> View<'_> {
                View::Float(f64::from(*self))
            }

            fn slot(&mut self) -> Slot<'_> {
                Slot::Float(self)
            }
        }
    )*};
}

reflect_float!(f32, f64);

impl Reflect for bool {
    fn view(&self) -> View<'_> {
        View::Bool(*self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Bool(self)
    }
}

impl Reflect for String {
    fn view(&self) -> View<'_> {
        View::Text(Cow::Borrowed(self))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Text(self)
    }
}

impl Reflect for &str {
    fn view(&self) -> View<'_> {
        View::Text(Cow::Borrowed(self))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Opaque(Kind::Text)
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

impl<T: Reflect> SeqView for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn item(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|item| item as &dyn Reflect)
    }
}

impl<T: Reflect + Default> SeqSlot for Vec<T> {
    fn rebuild(
        &mut self,
        len: usize,
        fill: &mut dyn FnMut(usize, &mut dyn Reflect) -> Result<(), CoerceError>,
    ) -> Result<(), CoerceError> {
        let mut items = Vec::with_capacity(len);
        for index in 0..len {
            let mut item = T::default();
            fill(index, &mut item)?;
            items.push(item);
        }
        *self = items;
        Ok(())
    }
}

impl<T: Reflect + Default> Reflect for Vec<T> {
    fn view(&self) -> View<'_> {
        View::Seq(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Seq(self)
    }
}

impl<T: Reflect + Default> OptionalSlot for Option<T> {
    fn get_or_insert(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }
}

impl<T: Reflect + Default> Reflect for Option<T> {
    fn view(&self) -> View<'_> {
        View::Optional(self.as_ref().map(|inner| inner as &dyn Reflect))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Optional(self)
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn view(&self) -> View<'_> {
        (**self).view()
    }

    fn slot(&mut self) -> Slot<'_> {
        (**self).slot()
    }

    fn text_hook(&mut self) -> Option<&mut dyn UnmarshalText> {
        (**self).text_hook()
    }
}

impl<K: Reflect, V: Reflect, S> MapView for HashMap<K, V, S> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn view(&self) -> View<'_> {
        View::Map(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Opaque(Kind::Map)
    }
}

impl<K: Reflect, V: Reflect> MapView for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn view(&self) -> View<'_> {
        View::Map(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Opaque(Kind::Map)
    }
}

// ---------------------------------------------------------------------------
// Dynamic
// ---------------------------------------------------------------------------

impl MapView for Vec<(Value, Value)> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
        )
    }
}

impl DynamicSlot for Value {
    fn assign(&mut self, value: Value) {
        *self = value;
    }
}

/// A `Value` exposes its contents directly: the dynamic wrapper is unwrapped
/// by the view itself.
impl Reflect for Value {
    fn view(&self) -> View<'_> {
        match self {
            Value::Null => View::Null,
            Value::Bool(v) => View::Bool(*v),
            Value::Int(v) => View::Int(*v),
            Value::Uint(v) => View::Uint(*v),
            Value::Float(v) => View::Float(*v),
            Value::Text(v) => View::Text(Cow::Borrowed(v)),
            Value::Bytes(v) => View::Bytes(Cow::Borrowed(v)),
            Value::Seq(items) => View::Seq(items),
            Value::Map(entries) => View::Map(entries),
        }
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }
}

/// Implement [`Reflect`] for a `FromStr + Display` type.
///
/// The type reads as text and parses text or UTF-8 bytes through its
/// `FromStr` impl, bypassing the generic coercion rules.
///
/// ```ignore
/// structcast::reflect_from_str!(std::net::IpAddr);
/// ```
#[macro_export]
macro_rules! reflect_from_str {
    ($ty:ty) => {
        impl $crate::UnmarshalText for $ty {
            fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), $crate::CoerceError> {
                let text = ::core::str::from_utf8(text)
                    .map_err(|e| $crate::CoerceError::unmarshal(stringify!($ty), e))?;
                *self = text
                    .parse::<$ty>()
                    .map_err(|e| $crate::CoerceError::unmarshal(stringify!($ty), e))?;
                Ok(())
            }
        }

        impl $crate::Reflect for $ty {
            fn view(&self) -> $crate::View<'_> {
                $crate::View::Text(::std::borrow::Cow::Owned(self.to_string()))
            }

            fn slot(&mut self) -> $crate::Slot<'_> {
                $crate::Slot::Opaque($crate::Kind::Text)
            }

            fn text_hook(&mut self) -> Option<&mut dyn $crate::UnmarshalText> {
                Some(self)
            }
        }
    };
}
