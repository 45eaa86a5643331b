//! Reflective value coercion.
//!
//! [`convert`] assigns an arbitrary source (scalars, sequences, keyed maps,
//! records, `serde_json::Value`) into a typed destination, coercing between
//! text, numbers and booleans, matching record fields by external name, and
//! hoisting flattened sub-records.
//!
//! ```ignore
//! use structcast::{Reflect, Value, convert};
//!
//! #[derive(Clone, Default, Reflect)]
//! pub struct Server {
//!     #[reflect(rename = "listen")]
//!     pub addr: String,
//!     pub port: u16,
//! }
//!
//! let mut server = Server::default();
//! convert(&mut server, &Value::map([("listen", "0.0.0.0"), ("port", "8080")]))?;
//! assert_eq!(server.port, 8080);
//! ```

extern crate self as structcast;

pub mod coerce;
pub mod error;
pub mod json;
pub mod parse;
pub mod record;
pub mod reflect;
pub mod resolve;
pub mod value;

pub use structcast_derive::Reflect;

pub use coerce::{convert, from_source, to_value};
pub use error::{CoerceError, ErrorKind};
pub use record::{FieldDef, IGNORE_ALIAS, Record};
pub use reflect::{
    DynamicSlot, FloatSlot, IntSlot, MapView, OptionalSlot, Reflect, SeqSlot, SeqView, Slot,
    UnmarshalText, View,
};
pub use resolve::{FieldMap, FieldPath, resolve, resolve_view};
pub use value::{Kind, Value};
