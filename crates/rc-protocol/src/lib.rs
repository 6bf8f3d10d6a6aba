//! Primitive datatypes of the Minecraft wire protocol
//!
//! Every primitive is a fixed-width, big-endian (network byte order) value
//! without padding. The types are described at <https://wiki.vg/Protocol#Data_types>.
//!
//! Two surfaces are provided:
//!
//! - [`Datatype`] descriptors, one process-wide constant per primitive, working
//!   on the dynamic [`Value`]. Useful when the type is only known at runtime.
//! - The [`WireType`] trait, implemented for the matching Rust primitives, for
//!   packet serializers that know their field types statically.
//!
//! # Example
//!
//! ```
//! use rc_protocol::{decode, encode, Datatype, Value, UNSIGNED_SHORT};
//!
//! assert_eq!(encode(4660u16), vec![0x12, 0x34]);
//! assert_eq!(decode::<u16>(&[0x12, 0x34]).unwrap(), 4660);
//!
//! let bytes = UNSIGNED_SHORT.encode(Value::Int(4660)).unwrap();
//! assert_eq!(UNSIGNED_SHORT.decode(&bytes).unwrap(), Value::Int(4660));
//!
//! let float = Datatype::by_name("float").unwrap();
//! let pi = float.decode(&[0x40, 0x49, 0x0F, 0xDB]).unwrap();
//! assert!(matches!(pi, Value::Float(x) if (x - std::f64::consts::PI).abs() < 1e-6));
//! ```
//!
//! Descriptors hold no state, so they can be shared freely between threads.

pub mod datatypes;
pub mod errors;
pub mod wire;

pub use datatypes::{
    ALL_DATATYPES, BOOLEAN, BYTE, DOUBLE, Datatype, FLOAT, FormatClass, INT, LONG, NativeKind,
    SHORT, UNSIGNED_BYTE, UNSIGNED_INT, UNSIGNED_LONG, UNSIGNED_SHORT, Value, WireFormat,
};
pub use errors::{CodecError, Result};
pub use wire::{WireType, decode, encode};
