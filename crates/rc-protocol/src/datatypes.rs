use std::fmt;
use std::io::{ErrorKind, Read, Write};

use tracing::trace;

use crate::errors::{CodecError, Result};

/// Native value category a datatype maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Boolean,
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
}

/// How the bytes of a datatype are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatClass {
    Bool,
    Signed,
    Unsigned,
    Float,
}

/// Platform-independent encoding tag: interpretation plus width in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireFormat {
    pub class: FormatClass,
    pub width: usize,
}

impl WireFormat {
    /// Single-character format code (`?bBhHiIqQfd`)
    pub const fn code(&self) -> char {
        match (self.class, self.width) {
            (FormatClass::Bool, _) => '?',
            (FormatClass::Signed, 1) => 'b',
            (FormatClass::Unsigned, 1) => 'B',
            (FormatClass::Signed, 2) => 'h',
            (FormatClass::Unsigned, 2) => 'H',
            (FormatClass::Signed, 4) => 'i',
            (FormatClass::Unsigned, 4) => 'I',
            (FormatClass::Signed, _) => 'q',
            (FormatClass::Unsigned, _) => 'Q',
            (FormatClass::Float, 4) => 'f',
            (FormatClass::Float, _) => 'd',
        }
    }
}

/// A native value as seen by the dynamic codec
///
/// `Int` is wide enough to hold every signed and unsigned width up to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i128),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! value_from {
    ($variant:ident: $($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        }
    )*};
}

value_from!(Int: i8, u8, i16, u16, i32, u32, i64, u64);
value_from!(Float: f64);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(widen_f32(value))
    }
}

/// `f32` to `f64` keeping NaN sign and payload bits
///
/// The payload lands in the top 23 mantissa bits, so [`narrow_f64`] gets the
/// original bits back.
pub(crate) fn widen_f32(x: f32) -> f64 {
    if !x.is_nan() {
        return f64::from(x);
    }
    let bits = x.to_bits();
    let sign = u64::from(bits >> 31);
    let payload = u64::from(bits & 0x007F_FFFF);
    f64::from_bits((sign << 63) | (0x7FF << 52) | (payload << 29))
}

/// `f64` to the nearest `f32`, NaN payload bits taken from the top of the mantissa
pub(crate) fn narrow_f64(x: f64) -> f32 {
    if !x.is_nan() {
        return x as f32;
    }
    let bits = x.to_bits();
    let sign = (bits >> 63) as u32;
    let mut payload = ((bits >> 29) & 0x007F_FFFF) as u32;
    if payload == 0 {
        // A zero mantissa would read back as infinity
        payload = 0x0040_0000;
    }
    f32::from_bits((sign << 31) | 0x7F80_0000 | payload)
}

/// Descriptor of one primitive wire datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Datatype {
    pub name: &'static str,
    pub kind: NativeKind,
    pub size: usize,
    pub format: WireFormat,
}

pub const BOOLEAN: Datatype = Datatype::new("boolean", NativeKind::Boolean, FormatClass::Bool, 1);
pub const BYTE: Datatype = Datatype::new("byte", NativeKind::Byte, FormatClass::Signed, 1);
pub const UNSIGNED_BYTE: Datatype =
    Datatype::new("unsigned_byte", NativeKind::UnsignedByte, FormatClass::Unsigned, 1);
pub const SHORT: Datatype = Datatype::new("short", NativeKind::Short, FormatClass::Signed, 2);
pub const UNSIGNED_SHORT: Datatype =
    Datatype::new("unsigned_short", NativeKind::UnsignedShort, FormatClass::Unsigned, 2);
pub const INT: Datatype = Datatype::new("int", NativeKind::Int, FormatClass::Signed, 4);
pub const UNSIGNED_INT: Datatype =
    Datatype::new("unsigned_int", NativeKind::UnsignedInt, FormatClass::Unsigned, 4);
pub const LONG: Datatype = Datatype::new("long", NativeKind::Long, FormatClass::Signed, 8);
pub const UNSIGNED_LONG: Datatype =
    Datatype::new("unsigned_long", NativeKind::UnsignedLong, FormatClass::Unsigned, 8);
pub const FLOAT: Datatype = Datatype::new("float", NativeKind::Float, FormatClass::Float, 4);
pub const DOUBLE: Datatype = Datatype::new("double", NativeKind::Double, FormatClass::Float, 8);

/// Every registered datatype, narrowest first
pub const ALL_DATATYPES: [&Datatype; 11] = [
    &BOOLEAN,
    &BYTE,
    &UNSIGNED_BYTE,
    &SHORT,
    &UNSIGNED_SHORT,
    &INT,
    &UNSIGNED_INT,
    &LONG,
    &UNSIGNED_LONG,
    &FLOAT,
    &DOUBLE,
];

impl Datatype {
    const fn new(name: &'static str, kind: NativeKind, class: FormatClass, size: usize) -> Self {
        Self {
            name,
            kind,
            size,
            format: WireFormat { class, width: size },
        }
    }

    /// Descriptor for a native kind
    pub fn of(kind: NativeKind) -> &'static Datatype {
        match kind {
            NativeKind::Boolean => &BOOLEAN,
            NativeKind::Byte => &BYTE,
            NativeKind::UnsignedByte => &UNSIGNED_BYTE,
            NativeKind::Short => &SHORT,
            NativeKind::UnsignedShort => &UNSIGNED_SHORT,
            NativeKind::Int => &INT,
            NativeKind::UnsignedInt => &UNSIGNED_INT,
            NativeKind::Long => &LONG,
            NativeKind::UnsignedLong => &UNSIGNED_LONG,
            NativeKind::Float => &FLOAT,
            NativeKind::Double => &DOUBLE,
        }
    }

    /// Look up a descriptor by its registry name (e.g. `"unsigned_short"`)
    pub fn by_name(name: &str) -> Result<&'static Datatype> {
        ALL_DATATYPES
            .iter()
            .copied()
            .find(|datatype| datatype.name == name)
            .ok_or_else(|| CodecError::UnknownDatatype(name.to_string()))
    }

    /// Inclusive integer bounds, `None` for booleans and floats
    pub fn int_range(&self) -> Option<(i128, i128)> {
        let bits = (self.size * 8) as u32;
        match self.format.class {
            FormatClass::Signed => Some((-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)),
            FormatClass::Unsigned => Some((0, (1i128 << bits) - 1)),
            FormatClass::Bool | FormatClass::Float => None,
        }
    }

    /// Encode `value` into exactly `self.size` big-endian bytes
    ///
    /// Values that do not fit the datatype are rejected rather than clamped or
    /// wrapped.
    ///
    /// [`FLOAT`] rounds the value to the nearest `f32`, so `0.1` encodes as
    /// `3D CC CC CD` and decodes back as `f64::from(0.1f32)`. A finite value is
    /// in range when it rounds to a finite `f32`. Infinities pass through, and
    /// NaN keeps its sign and the top 23 bits of its payload, which makes
    /// `encode(decode(bytes)) == bytes` hold for every 4-byte pattern.
    pub fn encode(&self, value: Value) -> Result<Vec<u8>> {
        match (self.format.class, value) {
            (FormatClass::Bool, Value::Bool(b)) => Ok(vec![u8::from(b)]),
            (FormatClass::Signed | FormatClass::Unsigned, Value::Int(n)) => {
                let (min, max) = self.int_range().unwrap_or((0, 0));
                if n < min || n > max {
                    return Err(CodecError::OutOfRange {
                        datatype: self.name,
                        value,
                    });
                }
                // Two's complement of the wide value; the low bytes are the encoding.
                let wide = n.to_be_bytes();
                Ok(wide[wide.len() - self.size..].to_vec())
            }
            (FormatClass::Float, Value::Float(x)) if self.size == 4 => {
                let narrowed = narrow_f64(x);
                if x.is_finite() && narrowed.is_infinite() {
                    return Err(CodecError::OutOfRange {
                        datatype: self.name,
                        value,
                    });
                }
                Ok(narrowed.to_be_bytes().to_vec())
            }
            (FormatClass::Float, Value::Float(x)) => Ok(x.to_be_bytes().to_vec()),
            _ => Err(CodecError::KindMismatch {
                datatype: self.name,
                value,
            }),
        }
    }

    /// Decode exactly `self.size` bytes
    ///
    /// Any non-zero boolean byte decodes as `true`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        if bytes.len() != self.size {
            return Err(CodecError::Length {
                datatype: self.name,
                expected: self.size,
                actual: bytes.len(),
            });
        }

        let value = match self.format.class {
            FormatClass::Bool => Value::Bool(bytes[0] != 0),
            FormatClass::Signed => {
                let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
                let mut wide = [fill; 16];
                wide[16 - self.size..].copy_from_slice(bytes);
                Value::Int(i128::from_be_bytes(wide))
            }
            FormatClass::Unsigned => {
                let mut wide = [0u8; 16];
                wide[16 - self.size..].copy_from_slice(bytes);
                Value::Int(i128::from_be_bytes(wide))
            }
            FormatClass::Float if self.size == 4 => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(bytes);
                Value::Float(widen_f32(f32::from_be_bytes(raw)))
            }
            FormatClass::Float => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Value::Float(f64::from_be_bytes(raw))
            }
        };

        Ok(value)
    }

    /// Pull exactly `self.size` bytes from `reader` and decode them
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Value> {
        let mut buf = [0u8; 8];
        let buf = &mut buf[..self.size];
        fill(reader, buf, self)?;
        self.decode(buf)
    }

    /// Encode `value` and write all of its bytes to `writer`
    pub fn write_to<W: Write>(&self, mut writer: W, value: Value) -> Result<()> {
        let bytes = self.encode(value)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Parse a textual literal into a value of this datatype's kind
    pub fn parse_value(&self, literal: &str) -> Result<Value> {
        let invalid = || CodecError::InvalidLiteral {
            datatype: self.name,
            literal: literal.to_string(),
        };
        let literal = literal.trim();

        match self.format.class {
            FormatClass::Bool => match literal {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid()),
            },
            FormatClass::Signed | FormatClass::Unsigned => {
                literal.parse::<i128>().map(Value::Int).map_err(|_| invalid())
            }
            FormatClass::Float => literal.parse::<f64>().map(Value::Float).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Fill `buf` completely from `reader`, reporting how far it got on a short stream
pub(crate) fn fill<R: Read>(mut reader: R, buf: &mut [u8], datatype: &Datatype) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(CodecError::Truncated {
                    datatype: datatype.name,
                    expected: buf.len(),
                    available: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    trace!(datatype = datatype.name, bytes = filled, "read primitive");
    Ok(())
}
