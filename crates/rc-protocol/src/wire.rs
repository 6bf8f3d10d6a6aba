use std::io::{Read, Write};

use crate::datatypes::{
    BOOLEAN, BYTE, DOUBLE, Datatype, FLOAT, INT, LONG, SHORT, UNSIGNED_BYTE, UNSIGNED_INT,
    UNSIGNED_LONG, UNSIGNED_SHORT, Value, fill,
};
use crate::errors::{CodecError, Result};

/// A Rust primitive with a fixed-width wire encoding
///
/// Implemented for `bool`, the 8/16/32/64-bit integers and `f32`/`f64`. The
/// Rust type already bounds the value, so encoding cannot fail.
pub trait WireType: Copy + Into<Value> {
    /// Descriptor this type encodes as
    const DATATYPE: &'static Datatype;

    /// Big-endian bytes of `self`
    fn to_wire(self) -> Vec<u8>;

    /// Decode from exactly `DATATYPE.size` bytes
    fn from_wire(bytes: &[u8]) -> Result<Self>;

    /// Read one value from a byte stream
    fn read<R: Read>(reader: R) -> Result<Self> {
        let mut buf = [0u8; 8];
        let buf = &mut buf[..Self::DATATYPE.size];
        fill(reader, buf, Self::DATATYPE)?;
        Self::from_wire(buf)
    }

    /// Write one value to a byte sink
    fn write<W: Write>(self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_wire())?;
        Ok(())
    }
}

fn length_error(datatype: &Datatype, bytes: &[u8]) -> CodecError {
    CodecError::Length {
        datatype: datatype.name,
        expected: datatype.size,
        actual: bytes.len(),
    }
}

impl WireType for bool {
    const DATATYPE: &'static Datatype = &BOOLEAN;

    fn to_wire(self) -> Vec<u8> {
        vec![u8::from(self)]
    }

    fn from_wire(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [byte] => Ok(*byte != 0),
            _ => Err(length_error(Self::DATATYPE, bytes)),
        }
    }
}

macro_rules! wire_numeric {
    ($($ty:ty => $datatype:ident),* $(,)?) => {$(
        impl WireType for $ty {
            const DATATYPE: &'static Datatype = &$datatype;

            fn to_wire(self) -> Vec<u8> {
                self.to_be_bytes().to_vec()
            }

            fn from_wire(bytes: &[u8]) -> Result<Self> {
                let raw: [u8; std::mem::size_of::<$ty>()] = bytes
                    .try_into()
                    .map_err(|_| length_error(Self::DATATYPE, bytes))?;
                Ok(<$ty>::from_be_bytes(raw))
            }
        }
    )*};
}

wire_numeric! {
    i8 => BYTE,
    u8 => UNSIGNED_BYTE,
    i16 => SHORT,
    u16 => UNSIGNED_SHORT,
    i32 => INT,
    u32 => UNSIGNED_INT,
    i64 => LONG,
    u64 => UNSIGNED_LONG,
    f32 => FLOAT,
    f64 => DOUBLE,
}

/// Encode a primitive into its big-endian wire bytes
pub fn encode<T: WireType>(value: T) -> Vec<u8> {
    value.to_wire()
}

/// Decode a primitive from exactly its wire width
pub fn decode<T: WireType>(bytes: &[u8]) -> Result<T> {
    T::from_wire(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_typed_examples() {
        assert_eq!(encode(4660u16), vec![0x12, 0x34]);
        assert_eq!(encode(-1i8), vec![0xFF]);
        assert_eq!(encode(true), vec![0x01]);
        assert_eq!(encode(1u64), vec![0, 0, 0, 0, 0, 0, 0, 1]);

        let pi: f32 = decode(&[0x40, 0x49, 0x0F, 0xDB]).unwrap();
        assert!((pi - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_typed_matches_dynamic_codec() {
        fn check<T: WireType + PartialEq + std::fmt::Debug>(value: T) {
            let typed = encode(value);
            let dynamic = T::DATATYPE.encode(value.into()).unwrap();
            assert_eq!(typed, dynamic, "{}", T::DATATYPE);
            assert_eq!(decode::<T>(&typed).unwrap(), value);
        }

        check(false);
        check(i8::MIN);
        check(u8::MAX);
        check(-12345i16);
        check(u16::MAX);
        check(i32::MIN);
        check(u32::MAX);
        check(i64::MIN);
        check(u64::MAX);
        check(6.25f32);
        check(-1234.5678f64);
    }

    #[test]
    fn test_typed_float_nan_matches_dynamic_codec() {
        for bits in [0x7F80_0001u32, 0xFFC0_1234, 0x7FBF_FFFF] {
            let x: f32 = decode(&bits.to_be_bytes()).unwrap();
            assert_eq!(encode(x), bits.to_be_bytes());
            assert_eq!(FLOAT.encode(x.into()).unwrap(), bits.to_be_bytes());
            assert_eq!(FLOAT.decode(&bits.to_be_bytes()).unwrap().to_string(), "NaN");
        }
    }

    #[test]
    fn test_typed_length_enforced() {
        assert!(matches!(
            decode::<i32>(&[0x00, 0x01]),
            Err(CodecError::Length { expected: 4, actual: 2, .. })
        ));
        assert!(matches!(
            decode::<bool>(&[]),
            Err(CodecError::Length { expected: 1, actual: 0, .. })
        ));
    }

    #[test]
    fn test_typed_stream_io() {
        let mut out: Vec<u8> = Vec::new();
        7i16.write(&mut out).unwrap();
        true.write(&mut out).unwrap();
        0.5f64.write(&mut out).unwrap();

        let mut stream = Cursor::new(out);
        assert_eq!(i16::read(&mut stream).unwrap(), 7);
        assert!(bool::read(&mut stream).unwrap());
        assert_eq!(f64::read(&mut stream).unwrap(), 0.5);
        assert!(matches!(
            u8::read(&mut stream),
            Err(CodecError::Truncated { available: 0, .. })
        ));
    }
}
