//! Wire datatype commands.

use anyhow::{Context, Result};
use clap::Subcommand;

use rc_protocol::{ALL_DATATYPES, Datatype, Value};

#[derive(Subcommand, Debug)]
pub enum CodecCommand {
    /// Encode a value and print its bytes as hex
    Encode {
        /// Datatype name (see `codec list`)
        datatype: String,

        /// Value to encode, e.g. `true`, `-12`, `3.14`
        #[arg(allow_negative_numbers = true)]
        value: String,
    },

    /// Decode hex bytes and print the value
    Decode {
        /// Datatype name (see `codec list`)
        datatype: String,

        /// Encoded bytes as hex, optionally prefixed with `0x`
        hex: String,
    },

    /// List the registered datatypes
    List,
}

pub fn handle(cmd: CodecCommand) -> Result<()> {
    match cmd {
        CodecCommand::Encode { datatype, value } => {
            println!("{}", encode_literal(&datatype, &value)?);
        }
        CodecCommand::Decode { datatype, hex: input } => {
            println!("{}", decode_hex(&datatype, &input)?);
        }
        CodecCommand::List => {
            println!("{:<16} {:>5}  {}", "NAME", "BYTES", "FORMAT");
            for datatype in ALL_DATATYPES {
                println!(
                    "{:<16} {:>5}  {}",
                    datatype.name,
                    datatype.size,
                    datatype.format.code()
                );
            }
        }
    }

    Ok(())
}

/// Parse `literal` as `datatype` and return its encoding as lowercase hex
fn encode_literal(datatype: &str, literal: &str) -> Result<String> {
    let datatype = Datatype::by_name(datatype)?;
    let value = datatype.parse_value(literal)?;
    Ok(hex::encode(datatype.encode(value)?))
}

fn decode_hex(datatype: &str, input: &str) -> Result<Value> {
    let datatype = Datatype::by_name(datatype)?;
    let bytes = parse_hex(input)?;
    Ok(datatype.decode(&bytes)?)
}

/// Hex digits with optional surrounding whitespace and `0x` prefix
fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let input = input.trim();
    let digits = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(digits).context("Invalid hex input")
}

#[cfg(test)]
mod tests {
    use rc_protocol::CodecError;

    use super::*;

    #[test]
    fn test_encode_literal() {
        assert_eq!(encode_literal("short", "-12").unwrap(), "fff4");
        assert_eq!(encode_literal("unsigned_short", "4660").unwrap(), "1234");
        assert_eq!(encode_literal("boolean", "true").unwrap(), "01");
        assert_eq!(encode_literal("float", "0.1").unwrap(), "3dcccccd");
    }

    #[test]
    fn test_encode_literal_errors() {
        let err = encode_literal("unsigned_byte", "256").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::OutOfRange { .. })
        ));

        let err = encode_literal("varint", "1").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::UnknownDatatype(_))
        ));

        assert!(encode_literal("int", "twelve").is_err());
    }

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("unsigned_short", "1234").unwrap(), Value::Int(4660));
        assert_eq!(decode_hex("unsigned_short", "0x1234").unwrap(), Value::Int(4660));
        assert_eq!(decode_hex("short", "  FFF4\n").unwrap(), Value::Int(-12));
        assert_eq!(decode_hex("boolean", "02").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_decode_hex_errors() {
        for bad in ["zz", "123", "0x12g4"] {
            let err = decode_hex("unsigned_short", bad).unwrap_err();
            assert_eq!(err.to_string(), "Invalid hex input", "{}", bad);
        }

        let err = decode_hex("int", "1234").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::Length { expected: 4, actual: 2, .. })
        ));
    }
}
