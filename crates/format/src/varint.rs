//! Variable length integer, as used for counts and script lengths.
//!
//! | first byte | value                        |
//! |------------|------------------------------|
//! | `< 0xfd`   | the byte itself              |
//! | `0xfd`     | following `u16`, little-endian |
//! | `0xfe`     | following `u32`, little-endian |
//! | `0xff`     | following `u64`, little-endian |
//!
//! Only the shortest form of a value is accepted.

use crate::error::{FormatError, Result};
use crate::reader::ByteReader;
use std::io::Read;


pub(crate) fn read<R: Read>(reader: &mut ByteReader<R>) -> Result<u64> {
    let offset = reader.position();
    let prefix = reader.read_u8()?;

    let (value, min) = match prefix {
        0xfd => (reader.read_u16_le().map(u64::from), 0xfd),
        0xfe => (reader.read_u32_le().map(u64::from), 0x1_0000),
        0xff => (reader.read_u64_le(), 0x1_0000_0000),
        b => return Ok(b as u64),
    };

    let value = value.map_err(|err| match err {
        FormatError::TruncatedInput { .. } => FormatError::MalformedVarInt {
            offset,
            reason: "incomplete value after prefix",
        },
        err => err,
    })?;

    if value < min {
        return Err(FormatError::MalformedVarInt {
            offset,
            reason: "non-canonical encoding",
        });
    }

    Ok(value)
}


pub fn write(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}


pub fn encoded_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(bytes: &[u8]) -> Result<u64> {
        ByteReader::new(bytes).read_varint()
    }

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write(&mut out, value);
        out
    }

    #[test]
    fn test_boundaries() {
        let cases: [(u64, &[u8]); 7] = [
            (0, &[0x00]),
            (252, &[0xfc]),
            (253, &[0xfd, 0xfd, 0x00]),
            (65535, &[0xfd, 0xff, 0xff]),
            (65536, &[0xfe, 0x00, 0x00, 0x01, 0x00]),
            (u32::MAX as u64, &[0xfe, 0xff, 0xff, 0xff, 0xff]),
            (u32::MAX as u64 + 1, &[0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
        ];
        for (value, bytes) in cases {
            assert_eq!(encode(value), bytes, "encoding {}", value);
            assert_eq!(encoded_len(value), bytes.len());
            assert_eq!(decode(bytes).unwrap(), value, "decoding {}", value);
        }
    }

    #[test]
    fn test_incomplete_prefix() {
        let cases: [&[u8]; 4] = [&[0xfd], &[0xfd, 0x01], &[0xfe, 0x01, 0x02, 0x03], &[0xff, 0, 0, 0]];
        for bytes in cases {
            assert!(matches!(
                decode(bytes),
                Err(FormatError::MalformedVarInt { offset: 0, .. })
            ));
        }
    }

    #[test]
    fn test_empty_input_is_truncation() {
        assert!(matches!(decode(&[]), Err(FormatError::TruncatedInput { .. })));
    }

    #[test]
    fn test_non_canonical() {
        assert!(matches!(
            decode(&[0xfd, 0x05, 0x00]),
            Err(FormatError::MalformedVarInt { reason: "non-canonical encoding", .. })
        ));
        assert!(matches!(
            decode(&[0xfe, 0xff, 0xff, 0x00, 0x00]),
            Err(FormatError::MalformedVarInt { .. })
        ));
        assert!(matches!(
            decode(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00]),
            Err(FormatError::MalformedVarInt { .. })
        ));
    }

    proptest! {
        #[test]
        fn test_write_read(value in any::<u64>()) {
            let bytes = encode(value);
            prop_assert_eq!(bytes.len(), encoded_len(value));
            prop_assert_eq!(decode(&bytes).unwrap(), value);
        }
    }
}
