use crate::error::{FormatError, Result};
use crate::varint;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, ErrorKind, Read};


/// Position tracking reader of little-endian primitives.
///
/// Wraps any [`Read`], in practice a buffered file for frame scanning
/// and a byte slice for decoding a single frame payload. All offsets
/// reported in errors are absolute, starting from the position passed
/// to [`ByteReader::with_position`].
pub struct ByteReader<R> {
    inner: R,
    position: u64,
}


impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_position(inner, 0)
    }

    pub fn with_position(inner: R, position: u64) -> Self {
        Self {
            inner,
            position,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads exactly `n` bytes.
    ///
    /// The buffer grows with the data actually read, so a bogus length
    /// prefix fails with `TruncatedInput` instead of allocating.
    pub fn read_fixed(&mut self, n: u64) -> Result<Vec<u8>> {
        let offset = self.position;
        let mut buf = Vec::with_capacity(n.min(64 * 1024) as usize);
        let got = self.by_ref().take(n).read_to_end(&mut buf)? as u64;
        if got < n {
            return Err(FormatError::TruncatedInput {
                offset,
                needed: n,
                available: got,
            });
        }
        Ok(buf)
    }

    /// Runs a fixed width read, an early end of input becomes `TruncatedInput`.
    fn exact<T>(&mut self, needed: u64, read: impl FnOnce(&mut Self) -> io::Result<T>) -> Result<T> {
        let offset = self.position;
        read(self).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => FormatError::TruncatedInput {
                offset,
                needed,
                available: self.position - offset,
            },
            _ => err.into(),
        })
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.exact(N as u64, |r| {
            let mut buf = [0u8; N];
            r.read_exact(&mut buf)?;
            Ok(buf)
        })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.exact(1, |r| ReadBytesExt::read_u8(r))
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.exact(2, |r| r.read_u16::<LittleEndian>())
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.exact(4, |r| r.read_u32::<LittleEndian>())
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        self.exact(4, |r| r.read_i32::<LittleEndian>())
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        self.exact(8, |r| r.read_u64::<LittleEndian>())
    }

    pub fn read_i64_le(&mut self) -> Result<i64> {
        self.exact(8, |r| r.read_i64::<LittleEndian>())
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        varint::read(self)
    }

    /// Reads a varint length followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_varint()?;
        self.read_fixed(len)
    }
}


/// Every byte handed out is counted into the position.
impl<R: Read> Read for ByteReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_are_little_endian() {
        let bytes = [
            0x01, 0x02, 0x03, 0x04,
            0xff, 0xff, 0xff, 0xff,
            0x00, 0xf2, 0x05, 0x2a, 0x01, 0x00, 0x00, 0x00,
        ];
        let mut reader = ByteReader::new(&bytes[..]);
        assert_eq!(reader.read_u32_le().unwrap(), 0x04030201);
        assert_eq!(reader.read_i32_le().unwrap(), -1);
        assert_eq!(reader.read_i64_le().unwrap(), 5_000_000_000);
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn test_read_fixed_truncated() {
        let bytes = [1u8, 2, 3];
        let mut reader = ByteReader::with_position(&bytes[..], 100);
        assert_eq!(reader.read_fixed(2).unwrap(), vec![1, 2]);
        match reader.read_fixed(5) {
            Err(FormatError::TruncatedInput { offset, needed, available }) => {
                assert_eq!(offset, 102);
                assert_eq!(needed, 5);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_array_truncated() {
        let bytes = [1u8, 2];
        let mut reader = ByteReader::new(&bytes[..]);
        assert!(matches!(
            reader.read_u32_le(),
            Err(FormatError::TruncatedInput { offset: 0, needed: 4, available: 2 })
        ));
    }

    #[test]
    fn test_var_bytes_with_huge_length() {
        // varint 0xff prefix with a length far beyond the input
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xaa];
        let mut reader = ByteReader::new(&bytes[..]);
        assert!(matches!(
            reader.read_var_bytes(),
            Err(FormatError::TruncatedInput { offset: 9, available: 1, .. })
        ));
    }

    #[test]
    fn test_partial_read_is_counted() {
        let bytes = [1u8, 2, 3];
        let mut reader = ByteReader::with_position(&bytes[..], 10);
        assert!(matches!(
            reader.read_u64_le(),
            Err(FormatError::TruncatedInput { offset: 10, needed: 8, available: 3 })
        ));
        assert_eq!(reader.position(), 13);
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        struct Flaky<'a> {
            data: &'a [u8],
            interrupt: bool,
        }

        impl Read for Flaky<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.interrupt = !self.interrupt;
                if self.interrupt {
                    return Err(io::Error::from(ErrorKind::Interrupted));
                }
                // one byte at a time
                let n = buf.len().min(1).min(self.data.len());
                buf[..n].copy_from_slice(&self.data[..n]);
                self.data = &self.data[n..];
                Ok(n)
            }
        }

        let mut reader = ByteReader::new(Flaky { data: &[0x01, 0x02, 0x03, 0x04, 0xaa], interrupt: false });
        assert_eq!(reader.read_u32_le().unwrap(), 0x04030201);
        assert_eq!(reader.read_fixed(1).unwrap(), vec![0xaa]);
        assert_eq!(reader.position(), 5);
    }
}
