use crate::error::{FormatError, Result};
use crate::reader::ByteReader;
use std::io::Read;
use tracing::{debug, warn};


pub const MAINNET_MAGIC: [u8; 4] = [0xf9, 0xbe, 0xb4, 0xd9];
pub const TESTNET_MAGIC: [u8; 4] = [0x0b, 0x11, 0x09, 0x07];
pub const REGTEST_MAGIC: [u8; 4] = [0xfa, 0xbf, 0xb5, 0xda];
pub const SIGNET_MAGIC: [u8; 4] = [0x0a, 0x03, 0xcf, 0x40];

pub const DEFAULT_MAX_BLOCK_SIZE: u32 = 1024 * 1024;

/// Magic field plus length field.
pub const FRAME_HEADER_SIZE: u64 = 8;


/// What to do when a frame does not start with a known magic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Fail the file with `FrameSyncLost`.
    #[default]
    Abort,
    /// Skip bytes until the next known magic.
    Resync,
}


#[derive(Clone, Debug)]
pub struct FrameConfig {
    pub magics: Vec<[u8; 4]>,
    pub max_block_size: u32,
    pub sync_policy: SyncPolicy,
}


impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            magics: vec![MAINNET_MAGIC],
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            sync_policy: SyncPolicy::Abort,
        }
    }
}


/// One magic-prefixed, length-prefixed block record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Offset of the magic field in the file.
    pub offset: u64,
    pub magic: [u8; 4],
    pub payload: Vec<u8>,
}


impl Frame {
    pub fn payload_offset(&self) -> u64 {
        self.offset + FRAME_HEADER_SIZE
    }
}


/// Lazy sequence of frames read from a block file.
///
/// A short read anywhere in a frame ends the sequence without an error,
/// so does a zeroed magic field (block files are preallocated with
/// zeros). After the first error the scanner yields nothing more.
pub struct FrameScanner<R> {
    reader: ByteReader<R>,
    config: FrameConfig,
    done: bool,
}


impl<R: Read> FrameScanner<R> {
    pub fn new(read: R, config: FrameConfig) -> Self {
        Self {
            reader: ByteReader::new(read),
            config,
            done: false,
        }
    }

    /// Bytes consumed from the underlying reader so far.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    fn is_known_magic(&self, magic: &[u8; 4]) -> bool {
        self.config.magics.iter().any(|m| m == magic)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut offset = self.reader.position();
        let mut magic = match self.reader.read_array::<4>() {
            Ok(magic) => magic,
            Err(FormatError::TruncatedInput { available, .. }) => {
                if available > 0 {
                    debug!(offset, available, "partial magic at end of file");
                }
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if magic == [0; 4] {
            debug!(offset, "zero padding reached");
            return Ok(None);
        }

        if !self.is_known_magic(&magic) {
            match self.config.sync_policy {
                SyncPolicy::Abort => {
                    return Err(FormatError::FrameSyncLost {
                        offset,
                        found: magic,
                    })
                }
                SyncPolicy::Resync => match self.resync(offset, magic)? {
                    Some((found_offset, found_magic)) => {
                        offset = found_offset;
                        magic = found_magic;
                    }
                    None => return Ok(None),
                },
            }
        }

        let size = match self.reader.read_u32_le() {
            Ok(size) => size,
            Err(FormatError::TruncatedInput { .. }) => {
                debug!(offset, "partial frame length at end of file");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if size > self.config.max_block_size {
            return Err(FormatError::OversizedBlock {
                offset,
                size,
                max: self.config.max_block_size,
            });
        }

        let payload = match self.reader.read_fixed(size as u64) {
            Ok(payload) => payload,
            Err(FormatError::TruncatedInput { available, .. }) => {
                debug!(offset, size, available, "partial frame payload at end of file");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        Ok(Some(Frame {
            offset,
            magic,
            payload,
        }))
    }

    /// Slides a 4 byte window forward until it holds a known magic.
    fn resync(&mut self, start: u64, mut window: [u8; 4]) -> Result<Option<(u64, [u8; 4])>> {
        loop {
            let byte = match self.reader.read_u8() {
                Ok(byte) => byte,
                Err(FormatError::TruncatedInput { .. }) => {
                    warn!(offset = start, skipped = self.reader.position() - start, "no frame found until end of file");
                    return Ok(None);
                }
                Err(err) => return Err(err),
            };
            window.rotate_left(1);
            window[3] = byte;
            if self.is_known_magic(&window) {
                let offset = self.reader.position() - 4;
                warn!(offset = start, skipped = offset - start, "skipped bytes to resynchronize frames");
                return Ok(Some((offset, window)));
            }
        }
    }
}


impl<R: Read> Iterator for FrameScanner<R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_frame().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}
