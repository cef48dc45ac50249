//! Decoding of the block files full nodes persist blocks in.
//!
//! A block file is a sequence of frames, each being a 4 byte network
//! magic, a 4 byte little-endian payload length and a serialized block.
//! [`FrameScanner`] cuts a file into frames, [`parse_block_at`] decodes
//! a frame payload, [`block_hash`] and [`transaction_hash`] derive the
//! identifiers blocks and transactions are known by.

mod encode;
mod error;
mod frame;
mod hash;
mod model;
mod parser;
mod reader;
mod varint;

#[cfg(any(test, feature = "testing"))]
pub mod testing;


pub use encode::*;
pub use error::*;
pub use frame::*;
pub use hash::*;
pub use model::*;
pub use parser::*;
pub use reader::ByteReader;
