use crate::error::{FormatError, Result};
use crate::model::{Block, BlockHeader, Transaction, TxInput, TxOutput};
use crate::reader::ByteReader;
use std::io::Read;


/// Upper bound on speculative `Vec` preallocation from untrusted counts.
const MAX_PREALLOC: u64 = 1024;


pub fn parse_block(payload: &[u8]) -> Result<Block> {
    parse_block_at(payload, 0)
}


/// Decodes a frame payload located at `offset` in its file.
///
/// The whole payload must be consumed, otherwise the block is rejected
/// with `SizeMismatch`.
pub fn parse_block_at(payload: &[u8], offset: u64) -> Result<Block> {
    let mut reader = ByteReader::with_position(payload, offset);

    let header = read_header(&mut reader)?;

    let tx_count = reader.read_varint()?;
    let mut transactions = Vec::with_capacity(tx_count.min(MAX_PREALLOC) as usize);
    for _ in 0..tx_count {
        transactions.push(read_transaction(&mut reader)?);
    }

    let consumed = reader.position() - offset;
    if consumed != payload.len() as u64 {
        return Err(FormatError::SizeMismatch {
            offset,
            declared: payload.len() as u64,
            consumed,
        });
    }

    Ok(Block {
        size: payload.len() as u32,
        header,
        transactions,
    })
}


pub fn parse_transaction(bytes: &[u8]) -> Result<Transaction> {
    read_transaction(&mut ByteReader::new(bytes))
}


pub(crate) fn read_header<R: Read>(reader: &mut ByteReader<R>) -> Result<BlockHeader> {
    Ok(BlockHeader {
        version: reader.read_i32_le()?,
        previous_block_hash: reader.read_array()?,
        merkle_root: reader.read_array()?,
        time: reader.read_u32_le()?,
        bits: reader.read_u32_le()?,
        nonce: reader.read_u32_le()?,
    })
}


fn read_transaction<R: Read>(reader: &mut ByteReader<R>) -> Result<Transaction> {
    let version = reader.read_u32_le()?;

    let mut input_count = reader.read_varint()?;
    let mut with_witness = false;
    if input_count == 0 {
        // zero inputs is the marker of the extended (witness) serialization
        let flag_offset = reader.position();
        let flag = reader.read_u8()?;
        if flag != 0x01 {
            return Err(FormatError::UnsupportedTransactionFlag {
                offset: flag_offset,
                flag,
            });
        }
        with_witness = true;
        input_count = reader.read_varint()?;
    }

    let mut inputs = Vec::with_capacity(input_count.min(MAX_PREALLOC) as usize);
    for _ in 0..input_count {
        inputs.push(TxInput {
            previous_transaction_hash: reader.read_array()?,
            previous_output_index: reader.read_u32_le()?,
            script_signature: reader.read_var_bytes()?,
            sequence: reader.read_u32_le()?,
            witness: Vec::new(),
        });
    }

    let output_count = reader.read_varint()?;
    let mut outputs = Vec::with_capacity(output_count.min(MAX_PREALLOC) as usize);
    for _ in 0..output_count {
        outputs.push(TxOutput {
            value: reader.read_i64_le()?,
            script_pub_key: reader.read_var_bytes()?,
        });
    }

    if with_witness {
        for input in inputs.iter_mut() {
            let items = reader.read_varint()?;
            let mut witness = Vec::with_capacity(items.min(MAX_PREALLOC) as usize);
            for _ in 0..items {
                witness.push(reader.read_var_bytes()?);
            }
            input.witness = witness;
        }
    }

    let lock_time = reader.read_u32_le()?;

    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}
