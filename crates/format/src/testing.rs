//! Known blocks and synthetic block builders for tests.

use crate::model::{Block, BlockHeader, Transaction, TxInput, TxOutput};


const GENESIS_COINBASE_SCRIPT: &str = "04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73";

const GENESIS_OUTPUT_SCRIPT: &str = "4104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac";


/// Block 0 of the main network, 285 bytes on the wire.
pub fn genesis_block() -> Block {
    let mut merkle_root = [0u8; 32];
    hex::decode_to_slice(
        "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a",
        &mut merkle_root,
    )
    .unwrap();

    let header = BlockHeader {
        version: 1,
        previous_block_hash: [0; 32],
        merkle_root,
        time: 1231006505,
        bits: 0x1d00ffff,
        nonce: 2083236893,
    };

    let coinbase = Transaction {
        version: 1,
        inputs: vec![TxInput {
            previous_transaction_hash: [0; 32],
            previous_output_index: u32::MAX,
            script_signature: hex::decode(GENESIS_COINBASE_SCRIPT).unwrap(),
            sequence: u32::MAX,
            witness: vec![],
        }],
        outputs: vec![TxOutput {
            value: 50 * 100_000_000,
            script_pub_key: hex::decode(GENESIS_OUTPUT_SCRIPT).unwrap(),
        }],
        lock_time: 0,
    };

    Block::new(header, vec![coinbase])
}


/// Deterministic synthetic transaction, distinct for every `seed`.
pub fn synthetic_transaction(seed: u32) -> Transaction {
    Transaction {
        version: 1,
        inputs: vec![TxInput {
            previous_transaction_hash: [seed as u8; 32],
            previous_output_index: seed,
            script_signature: seed.to_le_bytes().to_vec(),
            sequence: u32::MAX,
            witness: vec![],
        }],
        outputs: (0..=seed % 3)
            .map(|i| TxOutput {
                value: (seed as i64) * 1_000 + i as i64,
                script_pub_key: vec![0x76, 0xa9, i as u8],
            })
            .collect(),
        lock_time: seed,
    }
}


/// Synthetic block with `tx_count` transactions, distinct for every `seed`.
pub fn synthetic_block(seed: u32, tx_count: u32) -> Block {
    let header = BlockHeader {
        version: 2,
        previous_block_hash: [seed as u8; 32],
        merkle_root: [!(seed as u8); 32],
        time: 1_300_000_000 + seed,
        bits: 0x1d00ffff,
        nonce: seed.wrapping_mul(2654435761),
    };
    let transactions = (0..tx_count)
        .map(|i| synthetic_transaction(seed * 1_000 + i))
        .collect();
    Block::new(header, transactions)
}
