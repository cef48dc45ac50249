use blk_format::{transaction_hash, Block};
use blk_storage::{BlockRow, Record, TransactionRow};


/// Row of the block table, keyed by the block hash.
pub fn map_block(block: &Block, block_hash: &str, file_name: &str) -> Record<BlockRow> {
    Record::new(
        block_hash.to_string(),
        BlockRow {
            time: block.header.time,
            size: block.size,
            transaction_count: block.transaction_count(),
            file_name: file_name.to_string(),
        },
    )
}


/// Rows of the transaction table in block order, each referring back
/// to `block_hash`.
pub fn map_transactions(block: &Block, block_hash: &str) -> Vec<Record<TransactionRow>> {
    block
        .transactions
        .iter()
        .map(|tx| {
            Record::new(
                transaction_hash(tx).to_hex(),
                TransactionRow {
                    input_count: tx.inputs.len() as u64,
                    output_count: tx.outputs.len() as u64,
                    block_transaction_count: block.transaction_count(),
                    block_hash: block_hash.to_string(),
                },
            )
        })
        .collect()
}
