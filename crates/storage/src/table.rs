use crate::kv::Row;
use borsh::{BorshDeserialize, BorshSerialize};
use std::fmt;


#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Block,
    Transaction,
}


impl Table {
    pub const ALL: [Table; 2] = [Table::Block, Table::Transaction];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Block => "block",
            Table::Transaction => "transaction",
        }
    }
}


impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


pub trait TableRow: BorshSerialize + BorshDeserialize {
    const TABLE: Table;
}


#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BlockRow {
    pub time: u32,
    pub size: u32,
    pub transaction_count: u64,
    pub file_name: String,
}


impl TableRow for BlockRow {
    const TABLE: Table = Table::Block;
}


#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionRow {
    pub input_count: u64,
    pub output_count: u64,
    pub block_transaction_count: u64,
    /// Hash of the containing block, same form as the block table key.
    pub block_hash: String,
}


impl TableRow for TransactionRow {
    const TABLE: Table = Table::Transaction;
}


/// A row together with the hex hash it is keyed by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record<R> {
    pub key: String,
    pub row: R,
}


impl<R: TableRow> Record<R> {
    pub fn new(key: String, row: R) -> Self {
        Self {
            key,
            row,
        }
    }

    pub fn to_row(&self) -> anyhow::Result<Row> {
        Ok(Row {
            key: self.key.as_bytes().to_vec(),
            value: borsh::to_vec(&self.row)?,
        })
    }
}


pub fn decode_row<R: TableRow>(value: &[u8]) -> anyhow::Result<R> {
    Ok(borsh::from_slice(value)?)
}
