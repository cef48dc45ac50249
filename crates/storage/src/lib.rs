//! RocksDB tables holding block and transaction rows keyed by hash.

mod db;
mod kv;
mod table;


pub use db::{Database, DatabaseSettings};
pub use kv::{BatchWrite, KvRead, Row};
pub use table::{decode_row, BlockRow, Record, Table, TableRow, TransactionRow};
