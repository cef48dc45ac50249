use crate::error::ImportError;
use blk_storage::{BatchWrite, BlockRow, Record, Row, Table, TableRow, TransactionRow};


/// Where flushed records go.
#[derive(Copy, Clone)]
pub enum WriteMode<'a> {
    Live(&'a dyn BatchWrite),
    /// Count records, write nothing.
    DryRun,
}


impl WriteMode<'_> {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, WriteMode::DryRun)
    }
}


#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestCounts {
    pub blocks: u64,
    pub transactions: u64,
    /// Whether the counted records reached the store.
    pub written: bool,
}


/// Buffers the records of one file and writes them as one batch per table.
pub struct BatchIngestor<'a> {
    mode: WriteMode<'a>,
    file_name: String,
    blocks: Vec<Record<BlockRow>>,
    transactions: Vec<Record<TransactionRow>>,
}


impl<'a> BatchIngestor<'a> {
    pub fn new(mode: WriteMode<'a>, file_name: impl Into<String>) -> Self {
        Self {
            mode,
            file_name: file_name.into(),
            blocks: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn push_block(&mut self, record: Record<BlockRow>) {
        self.blocks.push(record)
    }

    pub fn extend_transactions(&mut self, records: impl IntoIterator<Item = Record<TransactionRow>>) {
        self.transactions.extend(records)
    }

    pub fn counts(&self) -> IngestCounts {
        IngestCounts {
            blocks: self.blocks.len() as u64,
            transactions: self.transactions.len() as u64,
            written: false,
        }
    }

    /// Writes the rows of both tables as one batch, so a failure leaves
    /// nothing of this file in the store.
    pub fn flush(self) -> Result<IngestCounts, ImportError> {
        let mut counts = self.counts();
        if let WriteMode::Live(store) = self.mode {
            let failed = |error: anyhow::Error| ImportError::StoreWriteFailed {
                file: self.file_name.clone(),
                error,
            };
            let blocks = to_rows(&self.blocks).map_err(failed)?;
            let transactions = to_rows(&self.transactions).map_err(failed)?;
            store
                .write_batch(&[
                    (Table::Block, blocks.as_slice()),
                    (Table::Transaction, transactions.as_slice()),
                ])
                .map_err(failed)?;
            counts.written = true;
        }
        Ok(counts)
    }
}


fn to_rows<R: TableRow>(records: &[Record<R>]) -> anyhow::Result<Vec<Row>> {
    records.iter().map(Record::to_row).collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Applies each batch whole, or rejects it whole when it holds rows
    /// of the `reject` table.
    #[derive(Default)]
    struct MemoryStore {
        reject: Option<Table>,
        batches: Mutex<Vec<Vec<(Table, Vec<Row>)>>>,
    }

    impl MemoryStore {
        fn rows(&self, table: Table) -> usize {
            self.batches
                .lock()
                .unwrap()
                .iter()
                .flatten()
                .filter(|(t, _)| *t == table)
                .map(|(_, rows)| rows.len())
                .sum()
        }
    }

    impl BatchWrite for MemoryStore {
        fn write_batch(&self, tables: &[(Table, &[Row])]) -> anyhow::Result<()> {
            for (table, rows) in tables.iter() {
                anyhow::ensure!(rows.is_empty() || Some(*table) != self.reject, "{} is read only", table);
            }
            let batch = tables.iter().map(|(table, rows)| (*table, rows.to_vec())).collect();
            self.batches.lock().unwrap().push(batch);
            Ok(())
        }
    }

    fn block_record(key: &str) -> Record<BlockRow> {
        Record::new(
            key.to_string(),
            BlockRow {
                time: 1,
                size: 100,
                transaction_count: 2,
                file_name: "blk00000.dat".to_string(),
            },
        )
    }

    fn tx_record(key: &str, block: &str) -> Record<TransactionRow> {
        Record::new(
            key.to_string(),
            TransactionRow {
                input_count: 1,
                output_count: 1,
                block_transaction_count: 2,
                block_hash: block.to_string(),
            },
        )
    }

    fn fill(ingestor: &mut BatchIngestor) {
        ingestor.push_block(block_record("b1"));
        ingestor.extend_transactions([tx_record("t1", "b1"), tx_record("t2", "b1")]);
    }

    #[test]
    fn test_one_batch_for_both_tables() {
        let store = MemoryStore::default();
        let mut ingestor = BatchIngestor::new(WriteMode::Live(&store), "blk00000.dat");
        fill(&mut ingestor);

        let counts = ingestor.flush().unwrap();
        assert_eq!(counts, IngestCounts { blocks: 1, transactions: 2, written: true });

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch[0].0, Table::Block);
        assert_eq!(batch[0].1.len(), 1);
        assert_eq!(batch[0].1[0].key, b"b1");
        assert_eq!(batch[1].0, Table::Transaction);
        assert_eq!(batch[1].1.len(), 2);
    }

    #[test]
    fn test_dry_run_counts_match() {
        let mut dry = BatchIngestor::new(WriteMode::DryRun, "f");
        fill(&mut dry);
        let dry = dry.flush().unwrap();

        let store = MemoryStore::default();
        let mut live = BatchIngestor::new(WriteMode::Live(&store), "f");
        fill(&mut live);
        let live = live.flush().unwrap();

        assert!(!dry.written);
        assert_eq!((dry.blocks, dry.transactions), (live.blocks, live.transactions));
    }

    #[test]
    fn test_rejected_transactions_leave_no_block_rows() {
        let store = MemoryStore {
            reject: Some(Table::Transaction),
            ..MemoryStore::default()
        };
        let mut ingestor = BatchIngestor::new(WriteMode::Live(&store), "blk00007.dat");
        fill(&mut ingestor);

        match ingestor.flush() {
            Err(ImportError::StoreWriteFailed { file, error }) => {
                assert_eq!(file, "blk00007.dat");
                assert_eq!(error.to_string(), "transaction is read only");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(store.rows(Table::Block), 0);
        assert_eq!(store.rows(Table::Transaction), 0);
    }
}
