use crate::kv::{BatchWrite, KvRead, Row};
use crate::table::{decode_row, Table, TableRow};
use anyhow::{anyhow, Context};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options as RocksOptions, WriteBatch, WriteOptions, DB};
use std::path::Path;


pub struct DatabaseSettings {
    disable_wal: bool,
    block_cache_size: usize,
}


impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            disable_wal: true,
            block_cache_size: 64 * 1024 * 1024,
        }
    }
}


impl DatabaseSettings {
    /// Rows are reproducible from the block files, so by default they
    /// skip the write-ahead log.
    pub fn with_disable_wal(mut self, yes: bool) -> Self {
        self.disable_wal = yes;
        self
    }

    pub fn open(&self, path: impl AsRef<Path>) -> anyhow::Result<Database> {
        let mut options = RocksOptions::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);

        let cache = rocksdb::Cache::new_lru_cache(self.block_cache_size);
        let mut block_based_table_factory = rocksdb::BlockBasedOptions::default();
        block_based_table_factory.set_block_cache(&cache);
        options.set_block_based_table_factory(&block_based_table_factory);

        let db = DB::open_cf_descriptors(
            &options,
            path.as_ref(),
            Table::ALL.map(|table| {
                let mut options = RocksOptions::default();
                options.set_compression_type(rocksdb::DBCompressionType::Lz4);
                ColumnFamilyDescriptor::new(table.name(), options)
            }),
        )
        .with_context(|| format!("failed to open database at {}", path.as_ref().display()))?;

        Ok(Database {
            db,
            disable_wal: self.disable_wal,
        })
    }
}


pub struct Database {
    db: DB,
    disable_wal: bool,
}


impl Database {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        DatabaseSettings::default().open(path)
    }

    fn cf_handle(&self, table: Table) -> anyhow::Result<&ColumnFamily> {
        self.db
            .cf_handle(table.name())
            .ok_or_else(|| anyhow!("column family {} is missing", table))
    }

    pub fn get_row<R: TableRow>(&self, key: &str) -> anyhow::Result<Option<R>> {
        match self.get(R::TABLE, key.as_bytes())? {
            Some(value) => decode_row(&value).map(Some),
            None => Ok(None),
        }
    }

    /// Persists memtables, the rows are not in any log.
    pub fn flush(&self) -> anyhow::Result<()> {
        for table in Table::ALL {
            self.db.flush_cf(self.cf_handle(table)?)?;
        }
        Ok(())
    }
}


impl BatchWrite for Database {
    fn write_batch(&self, tables: &[(Table, &[Row])]) -> anyhow::Result<()> {
        if tables.iter().all(|(_, rows)| rows.is_empty()) {
            return Ok(());
        }

        let mut batch = WriteBatch::default();
        for (table, rows) in tables.iter() {
            let cf = self.cf_handle(*table)?;
            for row in rows.iter() {
                batch.put_cf(cf, &row.key, &row.value);
            }
        }

        let mut write_options = WriteOptions::default();
        write_options.disable_wal(self.disable_wal);

        self.db.write_opt(batch, &write_options)?;
        Ok(())
    }
}


impl KvRead for Database {
    fn get(&self, table: Table, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.db.get_cf(self.cf_handle(table)?, key)?)
    }

    fn count(&self, table: Table) -> anyhow::Result<usize> {
        let mut count = 0;
        for item in self.db.iterator_cf(self.cf_handle(table)?, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}
