use crate::table::Table;


/// One key-value pair destined for a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}


pub trait BatchWrite {
    /// Writes the rows of every listed table as a single batch.
    ///
    /// Either every row of every table is applied or the call fails.
    fn write_batch(&self, tables: &[(Table, &[Row])]) -> anyhow::Result<()>;

    fn write_rows(&self, table: Table, rows: &[Row]) -> anyhow::Result<()> {
        self.write_batch(&[(table, rows)])
    }
}


pub trait KvRead {
    fn get(&self, table: Table, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>>;

    fn count(&self, table: Table) -> anyhow::Result<usize>;
}
