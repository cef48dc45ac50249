use crate::encode;


pub const HEADER_SIZE: usize = 80;


pub type Hash32 = [u8; 32];


/// Fixed 80 byte block header, fields in wire order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: i32,
    pub previous_block_hash: Hash32,
    pub merkle_root: Hash32,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    pub previous_transaction_hash: Hash32,
    pub previous_output_index: u32,
    pub script_signature: Vec<u8>,
    pub sequence: u32,
    /// Segregated witness stack, empty for legacy inputs.
    pub witness: Vec<Vec<u8>>,
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    /// Amount in satoshis.
    pub value: i64,
    pub script_pub_key: Vec<u8>,
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}


impl Transaction {
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Length of the frame payload the block was decoded from.
    pub size: u32,
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}


impl Block {
    /// Builds a block, deriving `size` from the canonical encoding.
    pub fn new(header: BlockHeader, transactions: Vec<Transaction>) -> Self {
        let size = encode::block_payload_len(&transactions) as u32;
        Self {
            size,
            header,
            transactions,
        }
    }

    pub fn transaction_count(&self) -> u64 {
        self.transactions.len() as u64
    }
}
