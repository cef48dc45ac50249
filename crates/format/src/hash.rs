use crate::encode::{encode_header, encode_transaction_legacy};
use crate::model::{BlockHeader, Hash32, Transaction};
use sha2::{Digest, Sha256};
use std::fmt;


/// Double SHA-256 digest, kept in the byte order the hash function
/// produced it.
///
/// `Display` renders the conventional form: bytes reversed, lowercase hex.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Sha256d(pub Hash32);


impl Sha256d {
    pub fn digest(data: &[u8]) -> Self {
        let first = Sha256::digest(data);
        let second = Sha256::digest(first);
        let mut out = [0u8; 32];
        out.copy_from_slice(&second);
        Self(out)
    }

    pub fn as_bytes(&self) -> &Hash32 {
        &self.0
    }

    pub fn reversed(&self) -> Hash32 {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.reversed())
    }
}


impl fmt::Display for Sha256d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}


pub fn block_hash(header: &BlockHeader) -> Sha256d {
    Sha256d::digest(&encode_header(header))
}


pub fn transaction_hash(tx: &Transaction) -> Sha256d {
    Sha256d::digest(&encode_transaction_legacy(tx))
}
