use crate::model::{Block, BlockHeader, Transaction, HEADER_SIZE};
use crate::varint;


pub fn encode_header(header: &BlockHeader) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    out[0..4].copy_from_slice(&header.version.to_le_bytes());
    out[4..36].copy_from_slice(&header.previous_block_hash);
    out[36..68].copy_from_slice(&header.merkle_root);
    out[68..72].copy_from_slice(&header.time.to_le_bytes());
    out[72..76].copy_from_slice(&header.bits.to_le_bytes());
    out[76..80].copy_from_slice(&header.nonce.to_le_bytes());
    out
}


/// Legacy serialization, the one transaction ids are computed over.
pub fn encode_transaction_legacy(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::new();
    write_transaction(&mut out, tx, false);
    out
}


/// Serialization as found in block files: the extended form iff any
/// input carries a witness.
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::new();
    write_transaction(&mut out, tx, tx.has_witness());
    out
}


fn write_transaction(out: &mut Vec<u8>, tx: &Transaction, with_witness: bool) {
    out.extend_from_slice(&tx.version.to_le_bytes());
    if with_witness {
        out.extend_from_slice(&[0x00, 0x01]);
    }

    varint::write(out, tx.inputs.len() as u64);
    for input in tx.inputs.iter() {
        out.extend_from_slice(&input.previous_transaction_hash);
        out.extend_from_slice(&input.previous_output_index.to_le_bytes());
        write_var_bytes(out, &input.script_signature);
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }

    varint::write(out, tx.outputs.len() as u64);
    for output in tx.outputs.iter() {
        out.extend_from_slice(&output.value.to_le_bytes());
        write_var_bytes(out, &output.script_pub_key);
    }

    if with_witness {
        for input in tx.inputs.iter() {
            varint::write(out, input.witness.len() as u64);
            for item in input.witness.iter() {
                write_var_bytes(out, item);
            }
        }
    }

    out.extend_from_slice(&tx.lock_time.to_le_bytes());
}


fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    varint::write(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}


/// Frame payload of a block: header, transaction count, transactions.
pub fn encode_block(block: &Block) -> Vec<u8> {
    let mut out = Vec::with_capacity(block.size as usize);
    out.extend_from_slice(&encode_header(&block.header));
    varint::write(&mut out, block.transactions.len() as u64);
    for tx in block.transactions.iter() {
        write_transaction(&mut out, tx, tx.has_witness());
    }
    out
}


pub(crate) fn block_payload_len(transactions: &[Transaction]) -> usize {
    HEADER_SIZE
        + varint::encoded_len(transactions.len() as u64)
        + transactions.iter().map(transaction_len).sum::<usize>()
}


fn transaction_len(tx: &Transaction) -> usize {
    let with_witness = tx.has_witness();
    let var_bytes_len = |bytes: &[u8]| varint::encoded_len(bytes.len() as u64) + bytes.len();

    let mut len = 4 + 4;
    if with_witness {
        len += 2;
    }
    len += varint::encoded_len(tx.inputs.len() as u64);
    for input in tx.inputs.iter() {
        len += 32 + 4 + var_bytes_len(&input.script_signature) + 4;
        if with_witness {
            len += varint::encoded_len(input.witness.len() as u64);
            len += input.witness.iter().map(|item| var_bytes_len(item)).sum::<usize>();
        }
    }
    len += varint::encoded_len(tx.outputs.len() as u64);
    len += tx.outputs.iter().map(|output| 8 + var_bytes_len(&output.script_pub_key)).sum::<usize>();
    len
}


/// Appends a complete frame: magic, payload length, payload.
pub fn write_frame(out: &mut Vec<u8>, magic: [u8; 4], block: &Block) {
    let payload = encode_block(block);
    out.extend_from_slice(&magic);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TxInput, TxOutput};

    fn sample_tx(witness: Vec<Vec<u8>>) -> Transaction {
        Transaction {
            version: 2,
            inputs: vec![TxInput {
                previous_transaction_hash: [7; 32],
                previous_output_index: 1,
                script_signature: vec![0x51; 300],
                sequence: 0xffff_fffe,
                witness,
            }],
            outputs: vec![TxOutput {
                value: 1_000,
                script_pub_key: vec![0x00, 0x14],
            }],
            lock_time: 42,
        }
    }

    #[test]
    fn test_header_layout() {
        let header = BlockHeader {
            version: 1,
            previous_block_hash: [0xaa; 32],
            merkle_root: [0xbb; 32],
            time: 0x01020304,
            bits: 0x1d00ffff,
            nonce: 7,
        };
        let bytes = encode_header(&header);
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..36], &[0xaa; 32]);
        assert_eq!(&bytes[68..72], &[4, 3, 2, 1]);
        assert_eq!(&bytes[72..76], &[0xff, 0xff, 0x00, 0x1d]);
        assert_eq!(&bytes[76..80], &[7, 0, 0, 0]);
    }

    #[test]
    fn test_lengths_match_encoding() {
        let header = BlockHeader {
            version: 4,
            previous_block_hash: [0; 32],
            merkle_root: [1; 32],
            time: 1,
            bits: 2,
            nonce: 3,
        };
        let transactions = vec![
            sample_tx(vec![]),
            sample_tx(vec![vec![1; 72], vec![2; 33]]),
        ];
        let block = Block::new(header, transactions);
        assert_eq!(block.size as usize, encode_block(&block).len());
    }

    #[test]
    fn test_witness_is_left_out_of_legacy_form() {
        let tx = sample_tx(vec![vec![1; 72]]);
        let full = encode_transaction(&tx);
        let legacy = encode_transaction_legacy(&tx);
        assert_eq!(&full[4..6], &[0x00, 0x01]);
        assert_eq!(legacy, encode_transaction(&sample_tx(vec![])));
        assert_eq!(full.len(), legacy.len() + 2 + 1 + 1 + 72);
    }
}
