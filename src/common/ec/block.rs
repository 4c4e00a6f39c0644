use std::ops::Deref;

use super::decoder::ReedSolomonDecoder;
use super::encoder::ReedSolomonEncoder;
use crate::error::{QRError, QRResult};
use crate::metadata::{ECLevel, Version};

// Block
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Block {
    data: Vec<u8>,
    ecc_count: usize,
    ecc: Vec<u8>,
}

impl Block {
    // Block awaiting its ecc
    pub fn new(data: &[u8], ecc_count: usize) -> Self {
        Self { data: data.to_vec(), ecc_count, ecc: Vec::new() }
    }

    pub fn with_ecc(data: &[u8], ecc_count: usize) -> QRResult<Self> {
        let mut block = Self::new(data, ecc_count);
        block.compute_ecc()?;
        Ok(block)
    }

    pub fn compute_ecc(&mut self) -> QRResult<()> {
        self.ecc = ReedSolomonEncoder::encode(&self.data, self.ecc_count)?;
        Ok(())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn ecc(&self) -> &[u8] {
        &self.ecc
    }

    pub fn ecc_count(&self) -> usize {
        self.ecc_count
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len() + self.ecc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_ecc(&self) -> bool {
        self.ecc.len() == self.ecc_count
    }

    // Data followed by ecc
    pub fn full(&self) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.len());
        full.extend_from_slice(&self.data);
        full.extend_from_slice(&self.ecc);
        full
    }

    // Number of corrupted codewords the block can recover from
    pub fn error_capacity(&self) -> usize {
        self.ecc_count / 2
    }

    // Rebuilds a block from a received codeword, data first
    pub fn from_codeword(codeword: &[u8], data_len: usize) -> QRResult<Self> {
        if data_len >= codeword.len() {
            return Err(QRError::InvalidEccCount { ecc: 0, data: data_len });
        }
        let (data, ecc) = codeword.split_at(data_len);
        Ok(Self { data: data.to_vec(), ecc_count: ecc.len(), ecc: ecc.to_vec() })
    }

    // Corrects errors in data and ecc, returning the corrected data
    pub fn rectify(&mut self) -> QRResult<&[u8]> {
        let mut full = self.full();
        ReedSolomonDecoder::default().decode(&mut full, self.ecc_count)?;
        let (data, ecc) = full.split_at(self.data.len());
        self.data.copy_from_slice(data);
        self.ecc.copy_from_slice(ecc);
        Ok(&self.data)
    }
}

// Block layout
//------------------------------------------------------------------------------

// Slices data codewords into group 1 blocks followed by the one codeword longer
// group 2 blocks
pub fn split_into_blocks(data: &[u8], version: Version, ec_level: ECLevel) -> QRResult<Vec<Block>> {
    let bs = version.block_structure(ec_level);
    let expected = bs.data_len();
    if data.len() != expected {
        return Err(QRError::DataLengthMismatch { expected, found: data.len() });
    }

    let group1_total = bs.group1_blocks * bs.group1_data_len;
    let (group1, group2) = data.split_at(group1_total);

    let mut blocks = Vec::with_capacity(bs.block_count());
    blocks.extend(group1.chunks(bs.group1_data_len).map(|d| Block::new(d, bs.ecc_per_block)));
    if bs.group2_blocks > 0 {
        blocks.extend(group2.chunks(bs.group2_data_len).map(|d| Block::new(d, bs.ecc_per_block)));
    }
    Ok(blocks)
}

pub fn calculate_ecc_for_blocks(blocks: &[Block]) -> QRResult<Vec<Block>> {
    blocks.iter().map(|b| Block::with_ecc(b.data(), b.ecc_count())).collect()
}

// Data codewords of every block interleaved, followed by ecc codewords interleaved
pub fn interleave_blocks(blocks: &[Block]) -> Vec<u8> {
    let data = blocks.iter().map(Block::data).collect::<Vec<_>>();
    let ecc = blocks.iter().map(Block::ecc).collect::<Vec<_>>();
    let mut res = interleave(&data);
    res.extend(interleave(&ecc));
    res
}

// Round robin merge of blocks. Shorter blocks drop out once exhausted.
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_len = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total = blocks.iter().map(|b| b.len()).sum();
    let mut res = Vec::with_capacity(total);
    for i in 0..max_len {
        for b in blocks {
            if let Some(&v) = b.get(i) {
                res.push(v);
            }
        }
    }
    res
}

// Position of a data codeword in the interleaved codeword stream
pub fn interleaved_index(version: Version, ec_level: ECLevel, data_index: usize) -> QRResult<usize> {
    let bs = version.block_structure(ec_level);
    let total = bs.data_len();
    if data_index >= total {
        return Err(QRError::CodewordOutOfRange { index: data_index, total });
    }

    let block_count = bs.block_count();
    let group1_total = bs.group1_blocks * bs.group1_data_len;
    let (block, offset) = if data_index < group1_total {
        (data_index / bs.group1_data_len, data_index % bs.group1_data_len)
    } else {
        let rest = data_index - group1_total;
        (bs.group1_blocks + rest / bs.group2_data_len, rest % bs.group2_data_len)
    };

    if offset < bs.group1_data_len {
        Ok(offset * block_count + block)
    } else {
        // Trailing codeword only group 2 blocks carry
        Ok(bs.group1_data_len * block_count + block - bs.group1_blocks)
    }
}

// Correctable codewords across every block of the symbol
pub fn error_correction_capacity(version: Version, ec_level: ECLevel) -> usize {
    let bs = version.block_structure(ec_level);
    bs.block_count() * (bs.ecc_per_block / 2)
}
