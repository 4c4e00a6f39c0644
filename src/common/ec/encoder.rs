use crate::error::{QRError, QRResult};

// Reed-Solomon encoder
//------------------------------------------------------------------------------

pub struct ReedSolomonEncoder;

impl ReedSolomonEncoder {
    // Product of (x - 2^i) for i in 0..degree, highest degree first
    pub fn build_generator(degree: usize) -> Vec<u8> {
        let mut gen = Vec::with_capacity(degree + 1);
        gen.push(1);
        let mut root = 1;
        for _ in 0..degree {
            let mut next = vec![0u8; gen.len() + 1];
            for (j, &c) in gen.iter().enumerate() {
                next[j] ^= c;
                next[j + 1] ^= rs_multiply(c, root);
            }
            gen = next;
            root = rs_multiply(root, 0x02);
        }
        gen
    }

    // Remainder of data(x) * x^ecc_count divided by the generator polynomial,
    // computed with a shift register
    pub fn encode(data: &[u8], ecc_count: usize) -> QRResult<Vec<u8>> {
        if ecc_count == 0 || data.len() + ecc_count > MAX_BLOCK_SIZE {
            return Err(QRError::InvalidEccCount { ecc: ecc_count, data: data.len() });
        }

        let gen = Self::build_generator(ecc_count);
        let mut reg = vec![0u8; ecc_count];
        for &b in data {
            let factor = b ^ reg[0];
            reg.rotate_left(1);
            reg[ecc_count - 1] = 0;
            for (r, &g) in reg.iter_mut().zip(&gen[1..]) {
                *r ^= rs_multiply(g, factor);
            }
        }
        Ok(reg)
    }
}

// Russian peasant multiplication modulo x^8 + x^4 + x^3 + x^2 + 1
pub fn rs_multiply(x: u8, y: u8) -> u8 {
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1D);
        z ^= ((y >> i) & 1) * x;
    }
    z
}


// Global constants
//------------------------------------------------------------------------------

pub const MAX_BLOCK_SIZE: usize = 255;
