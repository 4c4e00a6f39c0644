use std::fmt::{Debug, Formatter};

use super::poly::GFPoly;
use crate::error::{QRError, QRResult};

// Galois field
//------------------------------------------------------------------------------

pub struct GaloisField {
    exp: [u8; FIELD_SIZE],
    log: [u8; FIELD_SIZE],
    primitive: u16,
    generator_base: usize,
}

// Field used by QR codes: x^8 + x^4 + x^3 + x^2 + 1 with generator base 0
pub static QR_FIELD: GaloisField = GaloisField::new(0x11D, 0);

impl GaloisField {
    pub const fn new(primitive: u16, generator_base: usize) -> Self {
        let mut exp = [0u8; FIELD_SIZE];
        let mut log = [0u8; FIELD_SIZE];

        let mut x: u16 = 1;
        let mut i = 0;
        while i < FIELD_SIZE {
            exp[i] = x as u8;
            x <<= 1;
            if x >= FIELD_SIZE as u16 {
                x ^= primitive;
            }
            i += 1;
        }

        i = 0;
        while i < FIELD_SIZE - 1 {
            log[exp[i] as usize] = i as u8;
            i += 1;
        }

        Self { exp, log, primitive, generator_base }
    }

    pub fn primitive(&self) -> u16 {
        self.primitive
    }

    pub fn size(&self) -> usize {
        FIELD_SIZE
    }

    pub fn generator_base(&self) -> usize {
        self.generator_base
    }

    // 2 to the power of a
    pub fn exp(&self, a: usize) -> u8 {
        self.exp[a % (FIELD_SIZE - 1)]
    }

    pub fn log(&self, a: u8) -> QRResult<usize> {
        if a == 0 {
            return Err(QRError::LogOfZero);
        }
        Ok(self.log[a as usize] as usize)
    }

    pub fn add_or_subtract(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log[a as usize] as usize + self.log[b as usize] as usize;
        self.exp[sum % (FIELD_SIZE - 1)]
    }

    pub fn divide(&self, a: u8, b: u8) -> QRResult<u8> {
        if b == 0 {
            return Err(QRError::DivisionByZero);
        }
        if a == 0 {
            return Ok(0);
        }
        let diff = self.log[a as usize] as usize + (FIELD_SIZE - 1) - self.log[b as usize] as usize;
        Ok(self.exp[diff % (FIELD_SIZE - 1)])
    }

    pub fn inverse(&self, a: u8) -> QRResult<u8> {
        if a == 0 {
            return Err(QRError::DivisionByZero);
        }
        Ok(self.exp[(FIELD_SIZE - 1) - self.log[a as usize] as usize])
    }

    pub fn zero(&self) -> GFPoly<'_> {
        GFPoly::new(self, &[0])
    }

    pub fn one(&self) -> GFPoly<'_> {
        GFPoly::new(self, &[1])
    }

    pub fn build_monomial(&self, degree: usize, coeff: u8) -> GFPoly<'_> {
        if coeff == 0 {
            return self.zero();
        }
        let mut coeffs = vec![0; degree + 1];
        coeffs[0] = coeff;
        GFPoly::new(self, &coeffs)
    }
}

impl Debug for GaloisField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaloisField")
            .field("primitive", &format_args!("{:#x}", self.primitive))
            .field("generator_base", &self.generator_base)
            .finish()
    }
}

impl PartialEq for GaloisField {
    fn eq(&self, other: &Self) -> bool {
        self.primitive == other.primitive && self.generator_base == other.generator_base
    }
}

impl Eq for GaloisField {}


// Global constants
//------------------------------------------------------------------------------

pub const FIELD_SIZE: usize = 256;
