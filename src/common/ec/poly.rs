use std::fmt::{Debug, Formatter};

use super::galois::GaloisField;

// Polynomial over a galois field
//------------------------------------------------------------------------------

// Coefficients are stored highest degree first with leading zeros trimmed.
// The zero polynomial is [0].
#[derive(Clone)]
pub struct GFPoly<'a> {
    field: &'a GaloisField,
    coeffs: Vec<u8>,
}

impl<'a> GFPoly<'a> {
    pub fn new(field: &'a GaloisField, coeffs: &[u8]) -> Self {
        let coeffs = match coeffs.iter().position(|&c| c != 0) {
            Some(i) => coeffs[i..].to_vec(),
            None => vec![0],
        };
        Self { field, coeffs }
    }

    pub fn field(&self) -> &'a GaloisField {
        self.field
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs[0] == 0
    }

    // Coefficient of x^degree
    pub fn coefficient(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coeffs[self.coeffs.len() - 1 - degree]
    }

    pub fn evaluate_at(&self, x: u8) -> u8 {
        if x == 0 {
            return self.coefficient(0);
        }
        if x == 1 {
            return self.coeffs.iter().fold(0, |acc, &c| acc ^ c);
        }
        self.coeffs.iter().fold(0, |acc, &c| self.field.multiply(acc, x) ^ c)
    }

    pub fn add_or_subtract(&self, other: &GFPoly<'a>) -> GFPoly<'a> {
        debug_assert!(self.field == other.field, "Polynomials belong to different fields");

        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (larger, smaller) = if self.coeffs.len() >= other.coeffs.len() {
            (&self.coeffs, &other.coeffs)
        } else {
            (&other.coeffs, &self.coeffs)
        };
        let diff = larger.len() - smaller.len();
        let mut sum = larger.clone();
        for (s, &c) in sum[diff..].iter_mut().zip(smaller.iter()) {
            *s ^= c;
        }
        GFPoly::new(self.field, &sum)
    }

    pub fn multiply(&self, other: &GFPoly<'a>) -> GFPoly<'a> {
        debug_assert!(self.field == other.field, "Polynomials belong to different fields");

        if self.is_zero() || other.is_zero() {
            return self.field.zero();
        }

        let mut prod = vec![0u8; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                prod[i + j] ^= self.field.multiply(a, b);
            }
        }
        GFPoly::new(self.field, &prod)
    }

    pub fn multiply_scalar(&self, scalar: u8) -> GFPoly<'a> {
        match scalar {
            0 => self.field.zero(),
            1 => self.clone(),
            _ => {
                let prod = self.coeffs.iter().map(|&c| self.field.multiply(c, scalar));
                GFPoly::new(self.field, &prod.collect::<Vec<_>>())
            }
        }
    }

    // Multiplies by coeff * x^degree
    pub fn multiply_by_monomial(&self, degree: usize, coeff: u8) -> GFPoly<'a> {
        if coeff == 0 || self.is_zero() {
            return self.field.zero();
        }
        let mut prod = Vec::with_capacity(self.coeffs.len() + degree);
        prod.extend(self.coeffs.iter().map(|&c| self.field.multiply(c, coeff)));
        prod.resize(self.coeffs.len() + degree, 0);
        GFPoly::new(self.field, &prod)
    }
}

impl PartialEq for GFPoly<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.coeffs == other.coeffs
    }
}

impl Eq for GFPoly<'_> {}

impl Debug for GFPoly<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GFPoly{:?}", self.coeffs)
    }
}
