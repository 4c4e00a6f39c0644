use log::debug;

use super::galois::{GaloisField, QR_FIELD};
use super::poly::GFPoly;
use crate::error::{QRError, QRResult};

// Reed-Solomon decoder
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct ReedSolomonDecoder<'a> {
    field: &'a GaloisField,
}

impl Default for ReedSolomonDecoder<'static> {
    fn default() -> Self {
        Self::new(&QR_FIELD)
    }
}

impl<'a> ReedSolomonDecoder<'a> {
    pub fn new(field: &'a GaloisField) -> Self {
        Self { field }
    }

    // Corrects the received codeword in place and returns the number of corrected
    // bytes. The codeword is left untouched if correction fails.
    pub fn decode(&self, received: &mut [u8], two_s: usize) -> QRResult<usize> {
        let syndromes = self.calculate_syndromes(received, two_s);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let res = self.correct(received, &syndromes, two_s);
        if let Err(e) = &res {
            debug!("Reed-Solomon decoding failed: {e}");
        }
        let corrected = res?;
        received.copy_from_slice(&corrected.0);
        Ok(corrected.1)
    }

    fn correct(&self, received: &[u8], syndromes: &[u8], two_s: usize) -> QRResult<(Vec<u8>, usize)> {
        let syndrome_poly = self.syndrome_poly(syndromes);
        let (sigma, omega) =
            self.run_euclidean_algorithm(self.field.build_monomial(two_s, 1), syndrome_poly, two_s)?;
        let locations = self.find_error_locations(&sigma)?;
        let magnitudes = self.find_error_magnitudes(&omega, &locations)?;

        let mut corrected = received.to_vec();
        for (&loc, &mag) in locations.iter().zip(&magnitudes) {
            let pos = self.error_position(loc, corrected.len())?;
            corrected[pos] ^= mag;
        }

        if self.calculate_syndromes(&corrected, two_s).iter().any(|&s| s != 0) {
            return Err(QRError::TooManyError("Corrected codeword has non-zero syndromes"));
        }
        Ok((corrected, locations.len()))
    }

    // S_i = r(2^(i + base)) for i in 0..two_s
    pub fn calculate_syndromes(&self, received: &[u8], two_s: usize) -> Vec<u8> {
        let poly = GFPoly::new(self.field, received);
        let base = self.field.generator_base();
        (0..two_s).map(|i| poly.evaluate_at(self.field.exp(i + base))).collect()
    }

    // Polynomial whose x^i coefficient is S_i
    fn syndrome_poly(&self, syndromes: &[u8]) -> GFPoly<'a> {
        let coeffs = syndromes.iter().rev().copied().collect::<Vec<_>>();
        GFPoly::new(self.field, &coeffs)
    }

    // Returns the error locator (sigma) and error evaluator (omega) polynomials
    pub fn run_euclidean_algorithm(
        &self,
        a: GFPoly<'a>,
        b: GFPoly<'a>,
        r_deg: usize,
    ) -> QRResult<(GFPoly<'a>, GFPoly<'a>)> {
        let (a, b) = if a.degree() < b.degree() { (b, a) } else { (a, b) };

        let mut r_last = a;
        let mut r = b;
        let mut t_last = self.field.zero();
        let mut t = self.field.one();

        while 2 * r.degree() >= r_deg {
            let r_last_last = std::mem::replace(&mut r_last, r);
            let t_last_last = std::mem::replace(&mut t_last, t);

            if r_last.is_zero() {
                return Err(QRError::TooManyError("Remainder became zero prematurely"));
            }
            r = r_last_last;

            let lead_inv = self.field.inverse(r_last.coefficient(r_last.degree()))?;
            let mut q = self.field.zero();
            while r.degree() >= r_last.degree() && !r.is_zero() {
                let deg_diff = r.degree() - r_last.degree();
                let scale = self.field.multiply(r.coefficient(r.degree()), lead_inv);
                q = q.add_or_subtract(&self.field.build_monomial(deg_diff, scale));
                r = r.add_or_subtract(&r_last.multiply_by_monomial(deg_diff, scale));
            }

            t = q.multiply(&t_last).add_or_subtract(&t_last_last);

            if r.degree() >= r_last.degree() {
                return Err(QRError::TooManyError("Division algorithm failed to reduce polynomial"));
            }
        }

        let sigma_tilde_at_zero = t.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(QRError::TooManyError("sigmaTilde(0) was zero"));
        }

        let inv = self.field.inverse(sigma_tilde_at_zero)?;
        Ok((t.multiply_scalar(inv), r.multiply_scalar(inv)))
    }

    // Chien search over every non-zero field element
    pub fn find_error_locations(&self, locator: &GFPoly<'a>) -> QRResult<Vec<u8>> {
        let num_errors = locator.degree();
        if num_errors == 1 {
            return Ok(vec![locator.coefficient(1)]);
        }

        let mut locations = Vec::with_capacity(num_errors);
        for x in 1..=255u8 {
            if locations.len() == num_errors {
                break;
            }
            if locator.evaluate_at(x) == 0 {
                locations.push(self.field.inverse(x)?);
            }
        }

        if locations.len() != num_errors {
            return Err(QRError::TooManyError("Error locator degree does not match number of roots"));
        }
        Ok(locations)
    }

    // Forney's formula
    pub fn find_error_magnitudes(&self, evaluator: &GFPoly<'a>, locations: &[u8]) -> QRResult<Vec<u8>> {
        let f = self.field;
        locations
            .iter()
            .enumerate()
            .map(|(i, &loc)| {
                let xi_inv = f.inverse(loc)?;
                let denom = locations
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .fold(1, |d, (_, &lj)| f.multiply(d, f.multiply(lj, xi_inv) ^ 1));
                let denom_inv = f
                    .inverse(denom)
                    .map_err(|_| QRError::TooManyError("Error magnitude denominator was zero"))?;
                let mut mag = f.multiply(evaluator.evaluate_at(xi_inv), denom_inv);
                if f.generator_base() != 0 {
                    mag = f.multiply(mag, xi_inv);
                }
                Ok(mag)
            })
            .collect()
    }

    fn error_position(&self, location: u8, len: usize) -> QRResult<usize> {
        let log = self.field.log(location)?;
        len.checked_sub(log + 1).ok_or(QRError::TooManyError("Bad error location"))
    }
}

// Standalone decoding steps
//------------------------------------------------------------------------------

impl<'a> ReedSolomonDecoder<'a> {
    // Error locator coefficients, highest degree first
    pub fn find_error_locator(&self, syndromes: &[u8]) -> QRResult<Vec<u8>> {
        let two_s = syndromes.len();
        let syndrome_poly = self.syndrome_poly(syndromes);
        let (sigma, _) =
            self.run_euclidean_algorithm(self.field.build_monomial(two_s, 1), syndrome_poly, two_s)?;
        Ok(sigma.coefficients().to_vec())
    }

    // Byte positions of errors in a codeword of length len. Coefficients are
    // tried highest degree first, then lowest degree first.
    pub fn find_errors(&self, locator_coeffs: &[u8], len: usize) -> QRResult<Vec<usize>> {
        let positions = |coeffs: &[u8]| -> QRResult<Vec<usize>> {
            let locator = GFPoly::new(self.field, coeffs);
            self.find_error_locations(&locator)?
                .into_iter()
                .map(|loc| self.error_position(loc, len))
                .collect()
        };

        positions(locator_coeffs).or_else(|e| {
            debug!("Error search failed with given coefficient order, retrying reversed: {e}");
            let reversed = locator_coeffs.iter().rev().copied().collect::<Vec<_>>();
            positions(&reversed)
        })
    }

    // Error magnitudes for the given error locations, with the evaluator taken as
    // S(x) * sigma(x) mod x^2S
    pub fn forney(&self, syndromes: &[u8], locations: &[u8], locator_coeffs: &[u8]) -> QRResult<Vec<u8>> {
        let two_s = syndromes.len();
        let locator = GFPoly::new(self.field, locator_coeffs);
        let prod = self.syndrome_poly(syndromes).multiply(&locator);
        let coeffs = prod.coefficients();
        let evaluator = GFPoly::new(self.field, &coeffs[coeffs.len().saturating_sub(two_s)..]);
        self.find_error_magnitudes(&evaluator, locations)
    }
}
