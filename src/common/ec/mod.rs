mod galois;

pub use galois::{GaloisField, GfPoly, QR_CODE_FIELD};

use super::error::{QRError, QRResult};

// Reed-Solomon encoder
//------------------------------------------------------------------------------

/// Computes error correction codewords for one block of data codewords.
/// Generator polynomials are products of (x - α^(base+i)) and are built
/// incrementally, so an encoder value reused across blocks pays for each
/// generator degree once.
pub struct ReedSolomonEncoder {
    field: &'static GaloisField,
    cached_generators: Vec<GfPoly>,
}

impl ReedSolomonEncoder {
    pub fn new(field: &'static GaloisField) -> Self {
        Self { field, cached_generators: vec![GfPoly::one(field)] }
    }

    fn build_generator(&mut self, degree: usize) -> &GfPoly {
        if degree >= self.cached_generators.len() {
            for d in self.cached_generators.len()..=degree {
                let root = self.field.exp(d - 1 + self.field.generator_base());
                let next =
                    self.cached_generators[d - 1].multiply(&GfPoly::new(self.field, vec![1, root]));
                self.cached_generators.push(next);
            }
        }
        &self.cached_generators[degree]
    }

    /// Treats the head of `codewords` as data, computes `ec_count` error
    /// correction codewords and writes them into the tail. No other slot of
    /// `codewords` is touched.
    pub fn encode(&mut self, codewords: &mut [u8], ec_count: usize) -> QRResult<()> {
        if ec_count == 0 {
            return Err(QRError::InvalidArgument("no error correction bytes"));
        }
        if codewords.len() <= ec_count {
            return Err(QRError::InvalidArgument("no data bytes provided"));
        }
        let data_len = codewords.len() - ec_count;
        let generator = self.build_generator(ec_count).clone();

        let info = GfPoly::new(self.field, codewords[..data_len].to_vec());
        let info = info.multiply_by_monomial(ec_count, 1);
        let (_, remainder) = info.divide(&generator)?;

        // Zero-pad on the left when the remainder degree falls short
        let num_zero = ec_count - remainder.coefficients().len();
        codewords[data_len..data_len + num_zero].fill(0);
        codewords[data_len + num_zero..].copy_from_slice(remainder.coefficients());
        Ok(())
    }
}
