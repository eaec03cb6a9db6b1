use std::fmt::{Display, Error, Formatter};
use std::ptr;
use std::sync::LazyLock;

use crate::common::error::{QRError, QRResult};

// Galois field
//------------------------------------------------------------------------------

/// The field every QR symbol computes error correction in: GF(256) over the
/// primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 with a 0-based generator.
pub static QR_CODE_FIELD: LazyLock<GaloisField> = LazyLock::new(|| GaloisField::new(0x11D, 256, 0));

/// Arithmetic over GF(size) for a given primitive polynomial. Elements are
/// plain bytes; multiplication and inversion go through precomputed exp/log
/// tables built by repeated field doubling.
#[derive(Debug)]
pub struct GaloisField {
    exp: Vec<u8>,
    log: Vec<u8>,
    size: usize,
    primitive: u32,
    generator_base: usize,
}

impl GaloisField {
    pub fn new(primitive: u32, size: usize, generator_base: usize) -> Self {
        let mut exp = vec![0u8; size];
        let mut log = vec![0u8; size];
        let mut x: u32 = 1;
        for e in exp.iter_mut() {
            *e = x as u8;
            x *= 2;
            if x >= size as u32 {
                x ^= primitive;
                x &= size as u32 - 1;
            }
        }
        for (i, &e) in exp.iter().take(size - 1).enumerate() {
            log[e as usize] = i as u8;
        }
        // log[0] stays 0 and is never consulted
        Self { exp, log, size, primitive, generator_base }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn generator_base(&self) -> usize {
        self.generator_base
    }

    /// α^a
    pub fn exp(&self, a: usize) -> u8 {
        debug_assert!(a < self.size, "Exponent out of range: {a}");
        self.exp[a]
    }

    /// Discrete log of a, base α
    pub fn log(&self, a: u8) -> u8 {
        debug_assert!(a != 0, "Log of zero is undefined");
        self.log[a as usize]
    }

    pub fn inverse(&self, a: u8) -> QRResult<u8> {
        if a == 0 {
            return Err(QRError::DivisionByZero);
        }
        Ok(self.exp[self.size - 1 - self.log[a as usize] as usize])
    }

    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_sum = self.log[a as usize] as usize + self.log[b as usize] as usize;
        self.exp[log_sum % (self.size - 1)]
    }

    /// Addition and subtraction coincide in a characteristic-2 field.
    pub fn add_or_subtract(a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// coefficient * x^degree
    pub fn monomial(&'static self, degree: usize, coefficient: u8) -> GfPoly {
        if coefficient == 0 {
            return GfPoly::zero(self);
        }
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        GfPoly::new(self, coefficients)
    }
}

impl Display for GaloisField {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "GF(0x{:x},{})", self.primitive, self.size)
    }
}


// Field polynomial
//------------------------------------------------------------------------------

/// Polynomial with GF coefficients, most significant first. Canonical form:
/// the leading coefficient is non-zero unless this is the zero polynomial,
/// whose sole representation is `[0]`. Instances are immutable; arithmetic
/// returns new polynomials.
#[derive(Debug, Clone)]
pub struct GfPoly {
    field: &'static GaloisField,
    coefficients: Vec<u8>,
}

impl PartialEq for GfPoly {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.field, other.field) && self.coefficients == other.coefficients
    }
}

impl Eq for GfPoly {}

impl GfPoly {
    pub fn new(field: &'static GaloisField, coefficients: Vec<u8>) -> Self {
        debug_assert!(!coefficients.is_empty(), "Empty coefficients");

        let coefficients = match coefficients.iter().position(|&c| c != 0) {
            None => vec![0],
            Some(0) => coefficients,
            Some(first_non_zero) => coefficients[first_non_zero..].to_vec(),
        };
        Self { field, coefficients }
    }

    pub fn zero(field: &'static GaloisField) -> Self {
        Self { field, coefficients: vec![0] }
    }

    pub fn one(field: &'static GaloisField) -> Self {
        Self { field, coefficients: vec![1] }
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficient of the x^degree term
    pub fn coefficient(&self, degree: usize) -> u8 {
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    /// Horner evaluation, with the x = 0 and x = 1 shortcuts.
    pub fn evaluate_at(&self, a: u8) -> u8 {
        if a == 0 {
            return self.coefficient(0);
        }
        if a == 1 {
            return self.coefficients.iter().fold(0, |acc, &c| GaloisField::add_or_subtract(acc, c));
        }
        let mut result = self.coefficients[0];
        for &c in &self.coefficients[1..] {
            result = GaloisField::add_or_subtract(self.field.multiply(a, result), c);
        }
        result
    }

    pub fn add_or_subtract(&self, other: &GfPoly) -> GfPoly {
        debug_assert!(ptr::eq(self.field, other.field), "Polynomials from different fields");

        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let mut sum = larger.clone();
        let length_diff = larger.len() - smaller.len();
        for (i, &c) in smaller.iter().enumerate() {
            sum[length_diff + i] ^= c;
        }
        GfPoly::new(self.field, sum)
    }

    /// Full convolution, O(n * m)
    pub fn multiply(&self, other: &GfPoly) -> GfPoly {
        debug_assert!(ptr::eq(self.field, other.field), "Polynomials from different fields");

        if self.is_zero() || other.is_zero() {
            return GfPoly::zero(self.field);
        }
        let mut product = vec![0u8; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] ^= self.field.multiply(a, b);
            }
        }
        GfPoly::new(self.field, product)
    }

    pub fn multiply_scalar(&self, scalar: u8) -> GfPoly {
        if scalar == 0 {
            return GfPoly::zero(self.field);
        }
        if scalar == 1 {
            return self.clone();
        }
        let product = self.coefficients.iter().map(|&c| self.field.multiply(c, scalar)).collect();
        GfPoly::new(self.field, product)
    }

    /// coefficient * x^degree * self
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> GfPoly {
        if coefficient == 0 {
            return GfPoly::zero(self.field);
        }
        let mut product = vec![0u8; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            product[i] = self.field.multiply(c, coefficient);
        }
        GfPoly::new(self.field, product)
    }

    /// Synthetic division, returning (quotient, remainder). The remainder's
    /// degree strictly decreases each round, which bounds the loop.
    pub fn divide(&self, other: &GfPoly) -> QRResult<(GfPoly, GfPoly)> {
        debug_assert!(ptr::eq(self.field, other.field), "Polynomials from different fields");

        if other.is_zero() {
            return Err(QRError::DivisionByZero);
        }
        let mut quotient = GfPoly::zero(self.field);
        let mut remainder = self.clone();
        let denominator_leading = other.coefficient(other.degree());
        let inverse_denominator_leading = self.field.inverse(denominator_leading)?;
        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_diff = remainder.degree() - other.degree();
            let scale = self
                .field
                .multiply(remainder.coefficient(remainder.degree()), inverse_denominator_leading);
            let term = other.multiply_by_monomial(degree_diff, scale);
            let iteration_quotient = self.field.monomial(degree_diff, scale);
            quotient = quotient.add_or_subtract(&iteration_quotient);
            remainder = remainder.add_or_subtract(&term);
        }
        Ok((quotient, remainder))
    }
}
