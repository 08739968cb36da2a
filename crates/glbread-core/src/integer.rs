//! Decimal integer conversion for primitive tokens.
//!
//! Only plain non-negative decimal literals are accepted: no sign, no
//! fraction, no exponent. Overflow of the target width is an error, not a
//! wrap.

use num_traits::{CheckedAdd, CheckedMul, FromPrimitive, PrimInt, Unsigned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerError {
    Empty,
    InvalidDigit { position: usize },
    Overflow,
}

impl IntegerError {
    pub const fn reason(self) -> &'static str {
        match self {
            IntegerError::Empty => "empty integer literal",
            IntegerError::InvalidDigit { .. } => "expected a non-negative decimal integer",
            IntegerError::Overflow => "integer literal out of range",
        }
    }
}

/// Accumulates `value = value * 10 + digit` over `digits`.
pub fn convert_integer<T>(digits: &[u8]) -> Result<T, IntegerError>
where
    T: PrimInt + Unsigned + FromPrimitive,
{
    if digits.is_empty() {
        return Err(IntegerError::Empty);
    }
    let ten = T::from_u8(10).ok_or(IntegerError::Overflow)?;
    let mut value = T::zero();
    for (position, &byte) in digits.iter().enumerate() {
        if !byte.is_ascii_digit() {
            return Err(IntegerError::InvalidDigit { position });
        }
        let digit = T::from_u8(byte - b'0').ok_or(IntegerError::Overflow)?;
        value = CheckedMul::checked_mul(&value, &ten)
            .and_then(|shifted| CheckedAdd::checked_add(&shifted, &digit))
            .ok_or(IntegerError::Overflow)?;
    }
    Ok(value)
}
