//! Exact numeric types centralizing parsing, arithmetic and formatting.
//!
//! Every quantity in an assessment is an exact rational. Formatting prints
//! terminating values as decimals and anything else as a reduced fraction,
//! so no value is ever approximated on its way into a report.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use crate::error::NumberError;

/// Parse a literal such as `3`, `-1`, `2.0`, `5.001` or `7/3` exactly.
///
/// # Errors
///
/// Returns [`NumberError::InvalidDecimal`] for anything else.
pub fn parse_decimal(text: &str) -> Result<BigRational, NumberError> {
    let invalid = || NumberError::InvalidDecimal(text.to_string());
    let trimmed = text.trim();

    if let Some((numer, denom)) = trimmed.split_once('/') {
        let numer: BigInt = numer.trim().parse().map_err(|_| invalid())?;
        let denom: BigInt = denom.trim().parse().map_err(|_| invalid())?;
        if denom.is_zero() {
            return Err(invalid());
        }
        return Ok(BigRational::new(numer, denom));
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) if !fraction.is_empty() => (whole, fraction),
        Some(_) => return Err(invalid()),
        None => (unsigned, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let mut numer: BigInt = format!("{whole}{fraction}").parse().map_err(|_| invalid())?;
    if negative {
        numer = -numer;
    }
    let denom = num_traits::pow(BigInt::from(10u8), fraction.len());
    Ok(BigRational::new(numer, denom))
}

/// Format a rational exactly, padding decimals to at least `min_scale`
/// fractional digits.
#[must_use]
pub fn format_decimal(value: &BigRational, min_scale: usize) -> String {
    let (twos, fives, rest) = split_twos_and_fives(value.denom());
    if !rest.is_one() {
        return format!("{}/{}", value.numer(), value.denom());
    }

    let scale = twos.max(fives).max(min_scale);
    let factor = BigRational::from_integer(num_traits::pow(BigInt::from(10u8), scale));
    let scaled = (value * factor).to_integer();
    let sign = if scaled.is_negative() { "-" } else { "" };
    let mut digits = scaled.abs().to_string();
    if scale == 0 {
        return format!("{sign}{digits}");
    }
    if digits.len() <= scale {
        digits = format!("{}{digits}", "0".repeat(scale + 1 - digits.len()));
    }
    let split = digits.len() - scale;
    format!("{sign}{}.{}", &digits[..split], &digits[split..])
}

fn split_twos_and_fives(denominator: &BigInt) -> (usize, usize, BigInt) {
    let mut rest = denominator.abs();
    let mut count = |prime: u8| {
        let prime = BigInt::from(prime);
        let mut n = 0;
        while !rest.is_zero() && (&rest % &prime).is_zero() {
            rest /= &prime;
            n += 1;
        }
        n
    };
    let twos = count(2);
    let fives = count(5);
    (twos, fives, rest)
}

/// Integers or decimal strings; JSON floats are refused so nothing is rounded
/// before it reaches the engine.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Integer(i64),
    Text(String),
}

pub(crate) fn deserialize_rational<'de, D>(deserializer: D) -> Result<BigRational, D::Error>
where
    D: Deserializer<'de>,
{
    match DecimalRepr::deserialize(deserializer)? {
        DecimalRepr::Integer(value) => Ok(BigRational::from_integer(BigInt::from(value))),
        DecimalRepr::Text(text) => parse_decimal(&text).map_err(serde::de::Error::custom),
    }
}

/// A player's weight in FOR/AGAINST sums. Never negative.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VotingStrength(BigRational);

impl VotingStrength {
    /// # Errors
    ///
    /// Returns [`NumberError::NegativeStrength`] for values below zero.
    pub fn new(value: BigRational) -> Result<Self, NumberError> {
        if value.is_negative() {
            return Err(NumberError::NegativeStrength(format_decimal(&value, 0)));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn from_integer(value: u64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    /// # Errors
    ///
    /// Returns an error for malformed or negative literals.
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        Self::new(parse_decimal(text)?)
    }

    #[must_use]
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    #[must_use]
    pub const fn raw(&self) -> &BigRational {
        &self.0
    }

    /// Apply a signed difference, stopping at zero.
    #[must_use]
    pub fn saturating_add(&self, difference: &VotingStrengthDifference) -> Self {
        Self::clamped(&self.0 + &difference.0)
    }

    /// Scale by a factor, stopping at zero.
    #[must_use]
    pub fn scaled(&self, factor: &BigRational) -> Self {
        Self::clamped(&self.0 * factor)
    }

    fn clamped(value: BigRational) -> Self {
        if value.is_negative() {
            Self::zero()
        } else {
            Self(value)
        }
    }
}

impl fmt::Display for VotingStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(&self.0, 0))
    }
}

impl Add for VotingStrength {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a VotingStrength> for VotingStrength {
    type Output = Self;

    fn add(self, rhs: &'a VotingStrength) -> Self {
        Self(self.0 + &rhs.0)
    }
}

impl Sum for VotingStrength {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a VotingStrength> for VotingStrength {
    fn sum<I: Iterator<Item = &'a VotingStrength>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Serialize for VotingStrength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VotingStrength {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::new(deserialize_rational(deserializer)?).map_err(serde::de::Error::custom)
    }
}

/// A signed change to a voting strength.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VotingStrengthDifference(BigRational);

impl VotingStrengthDifference {
    #[must_use]
    pub const fn new(value: BigRational) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn from_integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    /// # Errors
    ///
    /// Returns [`NumberError::InvalidDecimal`] for malformed literals.
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        parse_decimal(text).map(Self)
    }

    #[must_use]
    pub const fn raw(&self) -> &BigRational {
        &self.0
    }

    /// Rendering with an explicit sign, e.g. `+2` or `-1/3`.
    #[must_use]
    pub fn signed(&self) -> String {
        if self.0.is_negative() {
            format_decimal(&self.0, 0)
        } else {
            format!("+{}", format_decimal(&self.0, 0))
        }
    }
}

impl fmt::Display for VotingStrengthDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(&self.0, 0))
    }
}

impl Serialize for VotingStrengthDifference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VotingStrengthDifference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_rational(deserializer).map(Self)
    }
}

/// Adoption index: the multiple of opposing strength that support must reach.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalAi(BigRational);

impl ProposalAi {
    /// # Errors
    ///
    /// Returns [`NumberError::NonPositiveAi`] unless the value is above zero.
    pub fn new(value: BigRational) -> Result<Self, NumberError> {
        if !value.is_positive() {
            return Err(NumberError::NonPositiveAi(format_decimal(&value, 1)));
        }
        Ok(Self(value))
    }

    /// # Errors
    ///
    /// Returns an error for malformed or non-positive literals.
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        Self::new(parse_decimal(text)?)
    }

    #[must_use]
    pub const fn raw(&self) -> &BigRational {
        &self.0
    }

    /// The support needed to meet this index against `against`.
    #[must_use]
    pub fn threshold(&self, against: &VotingStrength) -> BigRational {
        &self.0 * against.raw()
    }
}

impl fmt::Display for ProposalAi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(&self.0, 1))
    }
}

impl Serialize for ProposalAi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ProposalAi {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::new(deserialize_rational(deserializer)?).map_err(serde::de::Error::custom)
    }
}
