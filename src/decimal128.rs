//! [BSON Decimal128](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.md) data type representation

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::error::{Decimal128ErrorKind, Error, Result};

/// Struct representing a BSON Decimal128 type.
///
/// The value is stored as its 16 little-endian IEEE 754-2008 BID bytes. Parsing and formatting
/// preserve the exact coefficient and exponent, so `"1.0"` and `"1.00"` are distinct values that
/// each format back to themselves.
///
/// ```rust
/// use bson_core::Decimal128;
///
/// let d: Decimal128 = "1.50E+4".parse().unwrap();
/// assert_eq!(d.to_string(), "1.50E+4");
/// ```
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub struct Decimal128 {
    /// BSON bytes containing the decimal128. Stored for round tripping.
    pub(crate) bytes: [u8; 16],
}

const EXPONENT_BIAS: i64 = 6176;
const EXPONENT_MIN: i64 = -6176;
const EXPONENT_MAX: i64 = 6111;
const MAX_DIGITS: usize = 34;
const COEFFICIENT_MASK: u128 = (1 << 113) - 1;
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;

const COMBINATION_NAN: u128 = 0b11111;
const COMBINATION_INFINITY: u128 = 0b11110;
const NAN_BITS: u128 = 0x7C << 120;
const SNAN_BITS: u128 = 0x7E << 120;
const INFINITY_BITS: u128 = 0x78 << 120;
const SIGN_BIT: u128 = 1 << 127;

impl Decimal128 {
    /// Constructs a new `Decimal128` from the provided raw byte representation.
    pub const fn from_bytes(bytes: [u8; 128 / 8]) -> Self {
        Self { bytes }
    }

    /// Returns the raw byte representation of this `Decimal128`.
    pub const fn bytes(&self) -> [u8; 128 / 8] {
        self.bytes
    }

    /// Whether this value is a quiet or signalling NaN.
    pub fn is_nan(&self) -> bool {
        matches!(ParsedDecimal128::new(self).kind, Decimal128Kind::NaN { .. })
    }

    /// Whether this value is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        matches!(ParsedDecimal128::new(self).kind, Decimal128Kind::Infinity)
    }

    /// Whether the sign bit is set. Negative zero reports `true`.
    pub fn is_sign_negative(&self) -> bool {
        ParsedDecimal128::new(self).sign
    }

    /// The value as an `i64` when it is a finite integer in range. Trailing fractional zeros do
    /// not prevent the conversion.
    pub(crate) fn to_i64_exact(self) -> Option<i64> {
        let parsed = ParsedDecimal128::new(&self);
        let Decimal128Kind::Finite {
            exponent,
            coefficient,
        } = parsed.kind
        else {
            return None;
        };

        let magnitude = if exponent >= 0 {
            let scale = pow10(exponent)?;
            coefficient.checked_mul(scale)?
        } else {
            match pow10(-exponent) {
                Some(scale) if coefficient % scale == 0 => coefficient / scale,
                Some(_) => return None,
                None if coefficient == 0 => 0,
                None => return None,
            }
        };

        let magnitude = i128::try_from(magnitude).ok()?;
        let signed = if parsed.sign { -magnitude } else { magnitude };
        i64::try_from(signed).ok()
    }

    /// The value as an `f64` when converting to the nearest double and back yields the same
    /// decimal number.
    pub(crate) fn to_f64_exact(self) -> Option<f64> {
        let parsed = ParsedDecimal128::new(&self);
        match parsed.kind {
            Decimal128Kind::NaN { .. } => Some(f64::NAN),
            Decimal128Kind::Infinity if parsed.sign => Some(f64::NEG_INFINITY),
            Decimal128Kind::Infinity => Some(f64::INFINITY),
            Decimal128Kind::Finite { .. } => {
                let f: f64 = parsed.to_string().parse().ok()?;
                if !f.is_finite() {
                    return None;
                }
                let back = ParsedDecimal128::from_f64(f)?;
                (back.numeric_cmp(&parsed) == Some(Ordering::Equal)).then_some(f)
            }
        }
    }

    /// Converts a double by way of its shortest round-tripping decimal representation.
    pub(crate) fn from_f64_shortest(value: f64) -> Option<Self> {
        ParsedDecimal128::from_f64(value).map(|p| p.pack())
    }
}

impl From<i32> for Decimal128 {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<i64> for Decimal128 {
    fn from(value: i64) -> Self {
        ParsedDecimal128 {
            sign: value < 0,
            kind: Decimal128Kind::Finite {
                exponent: 0,
                coefficient: u128::from(value.unsigned_abs()),
            },
        }
        .pack()
    }
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal128(\"{}\")", self)
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ParsedDecimal128::new(self))
    }
}

impl FromStr for Decimal128 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parsed: ParsedDecimal128 = s.parse().map_err(Error::decimal128)?;
        Ok(parsed.pack())
    }
}

fn pow10(exp: i64) -> Option<u128> {
    10u128.checked_pow(u32::try_from(exp).ok()?)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParsedDecimal128 {
    sign: bool,
    kind: Decimal128Kind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Decimal128Kind {
    NaN { signalling: bool },
    Infinity,
    Finite { exponent: i64, coefficient: u128 },
}

impl ParsedDecimal128 {
    fn new(source: &Decimal128) -> Self {
        let bits = u128::from_le_bytes(source.bytes);
        let sign = bits & SIGN_BIT != 0;
        let combination = (bits >> 122) & 0b11111;

        let kind = if combination == COMBINATION_NAN {
            Decimal128Kind::NaN {
                signalling: (bits >> 121) & 1 == 1,
            }
        } else if combination == COMBINATION_INFINITY {
            Decimal128Kind::Infinity
        } else if (bits >> 125) & 0b11 == 0b11 {
            // The implied coefficient is at least 2^113, above the 34 digit maximum, so the
            // value is a non-canonical zero.
            Decimal128Kind::Finite {
                exponent: ((bits >> 111) & 0x3FFF) as i64 - EXPONENT_BIAS,
                coefficient: 0,
            }
        } else {
            let coefficient = bits & COEFFICIENT_MASK;
            Decimal128Kind::Finite {
                exponent: ((bits >> 113) & 0x3FFF) as i64 - EXPONENT_BIAS,
                coefficient: if coefficient > MAX_COEFFICIENT {
                    0
                } else {
                    coefficient
                },
            }
        };
        ParsedDecimal128 { sign, kind }
    }

    fn pack(&self) -> Decimal128 {
        let mut bits = match self.kind {
            Decimal128Kind::NaN { signalling: false } => NAN_BITS,
            Decimal128Kind::NaN { signalling: true } => SNAN_BITS,
            Decimal128Kind::Infinity => INFINITY_BITS,
            Decimal128Kind::Finite {
                exponent,
                coefficient,
            } => (((exponent + EXPONENT_BIAS) as u128) << 113) | coefficient,
        };
        if self.sign {
            bits |= SIGN_BIT;
        }
        Decimal128::from_bytes(bits.to_le_bytes())
    }

    fn from_f64(value: f64) -> Option<Self> {
        if value.is_nan() {
            return Some(Self {
                sign: false,
                kind: Decimal128Kind::NaN { signalling: false },
            });
        }
        if value.is_infinite() {
            return Some(Self {
                sign: value.is_sign_negative(),
                kind: Decimal128Kind::Infinity,
            });
        }
        format!("{:e}", value).parse().ok()
    }

    /// Compares the mathematical values of two finite decimals, ignoring representation.
    fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        let (
            Decimal128Kind::Finite {
                exponent: e1,
                coefficient: c1,
            },
            Decimal128Kind::Finite {
                exponent: e2,
                coefficient: c2,
            },
        ) = (self.kind, other.kind)
        else {
            return None;
        };
        if c1 == 0 && c2 == 0 {
            return Some(Ordering::Equal);
        }
        if self.sign != other.sign || c1 == 0 || c2 == 0 {
            return None;
        }
        let (c1, e1) = normalize(c1, e1);
        let (c2, e2) = normalize(c2, e2);
        Some(if (c1, e1) == (c2, e2) {
            Ordering::Equal
        } else {
            c1.cmp(&c2).then(e1.cmp(&e2))
        })
    }
}

fn normalize(mut coefficient: u128, mut exponent: i64) -> (u128, i64) {
    while coefficient != 0 && coefficient % 10 == 0 {
        coefficient /= 10;
        exponent += 1;
    }
    (coefficient, exponent)
}

impl fmt::Display for ParsedDecimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // MongoDB never prints a sign for NaN
        if self.sign && !matches!(self.kind, Decimal128Kind::NaN { .. }) {
            write!(f, "-")?;
        }
        match self.kind {
            Decimal128Kind::NaN { .. } => write!(f, "NaN")?,
            Decimal128Kind::Infinity => write!(f, "Infinity")?,
            Decimal128Kind::Finite {
                exponent,
                coefficient,
            } => {
                let digits = coefficient.to_string();
                let adjusted = exponent + digits.len() as i64 - 1;
                if exponent <= 0 && adjusted >= -6 {
                    if exponent == 0 {
                        write!(f, "{}", digits)?;
                    } else {
                        let point = digits.len() as i64 + exponent;
                        if point > 0 {
                            let (int, frac) = digits.split_at(point as usize);
                            write!(f, "{}.{}", int, frac)?;
                        } else {
                            write!(f, "0.{}{}", "0".repeat((-point) as usize), digits)?;
                        }
                    }
                } else {
                    let (first, rest) = digits.split_at(1);
                    write!(f, "{}", first)?;
                    if !rest.is_empty() {
                        write!(f, ".{}", rest)?;
                    }
                    if adjusted >= 0 {
                        write!(f, "E+{}", adjusted)?;
                    } else {
                        write!(f, "E{}", adjusted)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl FromStr for ParsedDecimal128 {
    type Err = Decimal128ErrorKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (sign, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if s.is_empty() || !s.is_ascii() {
            return Err(Decimal128ErrorKind::Unparseable);
        }

        let lowered = s.to_ascii_lowercase();
        let kind = match lowered.as_str() {
            "nan" => Decimal128Kind::NaN { signalling: false },
            "snan" => Decimal128Kind::NaN { signalling: true },
            "inf" | "infinity" => Decimal128Kind::Infinity,
            finite => parse_finite(finite)?,
        };
        Ok(Self { sign, kind })
    }
}

fn parse_finite(s: &str) -> std::result::Result<Decimal128Kind, Decimal128ErrorKind> {
    let (mantissa, mut exponent) = match s.split_once('e') {
        None => (s, 0i64),
        Some((_, "")) => return Err(Decimal128ErrorKind::EmptyExponent),
        Some((mantissa, exp)) => {
            let exponent = exp
                .parse::<i64>()
                .map_err(|e| Decimal128ErrorKind::InvalidExponent {
                    message: e.to_string(),
                })?;
            (mantissa, exponent)
        }
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Decimal128ErrorKind::InvalidCoefficient {
            message: "no digits".to_string(),
        });
    }
    if let Some(c) = int_part
        .chars()
        .chain(frac_part.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(Decimal128ErrorKind::InvalidCoefficient {
            message: format!("unexpected character {:?}", c),
        });
    }

    exponent = exponent
        .checked_sub(frac_part.len() as i64)
        .ok_or(Decimal128ErrorKind::Underflow)?;

    let mut digits: String = int_part.chars().chain(frac_part.chars()).collect();
    let significant = digits.trim_start_matches('0').len();
    digits.drain(..digits.len() - significant);
    if digits.is_empty() {
        digits.push('0');
    }
    let is_zero = digits == "0";

    // Too many digits: only trailing zeros may be dropped.
    while digits.len() > MAX_DIGITS {
        if !digits.ends_with('0') {
            return Err(Decimal128ErrorKind::InexactRounding);
        }
        digits.pop();
        exponent = exponent
            .checked_add(1)
            .ok_or(Decimal128ErrorKind::Overflow)?;
    }

    if exponent > EXPONENT_MAX {
        if is_zero {
            exponent = EXPONENT_MAX;
        } else {
            // clamp by padding the coefficient with zeros
            while exponent > EXPONENT_MAX {
                if digits.len() >= MAX_DIGITS {
                    return Err(Decimal128ErrorKind::Overflow);
                }
                digits.push('0');
                exponent -= 1;
            }
        }
    }

    if exponent < EXPONENT_MIN {
        if is_zero {
            exponent = EXPONENT_MIN;
        } else {
            while exponent < EXPONENT_MIN {
                if !digits.ends_with('0') {
                    return Err(Decimal128ErrorKind::Underflow);
                }
                digits.pop();
                exponent += 1;
            }
        }
    }

    let coefficient =
        digits
            .parse::<u128>()
            .map_err(|e| Decimal128ErrorKind::InvalidCoefficient {
                message: e.to_string(),
            })?;

    Ok(Decimal128Kind::Finite {
        exponent,
        coefficient,
    })
}
