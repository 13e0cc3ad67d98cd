//! Cell parameter and attribute values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single bit of a [`Property::BitString`], following IEEE 1164 states.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Tri {
    /// Logic low.
    Zero,
    /// Logic high.
    One,
    /// Unknown.
    X,
    /// High-impedance.
    Z,
}

impl Tri {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Tri::Zero),
            '1' => Some(Tri::One),
            'x' | 'X' => Some(Tri::X),
            'z' | 'Z' => Some(Tri::Z),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Tri::Zero => '0',
            Tri::One => '1',
            Tri::X => 'x',
            Tri::Z => 'z',
        }
    }
}

/// A cell parameter or attribute value.
///
/// Mirrors the two forms a technology-mapped or user-set cell property can
/// take: an integer-or-bitstring (a `BitString` of [`Tri`] values, low bit
/// first) or an arbitrary string. Round-tripping through [`Property::to_string`]
/// and [`Property::from_string`] must recover the original form exactly, so a
/// string that does not consist solely of `{0,1,x,z}` characters gets a
/// trailing space appended when parsed back as a `BitString` candidate is
/// rejected and it is kept as `String` instead.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Property {
    /// A bit vector, least-significant bit first.
    BitString(Vec<Tri>),
    /// An arbitrary string value.
    String(String),
}

impl Property {
    /// Creates a `Property` from a plain integer.
    pub fn from_int(value: u64, width: u32) -> Self {
        let mut bits = Vec::with_capacity(width as usize);
        for i in 0..width {
            bits.push(if (value >> i) & 1 == 1 { Tri::One } else { Tri::Zero });
        }
        Property::BitString(bits)
    }

    /// Creates a `Property` from a string value.
    pub fn from_str_value(s: impl Into<String>) -> Self {
        Property::String(s.into())
    }

    /// Renders this property back to its canonical string form.
    pub fn to_string_value(&self) -> String {
        match self {
            Property::BitString(bits) => bits.iter().rev().map(|t| t.to_char()).collect(),
            Property::String(s) => {
                if s.chars().all(|c| Tri::from_char(c).is_some()) && !s.is_empty() {
                    // Would otherwise be ambiguous with a BitString on reparse.
                    format!("{s} ")
                } else {
                    s.clone()
                }
            }
        }
    }

    /// Parses a string back into a `Property`, inverse of [`Property::to_string_value`]
    /// for values produced by this type.
    pub fn from_string(s: &str) -> Self {
        if !s.is_empty() && s.chars().all(|c| Tri::from_char(c).is_some()) {
            let bits: Vec<Tri> = s.chars().rev().map(|c| Tri::from_char(c).unwrap()).collect();
            Property::BitString(bits)
        } else {
            Property::String(s.trim_end_matches(' ').to_string())
        }
    }

    /// Interprets this property as an unsigned integer, if it is a bit string
    /// of zeros and ones.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Property::BitString(bits) => {
                let mut value = 0u64;
                for (i, bit) in bits.iter().enumerate() {
                    match bit {
                        Tri::One => value |= 1 << i,
                        Tri::Zero => {}
                        _ => return None,
                    }
                }
                Some(value)
            }
            Property::String(_) => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

impl FromStr for Property {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Property::from_string(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_roundtrip() {
        let p = Property::from_int(0b1010, 4);
        assert_eq!(p.as_int(), Some(0b1010));
    }

    #[test]
    fn bitstring_display_roundtrip() {
        let p = Property::from_int(5, 4);
        let s = p.to_string_value();
        let back = Property::from_string(&s);
        assert_eq!(p, back);
    }

    #[test]
    fn plain_string_roundtrip() {
        let p = Property::from_str_value("LUT4");
        let s = p.to_string_value();
        assert_eq!(s, "LUT4");
        let back = Property::from_string(&s);
        assert_eq!(back, p);
    }

    #[test]
    fn ambiguous_string_gets_sentinel() {
        let p = Property::from_str_value("01x");
        let s = p.to_string_value();
        assert!(s.ends_with(' '));
        let back = Property::from_string(&s);
        assert_eq!(back, p);
    }

    #[test]
    fn empty_string_not_treated_as_bitstring() {
        let p = Property::from_str_value("");
        let back = Property::from_string(&p.to_string_value());
        assert_eq!(back, p);
    }

    #[test]
    fn unknown_bits_not_an_int() {
        let p = Property::BitString(vec![Tri::X, Tri::Zero]);
        assert_eq!(p.as_int(), None);
    }
}
