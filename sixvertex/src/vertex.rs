//! The six vertex labels of the six-vertex model.

use crate::error::{Error, Result};

/// One of the six admissible vertex configurations.
///
/// Encoded `0..=5` to match the digit alphabet used by the input/snapshot format:
/// `a1=0`, `a2=1`, `b1=2`, `b2=3`, `c1=4`, `c2=5`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum VertexType {
    /// Straight-through A variant, digit `0`.
    A1 = 0,
    /// Straight-through A variant, digit `1`.
    A2 = 1,
    /// Straight-through B variant, digit `2`.
    B1 = 2,
    /// Straight-through B variant, digit `3`.
    B2 = 3,
    /// Corner C variant, digit `4`.
    C1 = 4,
    /// Corner C variant, digit `5`.
    C2 = 5,
}

impl VertexType {
    /// All six variants, in digit order.
    pub const ALL: [Self; 6] = [
        Self::A1,
        Self::A2,
        Self::B1,
        Self::B2,
        Self::C1,
        Self::C2,
    ];

    /// Parses a single ASCII digit `'0'..='5'` into a vertex type.
    pub fn from_digit(byte: u8) -> Result<Self> {
        match byte {
            b'0' => Ok(Self::A1),
            b'1' => Ok(Self::A2),
            b'2' => Ok(Self::B1),
            b'3' => Ok(Self::B2),
            b'4' => Ok(Self::C1),
            b'5' => Ok(Self::C2),
            _ => Err(Error::InvalidVertexByte(byte)),
        }
    }

    /// Renders this vertex type back to the ASCII digit the parser accepts, round-tripping
    /// through [`Self::from_digit`].
    #[must_use]
    pub const fn to_digit(self) -> u8 {
        b'0' + self as u8
    }

    /// Index into a six-element array indexed by vertex type (weights, counts, ...).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether a cell of this type contributes `+1` to the running row-height count, i.e.
    /// whether `self` is one of `{a1, b1, c2}`.
    #[must_use]
    pub const fn contributes_height(self) -> bool {
        matches!(self, Self::A1 | Self::B1 | Self::C2)
    }

    /// Whether this is one of the two corner (`c1`/`c2`) variants that carry the "particle"
    /// contribution used by the c-density statistic.
    #[must_use]
    pub const fn is_c(self) -> bool {
        matches!(self, Self::C1 | Self::C2)
    }
}
