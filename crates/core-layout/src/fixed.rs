//! 26.6 fixed-point pixel scalar.
//!
//! Horizontal positions and glyph advances are carried with 1/64 px precision
//! so that prefix sums over long lines stay exact. Vertical positions are
//! integral pixels derived with `ceil`.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    const FRAC_BITS: u32 = 6;
    const ONE: i32 = 1 << Self::FRAC_BITS;

    pub const fn from_int(v: i32) -> Self {
        Fixed(v << Self::FRAC_BITS)
    }

    pub const fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    pub const fn to_bits(self) -> i32 {
        self.0
    }

    pub fn from_f32(v: f32) -> Self {
        Fixed((v * Self::ONE as f32).round() as i32)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE as f32
    }

    /// Largest integer not greater than self.
    pub const fn floor(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Smallest integer not less than self.
    pub const fn ceil(self) -> i32 {
        (self.0 + Self::ONE - 1) >> Self::FRAC_BITS
    }

    /// Nearest integer, halves rounding up.
    pub const fn round(self) -> i32 {
        (self.0 + Self::ONE / 2) >> Self::FRAC_BITS
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_f32())
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl Mul<i32> for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: i32) -> Fixed {
        Fixed(self.0 * rhs)
    }
}

impl Div<i32> for Fixed {
    type Output = Fixed;
    fn div(self, rhs: i32) -> Fixed {
        Fixed(self.0 / rhs)
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, |acc, v| acc + v)
    }
}
