//! Log-domain signed real numbers
//!
//! An [`ExpNumber`] stores a real value as `sign · exp(log)`. Partition
//! functions of an `N`-site lattice grow like `2^N · exp(βJN)` and leave the
//! range of `f64` after a few hundred sites; in the log domain they stay
//! representable and can still be added and subtracted without ever being
//! exponentiated.
//!
//! Products and quotients are exact updates of the stored logarithm. Sums use
//!
//! ```text
//! ln(a + b) = max(ln a, ln b) + ln(1 + exp(-|ln a - ln b|))
//! ln(a - b) = ln a + ln(1 - exp(ln b - ln a))          (a > b)
//! ```
//!
//! whose exponent arguments are never positive, so nothing overflows.

use crate::error::{IsingError, Result};
use num_traits::{Float, NumCast};
use std::cmp::Ordering;
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};


/// Relative threshold below which a product or quotient is snapped to ±1.
///
/// After `a * b` (or `a / b`) the new log-magnitude is compared with the
/// log-magnitude of `b`; if their ratio is smaller than this value the result
/// is replaced by exactly `±1`. Chains such as `Z / Z` then come out exact.
pub const ZERO_SNAP_TOLERANCE: f64 = 1.0e-10;

/// Sign tag of an [`ExpNumber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    fn flip(self) -> Self {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }

    fn times(self, other: Sign) -> Self {
        match (self, other) {
            (Sign::Zero, _) | (_, Sign::Zero) => Sign::Zero,
            (a, b) if a == b => Sign::Positive,
            _ => Sign::Negative,
        }
    }
}

/// A signed real number stored as its sign and the natural log of its magnitude.
#[derive(Debug, Clone, Copy)]
pub struct ExpNumber<T> {
    log: T,
    sign: Sign,
}

pub type ExpF32 = ExpNumber<f32>;
pub type ExpF64 = ExpNumber<f64>;

fn snap_tolerance<T: Float>() -> T {
    <T as NumCast>::from(ZERO_SNAP_TOLERANCE).unwrap_or_else(T::epsilon)
}

impl<T: Float> ExpNumber<T> {
    pub fn zero() -> Self {
        Self {
            log: T::zero(),
            sign: Sign::Zero,
        }
    }

    pub fn one() -> Self {
        Self::from_log(T::zero())
    }

    /// Converts a plain real, computing sign and logarithm eagerly.
    ///
    /// A NaN input becomes a positive number with a NaN logarithm so that it
    /// keeps propagating instead of silently turning into zero.
    pub fn new(value: T) -> Self {
        if value > T::zero() {
            Self {
                log: value.ln(),
                sign: Sign::Positive,
            }
        } else if value < T::zero() {
            Self {
                log: (-value).ln(),
                sign: Sign::Negative,
            }
        } else if value == T::zero() {
            Self::zero()
        } else {
            Self {
                log: value,
                sign: Sign::Positive,
            }
        }
    }

    /// Positive number `exp(log)`, for when the logarithm is already known.
    pub fn from_log(log: T) -> Self {
        Self {
            log,
            sign: Sign::Positive,
        }
    }

    /// Overwrites `self` with the positive number `exp(log)`.
    pub fn set_log(&mut self, log: T) {
        self.log = log;
        self.sign = Sign::Positive;
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn is_zero(&self) -> bool {
        self.sign == Sign::Zero
    }

    pub fn is_positive(&self) -> bool {
        self.sign == Sign::Positive
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative
    }

    /// `ln |self|`, or `-inf` for zero.
    pub fn log_magnitude(&self) -> T {
        match self.sign {
            Sign::Zero => T::neg_infinity(),
            _ => self.log,
        }
    }

    /// Natural logarithm; only defined for positive numbers.
    pub fn log(&self) -> Result<T> {
        match self.sign {
            Sign::Positive => Ok(self.log),
            _ => Err(IsingError::Domain("ExpNumber::log")),
        }
    }

    /// Materialises the plain real value. Overflows to `±inf` or underflows
    /// to zero when the magnitude is outside the range of `T`.
    pub fn value(&self) -> T {
        match self.sign {
            Sign::Positive => self.log.exp(),
            Sign::Negative => -self.log.exp(),
            Sign::Zero => T::zero(),
        }
    }

    pub fn abs(self) -> Self {
        match self.sign {
            Sign::Negative => Self {
                log: self.log,
                sign: Sign::Positive,
            },
            _ => self,
        }
    }

    /// `sign · |self|^p`: scales the log-magnitude by `p` and carries the sign
    /// over unchanged.
    ///
    /// For a negative base this is not the real power: `(-2)^2` comes out as
    /// `-4`. Use [`abs`](Self::abs) first when the magnitude is wanted.
    pub fn pow(self, p: T) -> Self {
        Self {
            log: self.log * p,
            sign: self.sign,
        }
    }

    pub fn sqrt(self) -> Result<Self> {
        if self.sign == Sign::Negative {
            return Err(IsingError::Domain("ExpNumber::sqrt"));
        }
        let half = (T::one() + T::one()).recip();
        Ok(Self {
            log: self.log * half,
            sign: self.sign,
        })
    }

    /// `exp(self)` as a positive log-domain number.
    pub fn exp(self) -> Self {
        Self::from_log(self.value())
    }

    /// Multiplication with an explicit zero-snap tolerance.
    pub fn mul_with_tolerance(self, rhs: Self, tolerance: T) -> Self {
        let sign = self.sign.times(rhs.sign);
        if sign == Sign::Zero {
            return Self::zero();
        }
        let log = self.log + rhs.log;
        Self {
            log: snap(log, rhs.log, tolerance),
            sign,
        }
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        self.checked_div_with_tolerance(rhs, snap_tolerance())
    }

    /// Division with an explicit zero-snap tolerance. Fails on a zero divisor.
    pub fn checked_div_with_tolerance(self, rhs: Self, tolerance: T) -> Result<Self> {
        if rhs.sign == Sign::Zero {
            return Err(IsingError::Domain("ExpNumber::div"));
        }
        if self.sign == Sign::Zero {
            return Ok(self);
        }
        let log = self.log - rhs.log;
        Ok(Self {
            log: snap(log, rhs.log, tolerance),
            sign: self.sign.times(rhs.sign),
        })
    }

    /// Converts to another precision. `None` if the log-magnitude does not fit.
    pub fn cast<U: Float>(self) -> Option<ExpNumber<U>> {
        let log = <U as NumCast>::from(self.log)?;
        Some(ExpNumber {
            log,
            sign: self.sign,
        })
    }

    fn add_impl(self, rhs: Self) -> Self {
        match (self.sign, rhs.sign) {
            (Sign::Zero, _) => rhs,
            (_, Sign::Zero) => self,
            (a, b) if a == b => Self {
                log: log_add(self.log, rhs.log),
                sign: a,
            },
            _ => {
                if self.log > rhs.log {
                    Self {
                        log: log_sub(self.log, rhs.log),
                        sign: self.sign,
                    }
                } else if self.log < rhs.log {
                    Self {
                        log: log_sub(rhs.log, self.log),
                        sign: rhs.sign,
                    }
                } else {
                    Self::zero()
                }
            }
        }
    }
}

fn snap<T: Float>(log: T, reference: T, tolerance: T) -> T {
    // x / 0 is ±inf or NaN and never snaps
    if (log / reference).abs() < tolerance {
        T::zero()
    } else {
        log
    }
}

/// `ln(exp(a) + exp(b))`
fn log_add<T: Float>(a: T, b: T) -> T {
    a.max(b) + (-(a - b).abs()).exp().ln_1p()
}

/// `ln(exp(big) - exp(small))` for `big > small`
fn log_sub<T: Float>(big: T, small: T) -> T {
    big + (-(small - big).exp_m1()).ln()
}

impl<T: Float> Default for ExpNumber<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Float> From<T> for ExpNumber<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl From<ExpNumber<f32>> for ExpNumber<f64> {
    fn from(x: ExpNumber<f32>) -> Self {
        ExpNumber {
            log: <f64 as From<f32>>::from(x.log),
            sign: x.sign,
        }
    }
}

impl<T: Float> PartialEq for ExpNumber<T> {
    fn eq(&self, other: &Self) -> bool {
        self.sign == other.sign && (self.sign == Sign::Zero || self.log == other.log)
    }
}

impl<T: Float> PartialOrd for ExpNumber<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.sign.cmp(&other.sign) {
            Ordering::Equal => match self.sign {
                Sign::Zero => Some(Ordering::Equal),
                Sign::Positive => self.log.partial_cmp(&other.log),
                Sign::Negative => other.log.partial_cmp(&self.log),
            },
            ord => Some(ord),
        }
    }
}

impl<T: Float> Neg for ExpNumber<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            log: self.log,
            sign: self.sign.flip(),
        }
    }
}

impl<T: Float> Add for ExpNumber<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.add_impl(rhs)
    }
}

impl<T: Float> Sub for ExpNumber<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.add_impl(-rhs)
    }
}

impl<T: Float> Mul for ExpNumber<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.mul_with_tolerance(rhs, snap_tolerance())
    }
}

impl<T: Float> Div for ExpNumber<T> {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `rhs` is zero; use [`ExpNumber::checked_div`] to get an error instead.
    fn div(self, rhs: Self) -> Self {
        match self.checked_div(rhs) {
            Ok(q) => q,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Float> AddAssign for ExpNumber<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Float> SubAssign for ExpNumber<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Float> MulAssign for ExpNumber<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Float> DivAssign for ExpNumber<T> {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<T: Float> Sum for ExpNumber<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<'a, T: Float> Sum<&'a ExpNumber<T>> for ExpNumber<T> {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + *x)
    }
}

impl<T: Float> Product for ExpNumber<T> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

impl<T: Float + fmt::Display> fmt::Display for ExpNumber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            Sign::Positive => write!(f, "exp({})", self.log),
            Sign::Negative => write!(f, "-exp({})", self.log),
            Sign::Zero => write!(f, "0"),
        }
    }
}

// Mixed arithmetic and comparison with plain reals, in both operand orders.
macro_rules! impl_scalar_ops {
    ($($t:ty),*) => {$(
        impl From<ExpNumber<$t>> for $t {
            fn from(x: ExpNumber<$t>) -> $t {
                x.value()
            }
        }

        impl PartialEq<$t> for ExpNumber<$t> {
            fn eq(&self, other: &$t) -> bool {
                *self == ExpNumber::new(*other)
            }
        }

        impl PartialEq<ExpNumber<$t>> for $t {
            fn eq(&self, other: &ExpNumber<$t>) -> bool {
                ExpNumber::new(*self) == *other
            }
        }

        impl PartialOrd<$t> for ExpNumber<$t> {
            fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                self.partial_cmp(&ExpNumber::new(*other))
            }
        }

        impl PartialOrd<ExpNumber<$t>> for $t {
            fn partial_cmp(&self, other: &ExpNumber<$t>) -> Option<Ordering> {
                ExpNumber::new(*self).partial_cmp(other)
            }
        }

        impl_scalar_ops!(@binop $t, Add, add, AddAssign, add_assign);
        impl_scalar_ops!(@binop $t, Sub, sub, SubAssign, sub_assign);
        impl_scalar_ops!(@binop $t, Mul, mul, MulAssign, mul_assign);
        impl_scalar_ops!(@binop $t, Div, div, DivAssign, div_assign);
    )*};
    (@binop $t:ty, $tr:ident, $m:ident, $tra:ident, $ma:ident) => {
        impl $tr<$t> for ExpNumber<$t> {
            type Output = ExpNumber<$t>;
            fn $m(self, rhs: $t) -> ExpNumber<$t> {
                $tr::$m(self, ExpNumber::new(rhs))
            }
        }

        impl $tr<ExpNumber<$t>> for $t {
            type Output = ExpNumber<$t>;
            fn $m(self, rhs: ExpNumber<$t>) -> ExpNumber<$t> {
                $tr::$m(ExpNumber::new(self), rhs)
            }
        }

        impl $tra<$t> for ExpNumber<$t> {
            fn $ma(&mut self, rhs: $t) {
                $tra::$ma(self, ExpNumber::new(rhs));
            }
        }
    };
}

impl_scalar_ops!(f32, f64);
