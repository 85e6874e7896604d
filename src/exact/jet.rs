//! Second-order forward-mode differentiation in one variable.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A value `f(x)` together with `f'(x)` and `f''(x)`.
///
/// Arithmetic applies the product and chain rules, so evaluating an
/// expression on [`Jet::variable`] yields its first two derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet {
    pub v: f64,
    pub d1: f64,
    pub d2: f64,
}

impl Jet {
    pub fn constant(v: f64) -> Self {
        Jet { v, d1: 0.0, d2: 0.0 }
    }

    /// The independent variable itself, `x' = 1`.
    pub fn variable(v: f64) -> Self {
        Jet { v, d1: 1.0, d2: 0.0 }
    }

    /// `g(self)` given `g`, `g'`, `g''` at `self.v`.
    #[inline]
    fn chain(self, g: f64, dg: f64, ddg: f64) -> Self {
        Jet {
            v: g,
            d1: dg * self.d1,
            d2: ddg * self.d1 * self.d1 + dg * self.d2,
        }
    }

    pub fn exp(self) -> Self {
        let e = self.v.exp();
        self.chain(e, e, e)
    }

    pub fn ln(self) -> Self {
        let r = self.v.recip();
        self.chain(self.v.ln(), r, -r * r)
    }

    /// `ln(1 + self)`
    pub fn ln_1p(self) -> Self {
        let r = (1.0 + self.v).recip();
        self.chain(self.v.ln_1p(), r, -r * r)
    }

    pub fn sqrt(self) -> Self {
        let s = self.v.sqrt();
        self.chain(s, 0.5 / s, -0.25 / (s * self.v))
    }

    pub fn sinh(self) -> Self {
        let (s, c) = (self.v.sinh(), self.v.cosh());
        self.chain(s, c, s)
    }

    pub fn cosh(self) -> Self {
        let (s, c) = (self.v.sinh(), self.v.cosh());
        self.chain(c, s, c)
    }

    pub fn recip(self) -> Self {
        let r = self.v.recip();
        self.chain(r, -r * r, 2.0 * r * r * r)
    }

    /// `|self|`, with the derivative of the branch the value is on.
    pub fn abs(self) -> Self {
        if self.v < 0.0 {
            -self
        } else {
            self
        }
    }
}

impl From<f64> for Jet {
    fn from(v: f64) -> Self {
        Jet::constant(v)
    }
}

impl Neg for Jet {
    type Output = Jet;
    fn neg(self) -> Jet {
        Jet {
            v: -self.v,
            d1: -self.d1,
            d2: -self.d2,
        }
    }
}

impl Add for Jet {
    type Output = Jet;
    fn add(self, rhs: Jet) -> Jet {
        Jet {
            v: self.v + rhs.v,
            d1: self.d1 + rhs.d1,
            d2: self.d2 + rhs.d2,
        }
    }
}

impl Sub for Jet {
    type Output = Jet;
    fn sub(self, rhs: Jet) -> Jet {
        self + (-rhs)
    }
}

impl Mul for Jet {
    type Output = Jet;
    fn mul(self, rhs: Jet) -> Jet {
        Jet {
            v: self.v * rhs.v,
            d1: self.d1 * rhs.v + self.v * rhs.d1,
            d2: self.d2 * rhs.v + 2.0 * self.d1 * rhs.d1 + self.v * rhs.d2,
        }
    }
}

impl Div for Jet {
    type Output = Jet;
    fn div(self, rhs: Jet) -> Jet {
        self * rhs.recip()
    }
}

impl AddAssign for Jet {
    fn add_assign(&mut self, rhs: Jet) {
        *self = *self + rhs;
    }
}

impl Add<f64> for Jet {
    type Output = Jet;
    fn add(self, rhs: f64) -> Jet {
        Jet {
            v: self.v + rhs,
            ..self
        }
    }
}

impl Sub<f64> for Jet {
    type Output = Jet;
    fn sub(self, rhs: f64) -> Jet {
        self + (-rhs)
    }
}

impl Mul<f64> for Jet {
    type Output = Jet;
    fn mul(self, rhs: f64) -> Jet {
        Jet {
            v: self.v * rhs,
            d1: self.d1 * rhs,
            d2: self.d2 * rhs,
        }
    }
}

impl Div<f64> for Jet {
    type Output = Jet;
    fn div(self, rhs: f64) -> Jet {
        self * rhs.recip()
    }
}

impl Add<Jet> for f64 {
    type Output = Jet;
    fn add(self, rhs: Jet) -> Jet {
        rhs + self
    }
}

impl Sub<Jet> for f64 {
    type Output = Jet;
    fn sub(self, rhs: Jet) -> Jet {
        -rhs + self
    }
}

impl Mul<Jet> for f64 {
    type Output = Jet;
    fn mul(self, rhs: Jet) -> Jet {
        rhs * self
    }
}

impl Div<Jet> for f64 {
    type Output = Jet;
    fn div(self, rhs: Jet) -> Jet {
        rhs.recip() * self
    }
}
