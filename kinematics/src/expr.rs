//! A minimal symbolic expression tree.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops;

use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Sym(String),
    Num(f64),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, i32),
    Sqrt(Box<Expr>),
}

impl Expr {
    pub fn sym(name: &str) -> Self {
        Expr::Sym(name.to_owned())
    }

    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    pub fn pow(self, n: i32) -> Self {
        Expr::Pow(Box::new(self), n)
    }

    pub fn sqrt(self) -> Self {
        Expr::Sqrt(Box::new(self))
    }

    /// Binding strength when printed; higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(..) => 3,
            Expr::Num(v) if *v < 0.0 => 3,
            Expr::Pow(..) => 4,
            Expr::Sym(..) | Expr::Num(..) | Expr::Sqrt(..) => 5,
        }
    }

    pub fn eval(&self, bindings: &Bindings) -> Result<f64> {
        Ok(match self {
            Expr::Sym(name) => bindings
                .get(name)
                .ok_or_else(|| Error::UnboundSymbol(name.clone()))?,
            Expr::Num(v) => *v,
            Expr::Neg(a) => -a.eval(bindings)?,
            Expr::Add(a, b) => a.eval(bindings)? + b.eval(bindings)?,
            Expr::Sub(a, b) => a.eval(bindings)? - b.eval(bindings)?,
            Expr::Mul(a, b) => a.eval(bindings)? * b.eval(bindings)?,
            Expr::Div(a, b) => {
                let d = b.eval(bindings)?;
                if d == 0.0 {
                    return Err(Error::NotReal(self.to_string()));
                }
                a.eval(bindings)? / d
            }
            Expr::Pow(a, n) => a.eval(bindings)?.powi(*n),
            Expr::Sqrt(a) => {
                let x = a.eval(bindings)?;
                if x < 0.0 {
                    return Err(Error::NotReal(self.to_string()));
                }
                x.sqrt()
            }
        })
    }

    /// All symbol names appearing in the expression.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Sym(name) => {
                out.insert(name.clone());
            }
            Expr::Num(_) => (),
            Expr::Neg(a) | Expr::Pow(a, _) | Expr::Sqrt(a) => a.collect_symbols(out),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, min: u8) -> fmt::Result {
    if e.precedence() < min {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

/// A negated right operand of `+` or `-` is always wrapped, so `a - (-b)`
/// never prints as `a - -b`.
fn addend_min(e: &Expr, min: u8) -> u8 {
    if e.precedence() == 3 {
        4
    } else {
        min
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Sym(name) => f.write_str(name),
            Expr::Num(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Expr::Num(v) => write!(f, "{v}"),
            Expr::Neg(a) => {
                f.write_str("-")?;
                write_operand(f, a, 4)
            }
            Expr::Add(a, b) => {
                write_operand(f, a, 1)?;
                f.write_str(" + ")?;
                write_operand(f, b, addend_min(b, 1))
            }
            Expr::Sub(a, b) => {
                write_operand(f, a, 1)?;
                f.write_str(" - ")?;
                write_operand(f, b, addend_min(b, 2))
            }
            Expr::Mul(a, b) => {
                write_operand(f, a, 2)?;
                f.write_str("*")?;
                write_operand(f, b, 4)
            }
            Expr::Div(a, b) => {
                write_operand(f, a, 2)?;
                f.write_str("/")?;
                write_operand(f, b, 4)
            }
            Expr::Pow(a, n) => {
                write_operand(f, a, 5)?;
                if *n < 0 {
                    write!(f, "^({n})")
                } else {
                    write!(f, "^{n}")
                }
            }
            Expr::Sqrt(a) => write!(f, "sqrt({a})"),
        }
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Num(v)
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::sym(name)
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl ops::$trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs))
            }
        }

        impl ops::$trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Box::new(Expr::Num(self)), Box::new(rhs))
            }
        }

        impl ops::$trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                Expr::$variant(Box::new(self), Box::new(Expr::Num(rhs)))
            }
        }
    };
}

binary_op!(Add, add, Add);
binary_op!(Sub, sub, Sub);
binary_op!(Mul, mul, Mul);
binary_op!(Div, div, Div);

impl ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

/// Numeric values for named symbols.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings(BTreeMap<String, f64>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }
}

/// `lhs = rhs`
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// `lhs - rhs`, which is zero when the equation holds.
    pub fn residual(&self, bindings: &Bindings) -> Result<f64> {
        Ok(self.lhs.eval(bindings)? - self.rhs.eval(bindings)?)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
