//! A single linear constraint.

use crate::rational::Rational;
use crate::vector::{Vector, VectorRead};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// gradient • x <= value
    LessEqual,
    /// gradient • x == value
    Equal,
    /// gradient • x >= value
    GreaterEqual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    gradient: Vector,
    constraint_type: ConstraintType,
    value: Rational,
}

impl LinearConstraint {
    pub fn new(gradient: Vector, constraint_type: ConstraintType, value: Rational) -> Self {
        Self {
            gradient,
            constraint_type,
            value,
        }
    }

    pub fn gradient(&self) -> &Vector {
        &self.gradient
    }

    pub fn constraint_type(&self) -> ConstraintType {
        self.constraint_type
    }

    pub fn value(&self) -> &Rational {
        &self.value
    }
}

impl fmt::Display for LinearConstraint {
    /// Renders like `2a - (1/2)b >= 3`, naming variables a, b, c, ...
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = 0;
        for i in 0..self.gradient.len() {
            let factor = self.gradient.get(i);
            if factor.is_zero() {
                continue;
            }

            if written != 0 {
                f.write_str(if factor.signum() > 0 { " + " } else { " - " })?;
            } else if factor.signum() < 0 {
                write!(f, "-")?;
            }
            written += 1;

            let factor = factor.abs();
            if !factor.is_integer() {
                write!(f, "({factor})")?;
            } else if factor != Rational::one() {
                write!(f, "{factor}")?;
            }
            write!(f, "{}", (b'a' + (i % 26) as u8) as char)?;
        }

        if written == 0 {
            write!(f, "0")?;
        }

        let relation = match self.constraint_type {
            ConstraintType::LessEqual => "<=",
            ConstraintType::Equal => "==",
            ConstraintType::GreaterEqual => ">=",
        };
        write!(f, " {relation} {}", self.value)
    }
}
