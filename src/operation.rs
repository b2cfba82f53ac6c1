//! Operation descriptors and the registry of canonical operations.
//!
//! Every [`Task`](crate::Task) carries an [`Operation`]. A small, closed set of
//! [`Canonical`] operations is bound to an infix display symbol, anything else
//! is a custom callable without a symbol and gets printed using the function
//! call convention.

use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub};

use crate::error::OperationError;

/// The number of operands an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` operands.
    Exact(usize),
    /// At least `n` operands.
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Operations with a registered display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canonical {
    Add,
    Mul,
    Sub,
    Div,
}

impl Canonical {
    /// The infix symbol used when printing a task bound to this operation.
    pub const fn symbol(self) -> &'static str {
        match self {
            Canonical::Add => "+",
            Canonical::Mul => "*",
            Canonical::Sub => "-",
            Canonical::Div => "/",
        }
    }

    pub const fn arity(self) -> Arity {
        match self {
            Canonical::Add | Canonical::Mul => Arity::AtLeast(1),
            Canonical::Sub | Canonical::Div => Arity::Exact(2),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Canonical::Add => "add",
            Canonical::Mul => "mul",
            Canonical::Sub => "sub",
            Canonical::Div => "div",
        }
    }
}

/// Arithmetic behind the canonical operations.
///
/// Every method returns `None` when the result cannot be represented, which
/// evaluation reports as [`GraphError::Operation`](crate::GraphError::Operation)
/// instead of panicking. Integers are checked for overflow and division by
/// zero, floats follow IEEE 754 and always produce a value.
pub trait Arithmetic: Clone {
    fn checked_add(&self, rhs: &Self) -> Option<Self>;
    fn checked_sub(&self, rhs: &Self) -> Option<Self>;
    fn checked_mul(&self, rhs: &Self) -> Option<Self>;
    fn checked_div(&self, rhs: &Self) -> Option<Self>;
}

macro_rules! impl_arithmetic_int {
    ($($T:ty),*) => {
        $(
            impl Arithmetic for $T {
                fn checked_add(&self, rhs: &Self) -> Option<Self> {
                    CheckedAdd::checked_add(self, rhs)
                }

                fn checked_sub(&self, rhs: &Self) -> Option<Self> {
                    CheckedSub::checked_sub(self, rhs)
                }

                fn checked_mul(&self, rhs: &Self) -> Option<Self> {
                    CheckedMul::checked_mul(self, rhs)
                }

                fn checked_div(&self, rhs: &Self) -> Option<Self> {
                    CheckedDiv::checked_div(self, rhs)
                }
            }
        )*
    };
}

macro_rules! impl_arithmetic_float {
    ($($T:ty),*) => {
        $(
            impl Arithmetic for $T {
                fn checked_add(&self, rhs: &Self) -> Option<Self> {
                    Some(self + rhs)
                }

                fn checked_sub(&self, rhs: &Self) -> Option<Self> {
                    Some(self - rhs)
                }

                fn checked_mul(&self, rhs: &Self) -> Option<Self> {
                    Some(self * rhs)
                }

                fn checked_div(&self, rhs: &Self) -> Option<Self> {
                    Some(self / rhs)
                }
            }
        )*
    };
}

impl_arithmetic_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_arithmetic_float!(f32, f64);

type Callable<T> = Rc<dyn Fn(&[T]) -> Result<T, OperationError>>;

/// An operation descriptor: the callable, its arity and, for canonical
/// operations, the display symbol.
///
/// Descriptors are cheap to clone, the callable itself is shared.
pub struct Operation<T> {
    canonical: Option<Canonical>,
    arity: Arity,
    callable: Callable<T>,
}

impl<T> Operation<T>
where
    T: 'static,
{
    /// Wraps an arbitrary callable. Custom operations have no symbol.
    ///
    /// ```rust
    /// use kumiki::{Arity, Operation};
    ///
    /// let max = Operation::<f64>::custom(Arity::Exact(2), |args| Ok(args[0].max(args[1])));
    /// assert_eq!(max.apply(&[1.0, 3.0]).unwrap(), 3.0);
    /// assert!(max.symbol().is_none());
    /// ```
    pub fn custom<F>(arity: Arity, callable: F) -> Self
    where
        F: Fn(&[T]) -> Result<T, OperationError> + 'static,
    {
        Self {
            canonical: None,
            arity,
            callable: Rc::new(callable),
        }
    }

    pub fn add() -> Self
    where
        T: Arithmetic,
    {
        Self::fold(Canonical::Add, T::checked_add)
    }

    pub fn mul() -> Self
    where
        T: Arithmetic,
    {
        Self::fold(Canonical::Mul, T::checked_mul)
    }

    pub fn sub() -> Self
    where
        T: Arithmetic,
    {
        Self::binary(Canonical::Sub, T::checked_sub)
    }

    pub fn div() -> Self
    where
        T: Arithmetic,
    {
        Self::binary(Canonical::Div, T::checked_div)
    }

    fn fold(canonical: Canonical, f: fn(&T, &T) -> Option<T>) -> Self
    where
        T: Clone,
    {
        Self {
            canonical: Some(canonical),
            arity: canonical.arity(),
            callable: Rc::new(move |args: &[T]| {
                let (first, rest) = args.split_first().ok_or_else(|| {
                    anyhow::anyhow!("'{}' needs at least one operand", canonical.name())
                })?;

                rest.iter().try_fold(first.clone(), |acc, next| {
                    f(&acc, next).ok_or_else(|| anyhow::anyhow!("'{}' overflowed", canonical.name()))
                })
            }),
        }
    }

    fn binary(canonical: Canonical, f: fn(&T, &T) -> Option<T>) -> Self {
        Self {
            canonical: Some(canonical),
            arity: canonical.arity(),
            callable: Rc::new(move |args: &[T]| match args {
                [lhs, rhs] => f(lhs, rhs).ok_or_else(|| match canonical {
                    Canonical::Div => anyhow::anyhow!("'div' divided by zero or overflowed"),
                    _ => anyhow::anyhow!("'{}' overflowed", canonical.name()),
                }),
                _ => anyhow::bail!("'{}' needs exactly two operands", canonical.name()),
            }),
        }
    }
}

impl<T> Operation<T> {
    pub fn canonical(&self) -> Option<Canonical> {
        self.canonical
    }

    /// The registered display symbol, `None` for custom operations.
    pub fn symbol(&self) -> Option<&'static str> {
        self.canonical.map(Canonical::symbol)
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// A short label used in error messages.
    pub fn label(&self) -> &'static str {
        self.canonical.map_or("custom", Canonical::name)
    }

    /// Applies the operation to operand values given in construction order.
    pub fn apply(&self, args: &[T]) -> Result<T, OperationError> {
        (self.callable)(args)
    }
}

impl<T> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            canonical: self.canonical,
            arity: self.arity,
            callable: self.callable.clone(),
        }
    }
}

impl<T> Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("canonical", &self.canonical)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_symbols() {
        assert_eq!(Operation::<f64>::add().symbol(), Some("+"));
        assert_eq!(Operation::<f64>::mul().symbol(), Some("*"));
        assert_eq!(Operation::<f64>::sub().symbol(), Some("-"));
        assert_eq!(Operation::<f64>::div().symbol(), Some("/"));
        assert_eq!(
            Operation::<f64>::custom(Arity::Exact(1), |args| Ok(args[0])).symbol(),
            None
        );
    }

    #[test]
    fn test_variadic_fold() {
        let add = Operation::<i64>::add();
        assert_eq!(add.apply(&[1, 2, 3]).unwrap(), 6);
        assert!(add.apply(&[]).is_err());

        let mul = Operation::<i64>::mul();
        assert_eq!(mul.apply(&[2, 3, 4]).unwrap(), 24);
    }

    #[test]
    fn test_binary_order() {
        assert_eq!(Operation::<i64>::sub().apply(&[10, 4]).unwrap(), 6);
        assert_eq!(Operation::<i64>::div().apply(&[12, 4]).unwrap(), 3);
        assert!(Operation::<i64>::sub().apply(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_integer_failures_are_errors() {
        let err = Operation::<i32>::div().apply(&[1, 0]).unwrap_err();
        assert_eq!(err.to_string(), "'div' divided by zero or overflowed");
        assert!(Operation::<i32>::div().apply(&[i32::MIN, -1]).is_err());

        let err = Operation::<i32>::add().apply(&[1, i32::MAX]).unwrap_err();
        assert_eq!(err.to_string(), "'add' overflowed");
        assert!(Operation::<u8>::sub().apply(&[0, 1]).is_err());
        assert!(Operation::<u8>::mul().apply(&[16, 4, 4]).is_err());
    }

    #[test]
    fn test_float_division_follows_ieee() {
        let div = Operation::<f64>::div();
        assert_eq!(div.apply(&[1.0, 0.0]).unwrap(), f64::INFINITY);
        assert!(div.apply(&[0.0, 0.0]).unwrap().is_nan());
    }

    #[test]
    fn test_arity() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    }
}
