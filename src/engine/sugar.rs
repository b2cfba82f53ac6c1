//! Arithmetic operators between graph nodes.
//!
//! Every operator builds a new binary [`Task`] bound to the matching canonical
//! operation. The right-hand side can be any node or a raw number, which gets
//! promoted to a fresh anonymous [`Variable`](crate::Variable).

use crate::engine::{Step, Task, Variable};
use crate::operation::{Arithmetic, Operation};

macro_rules! impl_sugar {
    ($Trait:ident, $method:ident, $op:ident, [$($Lhs:ty),*]) => {
        $(
            impl<'a, T, R> std::ops::$Trait<R> for $Lhs
            where
                T: Arithmetic + 'static,
                R: Into<Step<T>>,
            {
                type Output = Task<T>;

                fn $method(self, rhs: R) -> Task<T> {
                    Task::from_parts(Operation::$op(), vec![Step::from(self), rhs.into()])
                }
            }
        )*
    };
}

macro_rules! impl_sugar_all {
    ($Trait:ident, $method:ident, $op:ident) => {
        impl_sugar!(
            $Trait,
            $method,
            $op,
            [
                Variable<T>,
                &'a Variable<T>,
                Task<T>,
                &'a Task<T>,
                Step<T>,
                &'a Step<T>
            ]
        );
    };
}

impl_sugar_all!(Add, add, add);
impl_sugar_all!(Mul, mul, mul);
impl_sugar_all!(Sub, sub, sub);
impl_sugar_all!(Div, div, div);
