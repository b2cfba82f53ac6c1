#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod analysis;
mod engine;
mod error;
pub mod graph;
#[cfg(feature = "logging")]
pub mod logging;
pub mod operation;
mod render;
pub mod traverse;

pub use crate::analysis::{Classify, OperationCount, is_step, is_variable, operation_count};
pub use crate::engine::{Node, Step, Task, Variable, wrap};
pub use crate::error::*;
pub use crate::graph::snapshot;
pub use crate::operation::{Arithmetic, Arity, Canonical, Operation};
pub use crate::render::{DotStyle, Exporter, export_graph, render};
pub use crate::traverse::Visitor;

/// Builds a [`Task`] from an operation and any mix of nodes and raw values.
///
/// Raw values become fresh anonymous variables. Expands to a call to
/// [`Task::new`], so the result is a `Result<Task<T>, GraphError>`.
///
/// ```rust
/// use kumiki::{Operation, Variable, task};
///
/// let a = Variable::new(2.0_f64);
/// let b = Variable::new(3.0);
///
/// let sum = task!(Operation::add(), &a, &b, 10.0).unwrap();
/// sum.eval().unwrap();
/// assert_eq!(sum.value().unwrap(), 15.0);
/// ```
#[macro_export]
macro_rules! task {
    ($operation:expr $(, $operand:expr)* $(,)?) => {{
        let operands: ::std::vec::Vec<$crate::Step<_>> =
            ::std::vec![$($crate::Step::from($operand)),*];
        $crate::Task::new($operation, operands)
    }};
}

/// Names every given node after its binding.
///
/// ```rust
/// use kumiki::{Variable, set_names};
///
/// let left = Variable::new(1_i32);
/// let right = Variable::new(2);
/// let total = &left + &right;
/// set_names!(left, right, total);
///
/// assert_eq!(total.to_string(), "total ( right ( 2 ) + left ( 1 ) )");
/// ```
#[macro_export]
macro_rules! set_names {
    ($($node:ident),+ $(,)?) => {
        $( $node.set_name(::std::stringify!($node)); )+
    };
}
