//! The node model.
//!
//! A computation graph is built bottom-up out of two kinds of nodes:
//!
//! * [`Variable<T>`]: a leaf holding a live value.
//! * [`Task<T>`]: an [`Operation`](crate::Operation) applied to an ordered,
//!   fixed list of children, with a cache for the last computed result.
//!
//! Both are reference-counted handles, [`Step<T>`] is the tagged union used
//! wherever either kind is accepted. Children are shared rather than owned, so
//! the same node can sit under any number of parents and the whole structure
//! forms a DAG. Since a task can only be built from nodes that already exist,
//! safe code has no way of closing a cycle.

mod step;
mod sugar;
mod task;
mod variable;

pub use crate::engine::step::{Node, Step};
pub use crate::engine::task::Task;
pub use crate::engine::variable::{Variable, wrap};
