//! The two textual exports of a computation graph.
//!
//! * [`render`] and the `Display` impls print the nested text form.
//! * [`Exporter`] and [`export_graph`] write a Graphviz `digraph`.
//!
//! Both are visitors driven by [`Step::traverse`](crate::Step::traverse), so
//! both list children in reversed construction order.

mod dot;
mod print;

pub use crate::render::dot::{DotStyle, Exporter, export_graph};
pub use crate::render::print::render;
