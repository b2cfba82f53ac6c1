//! Structural analysis that needs no evaluation.

use serde::{Deserialize, Serialize};

use crate::engine::{Node, Step, Task, Variable};
use crate::graph::{NodeKind, snapshot};

/// Node-kind classification.
///
/// Raw numbers count as variables: they become anonymous variables as soon
/// as they are used as operands.
pub trait Classify {
    fn is_variable(&self) -> bool;

    /// Whether this is a computation step, i.e. a [`Task`].
    fn is_step(&self) -> bool;
}

impl<T> Classify for Variable<T> {
    fn is_variable(&self) -> bool {
        true
    }

    fn is_step(&self) -> bool {
        false
    }
}

impl<T> Classify for Task<T> {
    fn is_variable(&self) -> bool {
        false
    }

    fn is_step(&self) -> bool {
        true
    }
}

impl<T> Classify for Step<T> {
    fn is_variable(&self) -> bool {
        matches!(self, Step::Variable(_))
    }

    fn is_step(&self) -> bool {
        matches!(self, Step::Task(_))
    }
}

macro_rules! impl_classify_raw {
    ($($T:ty),*) => {
        $(
            impl Classify for $T {
                fn is_variable(&self) -> bool {
                    true
                }

                fn is_step(&self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_classify_raw!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

pub fn is_variable<N: Classify + ?Sized>(node: &N) -> bool {
    node.is_variable()
}

pub fn is_step<N: Classify + ?Sized>(node: &N) -> bool {
    node.is_step()
}

/// Node tallies of a graph.
///
/// Counts are taken per edge: a node reachable through several parents is
/// counted once for each of them. Use [`OperationCount::unique`] to count
/// distinct nodes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationCount {
    pub num_variables: usize,
    pub num_operations: usize,
    pub num_nodes: usize,
}

impl OperationCount {
    /// Counts the nodes reached during a full traversal of `graph`.
    pub fn of<N: Node + ?Sized>(graph: &N) -> Self {
        let mut count = Self::default();

        graph.to_step().for_each(|step| {
            match step {
                Step::Variable(_) => count.num_variables += 1,
                Step::Task(_) => count.num_operations += 1,
            }
            count.num_nodes += 1;
        });

        count
    }

    /// Counts every distinct node reachable from `graph` exactly once.
    pub fn unique<N: Node + ?Sized>(graph: &N) -> Self {
        let snapshot = snapshot(graph);

        let num_variables = snapshot
            .node_weights()
            .filter(|label| label.kind == NodeKind::Variable)
            .count();
        let num_nodes = snapshot.node_count();

        Self {
            num_variables,
            num_operations: num_nodes - num_variables,
            num_nodes,
        }
    }
}

/// Shorthand for [`OperationCount::of`].
pub fn operation_count<N: Node + ?Sized>(graph: &N) -> OperationCount {
    OperationCount::of(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;

    #[test]
    fn test_classification() {
        let x = 2.0_f32;
        let a = Variable::new(x);
        let b = Variable::<f32>::default();
        let sum = &a + &b;

        assert!(is_variable(&x));
        assert!(is_variable(&a));
        assert!(is_variable(&b));
        assert!(!is_variable(&sum));

        assert!(!is_step(&x));
        assert!(!is_step(&a));
        assert!(!is_step(&b));
        assert!(is_step(&sum));

        let step = Step::from(sum.clone());
        assert!(is_step(&step) && !is_variable(&step));
        let step = Step::from(&a);
        assert!(is_variable(&step) && !is_step(&step));
    }

    #[test]
    fn test_operation_count() {
        let a = Variable::new(10.0_f64);
        let b = Variable::new(2.0);
        let c = Variable::new(3.0);
        let d = Variable::new(4.0);

        let sum = (&a * &b) + (&c + &d) + 10.0;

        assert_eq!(
            operation_count(&sum),
            OperationCount {
                num_variables: 5,
                num_operations: 4,
                num_nodes: 9,
            }
        );
        assert!(!sum.is_evaluated());
    }

    #[test]
    fn test_count_of_variable() {
        let a = Variable::new(1_u8);
        assert_eq!(
            OperationCount::of(&a),
            OperationCount {
                num_variables: 1,
                num_operations: 0,
                num_nodes: 1,
            }
        );
    }

    #[test]
    fn test_edge_count_versus_unique() {
        let a = Variable::new(1_i32);
        let shared = Task::new(Operation::add(), [&a, &a, &a]).unwrap();
        let root = &shared * &shared;

        assert_eq!(
            OperationCount::of(&root),
            OperationCount {
                num_variables: 6,
                num_operations: 3,
                num_nodes: 9,
            }
        );
        assert_eq!(
            OperationCount::unique(&root),
            OperationCount {
                num_variables: 1,
                num_operations: 2,
                num_nodes: 3,
            }
        );
    }

    #[test]
    fn test_count_serializes() {
        let count = OperationCount {
            num_variables: 5,
            num_operations: 4,
            num_nodes: 9,
        };

        let json = serde_json::to_string(&count).unwrap();
        assert_eq!(json, r#"{"num_variables":5,"num_operations":4,"num_nodes":9}"#);
        assert_eq!(serde_json::from_str::<OperationCount>(&json).unwrap(), count);
    }
}
