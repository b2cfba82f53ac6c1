//! Depth-first traversal of a computation graph.
//!
//! The walk visits the children of every task in the *reverse* of their
//! construction order, last child first. Printing and graph export both
//! depend on this order, so it is part of the public contract.
//!
//! The walk follows edges, not identities: a node reachable through two parent
//! edges is visited twice.

use crate::engine::{Step, Task, Variable};

/// Receives every node reached during [`Step::traverse`].
///
/// `enter` is called before the node's children are walked and `leave` after.
/// `parent` is the task whose edge led to the node, `None` for the root.
///
/// Any `FnMut(&Step<T>)` closure is a visitor that only implements `enter`.
/// Extra context is simply captured by the closure.
pub trait Visitor<T> {
    fn enter(&mut self, step: &Step<T>, parent: Option<&Task<T>>);

    fn leave(&mut self, _step: &Step<T>, _parent: Option<&Task<T>>) {}
}

impl<T, F> Visitor<T> for F
where
    F: FnMut(&Step<T>),
{
    fn enter(&mut self, step: &Step<T>, _: Option<&Task<T>>) {
        self(step)
    }
}

enum Visit<'a, T> {
    Enter(&'a Step<T>, Option<&'a Task<T>>),
    Leave(&'a Step<T>, Option<&'a Task<T>>),
}

fn walk<T, V>(root: &Step<T>, visitor: &mut V)
where
    V: Visitor<T> + ?Sized,
{
    let mut stack = vec![Visit::Enter(root, None)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(step, parent) => {
                visitor.enter(step, parent);
                stack.push(Visit::Leave(step, parent));

                // Pushed in construction order, so the last child is popped first.
                if let Step::Task(task) = step {
                    for child in task.children() {
                        stack.push(Visit::Enter(child, Some(task)));
                    }
                }
            }
            Visit::Leave(step, parent) => visitor.leave(step, parent),
        }
    }
}

impl<T> Step<T> {
    /// Walks every node reachable from this one, see the [module
    /// documentation](crate::traverse) for the visiting order.
    pub fn traverse<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        walk(self, visitor);
    }

    /// Calls `f` for every node reachable from this one.
    ///
    /// ```rust
    /// use kumiki::{Step, Variable};
    ///
    /// let a = Variable::new(1.0_f64);
    /// let b = Variable::new(2.0);
    /// let sum = Step::from(&a + &b);
    ///
    /// let mut total = 0.0;
    /// sum.for_each(|step| {
    ///     if let Step::Variable(variable) = step {
    ///         total += variable.value();
    ///     }
    /// });
    /// assert_eq!(total, 3.0);
    /// ```
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Step<T>),
    {
        self.traverse(&mut f);
    }
}

impl<T> Task<T> {
    pub fn traverse<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        Step::Task(self.clone()).traverse(visitor);
    }

    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Step<T>),
    {
        Step::Task(self.clone()).for_each(f);
    }
}

impl<T> Variable<T> {
    pub fn traverse<V>(&self, visitor: &mut V)
    where
        V: Visitor<T> + ?Sized,
    {
        Step::Variable(self.clone()).traverse(visitor);
    }
}
