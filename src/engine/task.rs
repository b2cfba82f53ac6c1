use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::rc::Rc;

use crate::engine::Step;
use crate::error::GraphError;
use crate::operation::Operation;

pub(crate) const DEFAULT_TASK_NAME: &str = "Task";

pub(crate) struct TaskNode<T> {
    pub(crate) name: RefCell<String>,
    pub(crate) operation: Operation<T>,
    pub(crate) children: Box<[Step<T>]>,
    pub(crate) cache: RefCell<Option<T>>,
}

/// An internal node of the computation graph.
///
/// A `Task<T>` applies an [`Operation`] to the values of its children. The
/// children are fixed at construction and kept in construction order. The
/// result is not computed until [`Task::eval`] is called, after which it is
/// cached inside the node and can be read with [`Task::value`].
///
/// # Shared children
///
/// Like [`Variable`](crate::Variable), a task is a clonable handle. Passing
/// the same task to two parents makes it a shared child: evaluating either
/// parent writes the same cache slot.
pub struct Task<T> {
    pub(crate) node: Rc<TaskNode<T>>,
}

impl<T> Task<T> {
    /// Creates a task over the given operands. Raw values are promoted to
    /// fresh anonymous variables by their `Into<Step<T>>` conversion.
    ///
    /// Fails with [`GraphError::ArityMismatch`] when the operand count is not
    /// accepted by the operation.
    pub fn new<I>(operation: Operation<T>, children: I) -> Result<Self, GraphError>
    where
        I: IntoIterator,
        I::Item: Into<Step<T>>,
    {
        let children: Vec<Step<T>> = children.into_iter().map(Into::into).collect();

        if !operation.arity().accepts(children.len()) {
            return Err(GraphError::ArityMismatch {
                operation: operation.label().to_string(),
                expected: operation.arity(),
                found: children.len(),
            });
        }

        Ok(Self::from_parts(operation, children))
    }

    /// Only for callers that already know the arity is satisfied.
    pub(crate) fn from_parts(operation: Operation<T>, children: Vec<Step<T>>) -> Self {
        debug_assert!(operation.arity().accepts(children.len()));

        Self {
            node: Rc::new(TaskNode {
                name: RefCell::new(DEFAULT_TASK_NAME.into()),
                operation,
                children: children.into_boxed_slice(),
                cache: RefCell::new(None),
            }),
        }
    }

    pub fn get_name(&self) -> String {
        self.node.name.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.node.name.borrow_mut() = name.into();
    }

    pub fn operation(&self) -> &Operation<T> {
        &self.node.operation
    }

    /// Children in construction order.
    pub fn children(&self) -> &[Step<T>] {
        &self.node.children
    }

    pub fn is_evaluated(&self) -> bool {
        self.node.cache.borrow().is_some()
    }

    /// Returns the result cached by the last [`Task::eval`].
    pub fn value(&self) -> Result<T, GraphError>
    where
        T: Clone,
    {
        self.node
            .cache
            .borrow()
            .clone()
            .ok_or_else(|| GraphError::NotEvaluated(self.get_name()))
    }

    /// Recomputes this task and every task below it, children before
    /// parents, and overwrites their cached results.
    ///
    /// A task reachable through several parents is computed once per call.
    /// Nothing is remembered between calls, so changes to variables are
    /// always picked up.
    pub fn eval(&self) -> Result<(), GraphError>
    where
        T: Clone,
    {
        let mut done = HashSet::new();
        let mut stack = vec![(self, false)];

        // Each task is pushed twice: once to schedule its children, and once
        // more below them to run after they have all been computed.
        while let Some((task, expanded)) = stack.pop() {
            if expanded {
                task.apply()?;
                continue;
            }

            if !done.insert(task.addr()) {
                continue;
            }

            stack.push((task, true));
            for child in task.children().iter().rev() {
                if let Step::Task(child) = child {
                    if !done.contains(&child.addr()) {
                        stack.push((child, false));
                    }
                }
            }
        }

        Ok(())
    }

    /// Runs the operation over the current values of the children.
    fn apply(&self) -> Result<(), GraphError>
    where
        T: Clone,
    {
        let name = self.get_name();
        let span = tracing::trace_span!("eval", task = %name);
        let _enter = span.enter();

        let args = self
            .children()
            .iter()
            .map(Step::value)
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .node
            .operation
            .apply(&args)
            .map_err(|err| GraphError::Operation(name, err))?;

        tracing::trace!(operands = args.len(), "evaluated");
        *self.node.cache.borrow_mut() = Some(output);

        Ok(())
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.node).cast()
    }
}

impl<T> Drop for TaskNode<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children).into_vec();

        // Uniquely owned subtrees are released here, one level at a time.
        while let Some(step) = pending.pop() {
            if let Step::Task(task) = step {
                if let Some(mut node) = Rc::into_inner(task.node) {
                    pending.extend(std::mem::take(&mut node.children).into_vec());
                }
            }
        }
    }
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T: Debug> Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &*self.node.name.borrow())
            .field("operation", &self.node.operation)
            .field("children", &self.node.children)
            .field("cache", &*self.node.cache.borrow())
            .finish()
    }
}
