use std::fmt::{self, Debug};

use crate::engine::{Task, Variable};
use crate::error::GraphError;

/// Any node of the computation graph: either a [`Variable`] leaf or a
/// [`Task`].
///
/// Converting a raw number into a `Step` always creates a fresh, anonymous
/// variable. Two equal literals never end up as the same node.
pub enum Step<T> {
    Variable(Variable<T>),
    Task(Task<T>),
}

impl<T> Step<T> {
    pub fn get_name(&self) -> String {
        match self {
            Step::Variable(variable) => variable.get_name(),
            Step::Task(task) => task.get_name(),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        match self {
            Step::Variable(variable) => variable.set_name(name),
            Step::Task(task) => task.set_name(name),
        }
    }

    /// Reads the node: the live value of a variable, or the cached result of
    /// a task.
    pub fn value(&self) -> Result<T, GraphError>
    where
        T: Clone,
    {
        match self {
            Step::Variable(variable) => Ok(variable.value()),
            Step::Task(task) => task.value(),
        }
    }

    /// Evaluates the node. Variables need no evaluation.
    pub fn eval(&self) -> Result<(), GraphError>
    where
        T: Clone,
    {
        match self {
            Step::Variable(_) => Ok(()),
            Step::Task(task) => task.eval(),
        }
    }

    pub fn as_variable(&self) -> Option<&Variable<T>> {
        match self {
            Step::Variable(variable) => Some(variable),
            Step::Task(_) => None,
        }
    }

    pub fn as_task(&self) -> Option<&Task<T>> {
        match self {
            Step::Variable(_) => None,
            Step::Task(task) => Some(task),
        }
    }

    /// Children in construction order, empty for variables.
    pub fn children(&self) -> &[Step<T>] {
        match self {
            Step::Variable(_) => &[],
            Step::Task(task) => task.children(),
        }
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    pub(crate) fn addr(&self) -> *const () {
        match self {
            Step::Variable(variable) => variable.addr(),
            Step::Task(task) => task.addr(),
        }
    }
}

impl<T> Clone for Step<T> {
    fn clone(&self) -> Self {
        match self {
            Step::Variable(variable) => Step::Variable(variable.clone()),
            Step::Task(task) => Step::Task(task.clone()),
        }
    }
}

impl<T: Debug> Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Variable(variable) => Debug::fmt(variable, f),
            Step::Task(task) => Debug::fmt(task, f),
        }
    }
}

impl<T> From<Variable<T>> for Step<T> {
    fn from(variable: Variable<T>) -> Self {
        Step::Variable(variable)
    }
}

impl<T> From<&Variable<T>> for Step<T> {
    fn from(variable: &Variable<T>) -> Self {
        Step::Variable(variable.clone())
    }
}

impl<T> From<Task<T>> for Step<T> {
    fn from(task: Task<T>) -> Self {
        Step::Task(task)
    }
}

impl<T> From<&Task<T>> for Step<T> {
    fn from(task: &Task<T>) -> Self {
        Step::Task(task.clone())
    }
}

impl<T> From<&Step<T>> for Step<T> {
    fn from(step: &Step<T>) -> Self {
        step.clone()
    }
}

/// Handles that can serve as the root of a walk, a rendering or an analysis.
pub trait Node {
    type Value;

    fn to_step(&self) -> Step<Self::Value>;
}

impl<T> Node for Step<T> {
    type Value = T;

    fn to_step(&self) -> Step<T> {
        self.clone()
    }
}

impl<T> Node for Variable<T> {
    type Value = T;

    fn to_step(&self) -> Step<T> {
        Step::Variable(self.clone())
    }
}

impl<T> Node for Task<T> {
    type Value = T;

    fn to_step(&self) -> Step<T> {
        Step::Task(self.clone())
    }
}

macro_rules! impl_promote {
    ($($T:ty),*) => {
        $(
            impl From<$T> for Step<$T> {
                fn from(value: $T) -> Self {
                    Step::Variable(Variable::new(value))
                }
            }
        )*
    };
}

impl_promote!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
