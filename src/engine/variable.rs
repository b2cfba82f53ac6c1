use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;

pub(crate) const DEFAULT_VARIABLE_NAME: &str = "Variable";

pub(crate) struct VariableNode<T> {
    pub(crate) name: RefCell<String>,
    pub(crate) value: Rc<RefCell<T>>,
}

/// A leaf of the computation graph.
///
/// A `Variable<T>` is a lightweight, clonable handle. Every clone refers to
/// the same node, so a variable used as a child by several tasks is shared
/// between them, and any name or value written through one handle is visible
/// through all of them.
pub struct Variable<T> {
    pub(crate) node: Rc<VariableNode<T>>,
}

impl<T> Variable<T> {
    /// Wraps an owned value.
    pub fn new(value: T) -> Self {
        Self::alias(&Rc::new(RefCell::new(value)))
    }

    /// Creates a variable backed by caller-owned storage. Writes to `cell`
    /// are observed by the next evaluation of any task that reads this
    /// variable.
    pub fn alias(cell: &Rc<RefCell<T>>) -> Self {
        Self {
            node: Rc::new(VariableNode {
                name: RefCell::new(DEFAULT_VARIABLE_NAME.into()),
                value: cell.clone(),
            }),
        }
    }

    pub fn get_name(&self) -> String {
        self.node.name.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.node.name.borrow_mut() = name.into();
    }

    /// Returns the live value.
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        self.node.value.borrow().clone()
    }

    /// Replaces the live value.
    pub fn set(&self, value: T) {
        *self.node.value.borrow_mut() = value;
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.node).cast()
    }
}

/// Shorthand for [`Variable::new`].
pub fn wrap<T>(value: T) -> Variable<T> {
    Variable::new(value)
}

impl<T: Default> Default for Variable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T: Debug> Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &*self.node.name.borrow())
            .field("value", &*self.node.value.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        let a = Variable::new(1.0);
        assert_eq!(a.get_name(), "Variable");
    }

    #[test]
    fn test_name_round_trip() {
        let a = Variable::new(1.0);
        a.set_name("x");
        assert_eq!(a.get_name(), "x");
    }

    #[test]
    fn test_clones_share_state() {
        let a = Variable::new(1);
        let b = a.clone();

        b.set_name("b");
        b.set(5);

        assert!(a.ptr_eq(&b));
        assert_eq!(a.get_name(), "b");
        assert_eq!(a.value(), 5);
    }

    #[test]
    fn test_alias_reads_live_value() {
        let cell = Rc::new(RefCell::new(3_u32));
        let a = Variable::alias(&cell);

        *cell.borrow_mut() = 7;
        assert_eq!(a.value(), 7);

        a.set(9);
        assert_eq!(*cell.borrow(), 9);
    }

    #[test]
    fn test_default_value() {
        let a = Variable::<f32>::default();
        assert_eq!(a.value(), 0.0);
    }
}
