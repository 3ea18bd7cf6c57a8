use std::{
    any::Any,
    cell::RefCell,
    fmt,
    rc::Rc,
};

/// State carried by a host object.
///
/// Any `'static` type that can be printed and debugged is an instance; the
/// blanket implementation supplies the downcasting hooks. The `Display`
/// output is what `$name` substitution and string concatenation show.
pub trait Instance: Any + fmt::Debug + fmt::Display {
    /// Borrows the state as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrows the state as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + fmt::Debug + fmt::Display> Instance for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A shared reference to a host object.
///
/// Cloning the reference shares the object; equality is identity. The class
/// name is fixed at construction and is the key the registry uses for
/// virtual dispatch.
#[derive(Clone)]
pub struct ObjectRef {
    class: Rc<str>,
    state: Rc<RefCell<dyn Instance>>,
}

impl ObjectRef {
    /// Creates a new object of `class` holding `state`.
    ///
    /// # Example
    /// ```
    /// use interplay::interpreter::value::object::ObjectRef;
    ///
    /// let object = ObjectRef::new("demo.Counter", 41_i64);
    /// object.with_mut(|n: &mut i64| *n += 1);
    ///
    /// assert_eq!(object.class(), "demo.Counter");
    /// assert_eq!(object.to_string(), "42");
    /// ```
    pub fn new(class: &str, state: impl Instance) -> Self {
        let state: Rc<RefCell<dyn Instance>> = Rc::new(RefCell::new(state));
        Self { class: Rc::from(class),
               state }
    }

    /// The fully-qualified class name this object was constructed as.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns `true` if the state is of type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.state.try_borrow().is_ok_and(|state| (*state).as_any().is::<T>())
    }

    /// Runs `f` on the state if it is of type `T`.
    ///
    /// Returns `None` if the state has another type or is currently
    /// borrowed mutably.
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let state = self.state.try_borrow().ok()?;
        (*state).as_any().downcast_ref::<T>().map(f)
    }

    /// Runs `f` on the mutable state if it is of type `T`.
    ///
    /// Returns `None` if the state has another type or is currently
    /// borrowed.
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.state.try_borrow_mut().ok()?;
        (*state).as_any_mut().downcast_mut::<T>().map(f)
    }

    /// Returns `true` while the state is borrowed, for example while the
    /// object is being printed.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        self.state.try_borrow_mut().is_err()
    }

    /// Returns `true` if both references point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow_mut() {
            Ok(state) => write!(f, "{}({:?})", self.class, &*state),
            Err(_) => write!(f, "{}(<borrowed>)", self.class),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => write!(f, "{}", &*state),
            Err(_) => write!(f, "{}", self.class),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Default)]
    struct Tally(Vec<i32>);

    impl fmt::Display for Tally {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    #[test]
    fn state_is_reached_through_its_concrete_type() {
        let object = ObjectRef::new("demo.Tally", Tally::default());

        assert!(object.is::<Tally>());
        assert!(!object.is::<String>());
        assert_eq!(object.with_mut(|tally: &mut Tally| tally.0.push(3)), Some(()));
        assert_eq!(object.with(|tally: &Tally| tally.0.clone()), Some(vec![3]));
        assert_eq!(object.with(|text: &String| text.len()), None);
    }

    #[test]
    fn borrowed_state_is_reported() {
        let object = ObjectRef::new("demo.Tally", Tally::default());
        let alias = object.clone();

        assert!(!object.is_borrowed());
        assert_eq!(object.with(|_: &Tally| alias.is_borrowed()), Some(true));
        assert_eq!(object.with_mut(|_: &mut Tally| alias.with(|_: &Tally| ())), Some(None));
        assert_eq!(object.with_mut(|_: &mut Tally| format!("{alias:?}")),
                   Some("demo.Tally(<borrowed>)".to_string()));
    }
}
