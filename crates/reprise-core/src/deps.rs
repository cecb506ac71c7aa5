use std::any::Any;
use std::fmt;

use smallvec::SmallVec;

/// A value that can sit in a dependency list. Implemented for every
/// `PartialEq + 'static` type; values of different types never compare equal.
pub trait DepValue: Any {
    fn as_any(&self) -> &dyn Any;
    fn dep_eq(&self, other: &dyn DepValue) -> bool;
    fn dep_type(&self) -> &'static str;
}

impl<T: PartialEq + 'static> DepValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dep_eq(&self, other: &dyn DepValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dep_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Ordered dependency list for `use_memo` / `use_effect`.
#[derive(Default)]
pub struct Deps(SmallVec<[Box<dyn DepValue>; 4]>);

impl Deps {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn push(&mut self, value: impl DepValue) {
        self.0.push(Box::new(value));
    }

    pub fn with(mut self, value: impl DepValue) -> Self {
        self.push(value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any position of `self` differs from the same position in
    /// `previous`. Only the positions present in `self` are compared, so
    /// shrinking a list never counts as a change on its own.
    pub fn changed_since(&self, previous: &Deps) -> bool {
        self.0.iter().enumerate().any(|(i, dep)| match previous.0.get(i) {
            Some(old) => !dep.dep_eq(&**old),
            None => true,
        })
    }
}

impl fmt::Debug for Deps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|d| d.dep_type()))
            .finish()
    }
}

/// Builds a [`Deps`] list: `deps![id, name.clone()]`.
#[macro_export]
macro_rules! deps {
    () => {
        $crate::Deps::new()
    };
    ($($dep:expr),+ $(,)?) => {{
        let mut deps = $crate::Deps::new();
        $( deps.push($dep); )+
        deps
    }};
}
