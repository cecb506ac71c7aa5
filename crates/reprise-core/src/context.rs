use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::InstanceCore;

// Stack of instances currently executing their component body. The top is
// the one hook calls resolve against; nested renders of other instances push
// on top and pop back off.
thread_local! {
    static ACTIVE: RefCell<Vec<Rc<InstanceCore>>> = const { RefCell::new(Vec::new()) };
}

/// Pops the active-instance stack on drop, including while unwinding out of
/// a panicking component.
#[must_use = "ActiveGuard pops the active instance on drop"]
pub(crate) struct ActiveGuard;

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

pub(crate) fn enter(instance: Rc<InstanceCore>) -> ActiveGuard {
    ACTIVE.with(|stack| stack.borrow_mut().push(instance));
    ActiveGuard
}

pub(crate) fn current() -> Option<Rc<InstanceCore>> {
    ACTIVE.with(|stack| stack.borrow().last().cloned())
}

/// True while some component body is executing on this thread.
pub fn is_rendering() -> bool {
    ACTIVE.with(|stack| !stack.borrow().is_empty())
}
