use std::fmt;

use crate::HookResult;

/// Teardown returned by an effect. Runs before the effect fires again, when
/// its keyed slot is dropped, or at unmount.
pub struct Cleanup(Box<dyn FnOnce()>);

impl Cleanup {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn run(self) {
        (self.0)()
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleanup(..)")
    }
}

/// Helper to return a cleanup from an effect.
pub fn on_cleanup(f: impl FnOnce() + 'static) -> Cleanup {
    Cleanup::new(f)
}

/// What an effect closure may return.
pub trait IntoCleanup {
    fn into_cleanup(self) -> HookResult<Option<Cleanup>>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> HookResult<Option<Cleanup>> {
        Ok(None)
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> HookResult<Option<Cleanup>> {
        Ok(Some(self))
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> HookResult<Option<Cleanup>> {
        Ok(self)
    }
}

impl<C: IntoCleanup> IntoCleanup for HookResult<C> {
    fn into_cleanup(self) -> HookResult<Option<Cleanup>> {
        self.and_then(IntoCleanup::into_cleanup)
    }
}

pub(crate) fn run_all(cleanups: Vec<Cleanup>) {
    for cleanup in cleanups {
        cleanup.run();
    }
}
