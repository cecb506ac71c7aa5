use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::context;
use crate::effects;
use crate::error::{HookError, HookResult, SlotType};
use crate::slot::HookKind;
use crate::store::{Request, Site, SlotAddr, SlotStore};

type Component = Box<dyn Fn() -> HookResult<()>>;

thread_local! {
    static NEXT_INSTANCE: Cell<u64> = const { Cell::new(1) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        NEXT_INSTANCE.with(|next| {
            let id = next.get();
            next.set(id + 1);
            Self(id)
        })
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstanceFlags: u8 {
        /// The first render pass completed; positional slots are now fixed.
        const INITIALIZED = 1 << 0;
        /// The component body (or its keyed sweep) is executing.
        const RENDERING = 1 << 1;
        /// A render was requested while rendering; another pass follows.
        const DIRTY = 1 << 2;
        const UNMOUNTED = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Upper bound on passes one render may take when the component keeps
    /// requesting re-renders of itself while rendering. The first pass
    /// always runs.
    pub max_render_passes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_render_passes: 64,
        }
    }
}

/// Snapshot of an instance for inspectors and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceStats {
    pub id: InstanceId,
    pub renders: u64,
    pub positional_slots: usize,
    pub keyed_slots: usize,
    pub inactive_keyed_slots: usize,
    pub flags: InstanceFlags,
}

pub(crate) struct InstanceCore {
    id: InstanceId,
    component: Component,
    pub(crate) slots: RefCell<SlotStore>,
    flags: Cell<InstanceFlags>,
    renders: Cell<u64>,
    config: RenderConfig,
}

struct Rendering<'a>(&'a InstanceCore);

impl Drop for Rendering<'_> {
    fn drop(&mut self) {
        self.0.remove_flags(InstanceFlags::RENDERING);
    }
}

impl InstanceCore {
    fn new(config: RenderConfig, component: Component) -> Self {
        Self {
            id: InstanceId::next(),
            component,
            slots: RefCell::new(SlotStore::default()),
            flags: Cell::new(InstanceFlags::empty()),
            renders: Cell::new(0),
            config,
        }
    }

    fn insert_flags(&self, flags: InstanceFlags) {
        self.flags.set(self.flags.get() | flags);
    }

    fn remove_flags(&self, flags: InstanceFlags) {
        self.flags.set(self.flags.get() - flags);
    }

    pub(crate) fn is_unmounted(&self) -> bool {
        self.flags.get().contains(InstanceFlags::UNMOUNTED)
    }

    pub(crate) fn locate<'a>(
        &self,
        request: Request<'a>,
        expected: SlotType,
    ) -> HookResult<(Site<'a>, Option<SlotAddr>)> {
        let initialized = self.flags.get().contains(InstanceFlags::INITIALIZED);
        self.slots
            .borrow_mut()
            .locate(request, initialized, expected)
    }

    /// Runs the component until it stops asking for re-renders of itself.
    pub(crate) fn render(self: &Rc<Self>) -> HookResult<()> {
        let flags = self.flags.get();
        if flags.contains(InstanceFlags::UNMOUNTED) {
            log::debug!("instance {}: ignoring render after unmount", self.id);
            return Ok(());
        }
        if flags.contains(InstanceFlags::RENDERING) {
            log::debug!("instance {}: render requested mid-render, deferring", self.id);
            self.insert_flags(InstanceFlags::DIRTY);
            return Ok(());
        }

        let mut passes = 0;
        loop {
            if passes > 0 && passes >= self.config.max_render_passes {
                self.remove_flags(InstanceFlags::DIRTY);
                return Err(HookError::RenderLimit { passes });
            }
            passes += 1;
            self.remove_flags(InstanceFlags::DIRTY);
            self.render_pass()?;

            let flags = self.flags.get();
            if !flags.contains(InstanceFlags::DIRTY) || flags.contains(InstanceFlags::UNMOUNTED) {
                return Ok(());
            }
        }
    }

    fn render_pass(self: &Rc<Self>) -> HookResult<()> {
        self.insert_flags(InstanceFlags::RENDERING);
        let _rendering = Rendering(self);
        log::trace!("instance {}: render pass {}", self.id, self.renders.get() + 1);

        {
            let _active = context::enter(self.clone());
            self.slots.borrow_mut().begin_render();
            (self.component)()?;
        }

        self.insert_flags(InstanceFlags::INITIALIZED);
        self.renders.set(self.renders.get() + 1);

        let stale = self.slots.borrow_mut().sweep_inactive();
        effects::run_all(stale);
        Ok(())
    }

    /// Called by setters after they changed a value.
    pub(crate) fn request_render(self: &Rc<Self>, addr: &SlotAddr) -> HookResult<()> {
        if self.is_unmounted() {
            log::debug!("instance {}: state set after unmount", self.id);
            return Ok(());
        }
        if !self.slots.borrow().is_live(addr) {
            log::trace!("instance {}: state set on inactive slot, not rendering", self.id);
            return Ok(());
        }
        self.render()
    }

    fn unmount(&self) {
        if self.is_unmounted() {
            return;
        }
        self.insert_flags(InstanceFlags::UNMOUNTED);
        let cleanups = self.slots.borrow_mut().drain_cleanups();
        log::debug!("instance {}: unmounting, {} cleanup(s)", self.id, cleanups.len());
        effects::run_all(cleanups);
    }

    fn stats(&self) -> InstanceStats {
        let slots = self.slots.borrow();
        InstanceStats {
            id: self.id,
            renders: self.renders.get(),
            positional_slots: slots.positional_len(),
            keyed_slots: slots.keyed_len(),
            inactive_keyed_slots: slots.inactive_keyed_len(),
            flags: self.flags.get(),
        }
    }
}

/// Handle returned by [`mount`]. Unmounting runs every pending effect
/// cleanup; dropping the handle unmounts as well.
#[must_use = "dropping the handle unmounts the component"]
pub struct Unmount {
    core: Rc<InstanceCore>,
}

impl Unmount {
    pub fn unmount(self) {
        self.core.unmount();
    }

    pub fn id(&self) -> InstanceId {
        self.core.id
    }

    pub fn stats(&self) -> InstanceStats {
        self.core.stats()
    }
}

impl Drop for Unmount {
    fn drop(&mut self) {
        self.core.unmount();
    }
}

impl fmt::Debug for Unmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unmount").field("id", &self.core.id).finish()
    }
}

/// Creates an instance for `component` and renders it once before returning.
pub fn mount(component: impl Fn() -> HookResult<()> + 'static) -> HookResult<Unmount> {
    mount_with_config(RenderConfig::default(), component)
}

pub fn mount_with_config(
    config: RenderConfig,
    component: impl Fn() -> HookResult<()> + 'static,
) -> HookResult<Unmount> {
    let core = Rc::new(InstanceCore::new(config, Box::new(component)));
    log::debug!("instance {}: mounting", core.id);
    // A failed first render drops the handle, which cleans up any effects
    // that already fired.
    let handle = Unmount { core };
    handle.core.render()?;
    Ok(handle)
}

pub(crate) fn current_instance(hook: HookKind) -> HookResult<Rc<InstanceCore>> {
    context::current().ok_or(HookError::InvalidContext { hook })
}
