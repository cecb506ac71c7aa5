use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::effects::{Cleanup, IntoCleanup};
use crate::error::{HookError, HookResult, SlotOccupant, SlotType};
use crate::runtime::{InstanceCore, current_instance};
use crate::slot::{EffectSlot, HookKind, MemoSlot, Slot, StateSlot};
use crate::store::{Request, Site, SlotAddr};
use crate::Deps;

/// Writes to one state slot and re-renders its owner when the value changes.
pub struct Setter<T> {
    cell: Rc<RefCell<T>>,
    instance: Weak<InstanceCore>,
    addr: SlotAddr,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            instance: self.instance.clone(),
            addr: self.addr,
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("value", &std::any::type_name::<T>())
            .field("addr", &self.addr)
            .finish()
    }
}

impl<T: PartialEq + 'static> Setter<T> {
    pub fn set(&self, value: T) -> HookResult<()> {
        self.update(|_| value)
    }

    /// Computes the next value from the current one. Equal values are
    /// dropped without touching the slot or rendering.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> HookResult<()> {
        let next = {
            let current = self.cell.borrow();
            f(&*current)
        };
        if *self.cell.borrow() == next {
            return Ok(());
        }
        *self.cell.borrow_mut() = next;

        match self.instance.upgrade() {
            Some(instance) => instance.request_render(&self.addr),
            None => {
                log::debug!("state set after its instance was dropped");
                Ok(())
            }
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }
}

/// State matched by call order.
///
/// `init` runs once, when the slot is created on the first render.
pub fn use_state<T>(init: impl FnOnce() -> T) -> HookResult<(T, Setter<T>)>
where
    T: Clone + PartialEq + 'static,
{
    state_hook(Request::Next, init)
}

/// State matched by `key`; safe to call conditionally. A key that is skipped
/// for a render keeps its value until it is requested again.
pub fn use_state_with_key<T>(
    key: impl AsRef<str>,
    init: impl FnOnce() -> T,
) -> HookResult<(T, Setter<T>)>
where
    T: Clone + PartialEq + 'static,
{
    state_hook(Request::Key(key.as_ref()), init)
}

/// Cached `compute()` result, recomputed only when `deps` change.
pub fn use_memo<T>(compute: impl FnOnce() -> T, deps: Deps) -> HookResult<T>
where
    T: Clone + 'static,
{
    memo_hook(Request::Next, compute, deps)
}

pub fn use_memo_with_key<T>(
    key: impl AsRef<str>,
    compute: impl FnOnce() -> T,
    deps: Deps,
) -> HookResult<T>
where
    T: Clone + 'static,
{
    memo_hook(Request::Key(key.as_ref()), compute, deps)
}

/// Runs `effect` during the render that first requests it and again whenever
/// `deps` change, running the previous cleanup first.
pub fn use_effect<C: IntoCleanup>(effect: impl FnOnce() -> C, deps: Deps) -> HookResult<()> {
    effect_hook(Request::Next, effect, deps)
}

/// Keyed effect. If a render skips the key, the cleanup runs as soon as that
/// render finishes and the slot is discarded.
pub fn use_effect_with_key<C: IntoCleanup>(
    key: impl AsRef<str>,
    effect: impl FnOnce() -> C,
    deps: Deps,
) -> HookResult<()> {
    effect_hook(Request::Key(key.as_ref()), effect, deps)
}

fn with_slot<R>(
    instance: &InstanceCore,
    site: Site<'_>,
    addr: &SlotAddr,
    expected: SlotType,
    f: impl FnOnce(&mut Slot) -> Option<R>,
) -> HookResult<R> {
    let mut slots = instance.slots.borrow_mut();
    let mismatch = |found| HookError::KindMismatch {
        site: site.owned(),
        expected,
        found,
    };
    let slot = slots
        .get_mut(addr)
        .ok_or_else(|| mismatch(SlotOccupant::Empty))?;
    let found = slot.slot_type();
    f(slot).ok_or_else(|| mismatch(SlotOccupant::Slot(found)))
}

fn state_hook<T>(request: Request<'_>, init: impl FnOnce() -> T) -> HookResult<(T, Setter<T>)>
where
    T: Clone + PartialEq + 'static,
{
    let expected = SlotType::of::<T>(HookKind::State);
    let instance = current_instance(HookKind::State)?;
    let (site, addr) = instance.locate(request, expected)?;

    let (cell, addr) = match addr {
        Some(addr) => {
            let cell = with_slot(&instance, site, &addr, expected, |slot| slot.state::<T>())?;
            (cell, addr)
        }
        None => {
            let cell = Rc::new(RefCell::new(init()));
            let addr = instance
                .slots
                .borrow_mut()
                .insert(site, Slot::State(StateSlot::new(cell.clone())));
            (cell, addr)
        }
    };

    let value = cell.borrow().clone();
    let setter = Setter {
        cell,
        instance: Rc::downgrade(&instance),
        addr,
    };
    Ok((value, setter))
}

fn memo_hook<T>(request: Request<'_>, compute: impl FnOnce() -> T, deps: Deps) -> HookResult<T>
where
    T: Clone + 'static,
{
    let expected = SlotType::of::<T>(HookKind::Memo);
    let instance = current_instance(HookKind::Memo)?;
    let (site, addr) = instance.locate(request, expected)?;

    let Some(addr) = addr else {
        let value = compute();
        instance
            .slots
            .borrow_mut()
            .insert(site, Slot::Memo(MemoSlot::new(value.clone(), deps)));
        return Ok(value);
    };

    let cached = with_slot(&instance, site, &addr, expected, |slot| {
        let memo = slot.as_memo::<T>()?;
        if deps.changed_since(&memo.deps) {
            Some(None)
        } else {
            memo.value::<T>().map(Some)
        }
    })?;
    if let Some(value) = cached {
        return Ok(value);
    }

    // compute() may re-enter the runtime; no borrow is held across it.
    let value = compute();
    with_slot(&instance, site, &addr, expected, |slot| {
        slot.as_memo::<T>()?.store(value.clone(), deps);
        Some(())
    })?;
    Ok(value)
}

fn effect_hook<C: IntoCleanup>(
    request: Request<'_>,
    effect: impl FnOnce() -> C,
    deps: Deps,
) -> HookResult<()> {
    let expected = SlotType::of::<()>(HookKind::Effect);
    let instance = current_instance(HookKind::Effect)?;
    let (site, addr) = instance.locate(request, expected)?;

    let (addr, previous) = match addr {
        None => {
            let addr = instance
                .slots
                .borrow_mut()
                .insert(site, Slot::Effect(EffectSlot::new(deps)));
            (addr, None)
        }
        Some(addr) => {
            let rerun = with_slot(&instance, site, &addr, expected, |slot| {
                let record = slot.as_effect()?;
                if !deps.changed_since(&record.deps) {
                    return Some(None);
                }
                record.deps = deps;
                Some(Some(record.cleanup.take()))
            })?;
            match rerun {
                Some(previous) => (addr, previous),
                None => return Ok(()),
            }
        }
    };

    if let Some(cleanup) = previous {
        cleanup.run();
    }
    let Some(cleanup) = effect().into_cleanup()? else {
        return Ok(());
    };
    store_cleanup(&instance, &addr, cleanup);
    Ok(())
}

fn store_cleanup(instance: &InstanceCore, addr: &SlotAddr, cleanup: Cleanup) {
    let orphan = {
        let mut slots = instance.slots.borrow_mut();
        match slots.get_mut(addr).and_then(Slot::as_effect) {
            Some(record) if !instance.is_unmounted() => {
                record.cleanup = Some(cleanup);
                None
            }
            _ => Some(cleanup),
        }
    };
    // The instance went away while the effect ran.
    if let Some(cleanup) = orphan {
        cleanup.run();
    }
}
