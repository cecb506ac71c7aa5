use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::effects::Cleanup;
use crate::error::SlotType;
use crate::Deps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    State,
    Memo,
    Effect,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookKind::State => "use_state",
            HookKind::Memo => "use_memo",
            HookKind::Effect => "use_effect",
        })
    }
}

/// One persisted hook record. The variant is fixed when the slot is created.
pub(crate) enum Slot {
    State(StateSlot),
    Memo(MemoSlot),
    Effect(EffectSlot),
}

pub(crate) struct StateSlot {
    // Rc<RefCell<T>>, shared with every Setter handed out for this slot.
    cell: Rc<dyn Any>,
    value_type: &'static str,
}

pub(crate) struct MemoSlot {
    value: Box<dyn Any>,
    value_type: &'static str,
    pub(crate) deps: Deps,
}

pub(crate) struct EffectSlot {
    pub(crate) cleanup: Option<Cleanup>,
    pub(crate) deps: Deps,
}

impl StateSlot {
    pub(crate) fn new<T: 'static>(cell: Rc<RefCell<T>>) -> Self {
        Self {
            cell,
            value_type: std::any::type_name::<T>(),
        }
    }
}

impl MemoSlot {
    pub(crate) fn new<T: 'static>(value: T, deps: Deps) -> Self {
        Self {
            value: Box::new(value),
            value_type: std::any::type_name::<T>(),
            deps,
        }
    }

    pub(crate) fn value<T: Clone + 'static>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }

    pub(crate) fn store<T: 'static>(&mut self, value: T, deps: Deps) {
        self.value = Box::new(value);
        self.deps = deps;
    }
}

impl EffectSlot {
    pub(crate) fn new(deps: Deps) -> Self {
        Self {
            cleanup: None,
            deps,
        }
    }
}

impl Slot {
    pub(crate) fn kind(&self) -> HookKind {
        match self {
            Slot::State(_) => HookKind::State,
            Slot::Memo(_) => HookKind::Memo,
            Slot::Effect(_) => HookKind::Effect,
        }
    }

    pub(crate) fn slot_type(&self) -> SlotType {
        let value = match self {
            Slot::State(s) => s.value_type,
            Slot::Memo(m) => m.value_type,
            Slot::Effect(_) => std::any::type_name::<()>(),
        };
        SlotType {
            kind: self.kind(),
            value,
        }
    }

    pub(crate) fn state<T: 'static>(&self) -> Option<Rc<RefCell<T>>> {
        match self {
            Slot::State(s) => s.cell.clone().downcast::<RefCell<T>>().ok(),
            _ => None,
        }
    }

    pub(crate) fn as_memo<T: 'static>(&mut self) -> Option<&mut MemoSlot> {
        match self {
            Slot::Memo(m) if m.value.is::<T>() => Some(m),
            _ => None,
        }
    }

    pub(crate) fn as_effect(&mut self) -> Option<&mut EffectSlot> {
        match self {
            Slot::Effect(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn take_cleanup(&mut self) -> Option<Cleanup> {
        self.as_effect().and_then(|e| e.cleanup.take())
    }
}
