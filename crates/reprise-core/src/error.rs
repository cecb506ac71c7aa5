use std::fmt;

use thiserror::Error;

use crate::slot::HookKind;

pub type HookResult<T> = Result<T, HookError>;

/// Caller misuse detected while resolving a hook. None of these are
/// recovered inside the runtime; they unwind out of the render that hit them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    #[error("{hook} called while no component is rendering")]
    InvalidContext { hook: HookKind },

    #[error("hook mismatch at {site}: requested {expected}, slot holds {found}")]
    KindMismatch {
        site: SlotSite,
        expected: SlotType,
        found: SlotOccupant,
    },

    #[error("component still dirty after {passes} render passes")]
    RenderLimit { passes: usize },
}

/// Where a hook call landed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotSite {
    Position(usize),
    Key(String),
}

impl fmt::Display for SlotSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotSite::Position(i) => write!(f, "position {i}"),
            SlotSite::Key(k) => write!(f, "key {k:?}"),
        }
    }
}

/// Hook kind plus the Rust type stored in the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotType {
    pub kind: HookKind,
    pub value: &'static str,
}

impl SlotType {
    pub fn of<T: 'static>(kind: HookKind) -> Self {
        Self {
            kind,
            value: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.kind, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotOccupant {
    /// Positional cursor ran past the slots allocated on the first render.
    Empty,
    Slot(SlotType),
}

impl fmt::Display for SlotOccupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotOccupant::Empty => f.write_str("nothing"),
            SlotOccupant::Slot(ty) => fmt::Display::fmt(ty, f),
        }
    }
}
