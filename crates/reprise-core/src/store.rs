use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::effects::Cleanup;
use crate::error::{HookError, HookResult, SlotOccupant, SlotSite, SlotType};
use crate::slot::Slot;

new_key_type! {
    pub(crate) struct KeyedSlotId;
}

/// Stable handle to a slot, held by setters and by in-flight hook calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotAddr {
    Position(usize),
    Keyed(KeyedSlotId),
}

/// How a hook call asks for its slot.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Request<'a> {
    /// Next slot in call order.
    Next,
    Key(&'a str),
}

/// Borrowed form of [`SlotSite`]; only turned into an owned site for errors.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Site<'a> {
    Position(usize),
    Key(&'a str),
}

impl Site<'_> {
    pub(crate) fn owned(self) -> SlotSite {
        match self {
            Site::Position(index) => SlotSite::Position(index),
            Site::Key(key) => SlotSite::Key(key.to_owned()),
        }
    }
}

struct KeyedEntry {
    key: String,
    slot: Slot,
    active: bool,
}

/// Slot storage of one instance: the positional arena and the keyed map
/// live side by side and never alias.
#[derive(Default)]
pub(crate) struct SlotStore {
    slots: Vec<Slot>,
    cursor: usize,
    keyed: SlotMap<KeyedSlotId, KeyedEntry>,
    keys: HashMap<String, KeyedSlotId>,
}

impl SlotStore {
    pub(crate) fn begin_render(&mut self) {
        self.cursor = 0;
        for entry in self.keyed.values_mut() {
            entry.active = false;
        }
    }

    /// Finds the slot for `request`. `Ok((site, None))` means the caller
    /// should create it with [`SlotStore::insert`].
    pub(crate) fn locate<'a>(
        &mut self,
        request: Request<'a>,
        initialized: bool,
        expected: SlotType,
    ) -> HookResult<(Site<'a>, Option<SlotAddr>)> {
        match request {
            Request::Next => {
                let index = self.cursor;
                self.cursor += 1;
                let site = Site::Position(index);
                if index < self.slots.len() {
                    Ok((site, Some(SlotAddr::Position(index))))
                } else if initialized {
                    Err(HookError::KindMismatch {
                        site: site.owned(),
                        expected,
                        found: SlotOccupant::Empty,
                    })
                } else {
                    Ok((site, None))
                }
            }
            Request::Key(key) => {
                let site = Site::Key(key);
                let id = self.keys.get(key).copied();
                let addr = id.and_then(|id| {
                    let entry = self.keyed.get_mut(id)?;
                    if entry.active {
                        log::warn!(
                            "hook key '{}' requested twice in one render; both calls share a slot",
                            key
                        );
                    }
                    entry.active = true;
                    Some(SlotAddr::Keyed(id))
                });
                Ok((site, addr))
            }
        }
    }

    pub(crate) fn insert(&mut self, site: Site<'_>, slot: Slot) -> SlotAddr {
        log::trace!("creating {} slot at {:?}", slot.kind(), site);
        match site {
            Site::Position(_) => {
                self.slots.push(slot);
                SlotAddr::Position(self.slots.len() - 1)
            }
            Site::Key(key) => {
                let id = self.keyed.insert(KeyedEntry {
                    key: key.to_owned(),
                    slot,
                    active: true,
                });
                self.keys.insert(key.to_owned(), id);
                SlotAddr::Keyed(id)
            }
        }
    }

    pub(crate) fn get_mut(&mut self, addr: &SlotAddr) -> Option<&mut Slot> {
        match *addr {
            SlotAddr::Position(index) => self.slots.get_mut(index),
            SlotAddr::Keyed(id) => self.keyed.get_mut(id).map(|e| &mut e.slot),
        }
    }

    /// Positional slots are always live; keyed slots only while their key
    /// was requested by the latest render.
    pub(crate) fn is_live(&self, addr: &SlotAddr) -> bool {
        match *addr {
            SlotAddr::Position(index) => index < self.slots.len(),
            SlotAddr::Keyed(id) => self.keyed.get(id).is_some_and(|e| e.active),
        }
    }

    /// Drops keyed effect slots that the finished render did not request and
    /// hands back their cleanups. Inactive state and memo slots are kept.
    pub(crate) fn sweep_inactive(&mut self) -> Vec<Cleanup> {
        let stale: Vec<KeyedSlotId> = self
            .keyed
            .iter()
            .filter(|(_, e)| !e.active && matches!(e.slot, Slot::Effect(_)))
            .map(|(id, _)| id)
            .collect();

        let mut cleanups = Vec::new();
        for id in stale {
            if let Some(mut entry) = self.keyed.remove(id) {
                log::trace!("dropping inactive effect slot '{}'", entry.key);
                self.keys.remove(&entry.key);
                cleanups.extend(entry.slot.take_cleanup());
            }
        }
        cleanups
    }

    /// Takes every pending effect cleanup: positional slots in call order,
    /// then keyed slots in storage order.
    pub(crate) fn drain_cleanups(&mut self) -> Vec<Cleanup> {
        self.slots
            .iter_mut()
            .chain(self.keyed.values_mut().map(|e| &mut e.slot))
            .filter_map(Slot::take_cleanup)
            .collect()
    }

    pub(crate) fn positional_len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn keyed_len(&self) -> usize {
        self.keyed.len()
    }

    pub(crate) fn inactive_keyed_len(&self) -> usize {
        self.keyed.values().filter(|e| !e.active).count()
    }
}
