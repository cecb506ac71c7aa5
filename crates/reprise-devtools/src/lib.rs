use std::collections::BTreeMap;

use reprise_core::{InstanceFlags, InstanceId, InstanceStats, Unmount};

pub struct Hud {
    pub enabled: bool,
    samples: u64,
    last: BTreeMap<InstanceId, InstanceStats>,
    last_line: Option<String>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            enabled: true,
            samples: 0,
            last: BTreeMap::new(),
            last_line: None,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Records a snapshot and returns the HUD line for it.
    pub fn sample(&mut self, stats: InstanceStats) -> String {
        self.samples += 1;
        let delta = match self.last.insert(stats.id, stats) {
            Some(prev) => stats.renders.saturating_sub(prev.renders),
            None => stats.renders,
        };
        let mut parts = vec![
            format!("instance {}", stats.id.get()),
            format!("renders: {} (+{delta})", stats.renders),
            format!(
                "slots: {} positional, {} keyed ({} inactive)",
                stats.positional_slots, stats.keyed_slots, stats.inactive_keyed_slots
            ),
        ];
        if stats.flags.contains(InstanceFlags::UNMOUNTED) {
            parts.push("unmounted".to_string());
        }
        let line = parts.join(" | ");
        self.last_line = Some(line.clone());
        line
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Most recent HUD line; earlier ones are not kept.
    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }

    /// Forgets instances that were unmounted.
    pub fn forget(&mut self, id: InstanceId) {
        self.last.remove(&id);
    }
}

pub struct Inspector {
    pub hud: Hud,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self { hud: Hud::new() }
    }

    /// Samples a mounted instance and logs the HUD line when enabled.
    pub fn frame(&mut self, handle: &Unmount) -> Option<String> {
        if !self.hud.enabled {
            return None;
        }
        let line = self.hud.sample(handle.stats());
        log::info!("{line}");
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use reprise_core::prelude::*;

    use super::*;

    #[test]
    fn test_hud_reports_render_delta() {
        let setter = Rc::new(RefCell::new(None));
        let handle = mount({
            let setter = setter.clone();
            move || {
                let (_, set) = use_state(|| 0)?;
                use_state_with_key("flag", || false)?;
                *setter.borrow_mut() = Some(set);
                Ok(())
            }
        })
        .unwrap();

        let mut inspector = Inspector::new();
        let first = inspector.frame(&handle).unwrap();
        assert_eq!(
            first,
            format!(
                "instance {} | renders: 1 (+1) | slots: 1 positional, 1 keyed (0 inactive)",
                handle.id().get()
            )
        );

        let set = setter.borrow().clone().unwrap();
        set.set(1).unwrap();
        set.set(2).unwrap();
        let second = inspector.frame(&handle).unwrap();
        assert!(second.contains("renders: 3 (+2)"));
        assert_eq!(inspector.hud.samples(), 2);
        assert_eq!(inspector.hud.last_line(), Some(second.as_str()));
    }

    #[test]
    fn test_disabled_hud_samples_nothing() {
        let handle = mount(|| Ok(())).unwrap();
        let mut inspector = Inspector::new();
        inspector.hud.toggle();
        assert!(inspector.frame(&handle).is_none());
        assert_eq!(inspector.hud.samples(), 0);
    }
}
