//! # State, Memos, and Effects
//!
//! Reprise lets a plain function keep state between calls. A *component* is
//! any `Fn() -> HookResult<()>`; [`mount`] creates an instance for it, renders
//! it once, and hands back an [`Unmount`] handle. While the component body runs,
//! hook calls find their instance through a thread-local context, so no state
//! has to be threaded through by hand.
//!
//! ## State
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use reprise_core::*;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let setter = Rc::new(RefCell::new(None));
//!
//! let handle = mount({
//!     let seen = seen.clone();
//!     let setter = setter.clone();
//!     move || {
//!         let (count, set_count) = use_state(|| 0)?;
//!         seen.borrow_mut().push(count);
//!         *setter.borrow_mut() = Some(set_count);
//!         Ok(())
//!     }
//! })?;
//!
//! let set_count = setter.borrow().clone().unwrap();
//! set_count.set(1)?;           // re-renders synchronously
//! set_count.update(|c| c + 1)?; // functional update
//! set_count.set(2)?;           // unchanged, no render
//! assert_eq!(*seen.borrow(), vec![0, 1, 2]);
//!
//! handle.unmount();
//! # Ok::<(), HookError>(())
//! ```
//!
//! ## Positional and keyed hooks
//!
//! - `use_state`, `use_memo` and `use_effect` are order-based: the Nth hook
//!   call of a render always refers to the Nth slot. The call sequence must
//!   not change between renders; a render that calls more positional hooks
//!   than the first one fails with [`HookError::KindMismatch`].
//! - The `*_with_key` variants are matched by key and may be called
//!   conditionally. Skipped state and memo slots keep their values; a
//!   skipped effect is cleaned up as soon as the render that skipped it
//!   finishes.
//!
//! Both kinds can be mixed in one component; they use separate storage.
//!
//! ## Memos and effects
//!
//! ```rust
//! use reprise_core::*;
//!
//! let handle = mount(|| {
//!     let (n, _) = use_state(|| 21)?;
//!     let doubled = use_memo(|| n * 2, deps![n])?;
//!     use_effect(
//!         move || {
//!             log::info!("doubled is {doubled}");
//!             on_cleanup(|| log::info!("dropping doubled"))
//!         },
//!         deps![doubled],
//!     )?;
//!     Ok(())
//! })?;
//! drop(handle); // same as handle.unmount()
//! # Ok::<(), HookError>(())
//! ```
//!
//! Effects run synchronously during the render that requests them. When their
//! dependencies change, the previous cleanup runs right before the new effect.
//!
//! ## Re-renders from inside a render
//!
//! A setter that fires while its own instance is rendering (from the body or
//! from an effect) does not recurse: the value is stored and one more pass
//! runs after the current one. Passes are bounded by
//! [`RenderConfig::max_render_passes`]. Setters of *other* instances render
//! them immediately, nested inside the current render.

mod context;
pub mod deps;
pub mod effects;
pub mod error;
mod hooks;
pub mod prelude;
mod runtime;
mod slot;
mod store;


pub use context::is_rendering;
pub use deps::{DepValue, Deps};
pub use effects::{Cleanup, IntoCleanup, on_cleanup};
pub use error::{HookError, HookResult, SlotOccupant, SlotSite, SlotType};
pub use hooks::{
    Setter, use_effect, use_effect_with_key, use_memo, use_memo_with_key, use_state,
    use_state_with_key,
};
pub use runtime::{
    InstanceFlags, InstanceId, InstanceStats, RenderConfig, Unmount, mount, mount_with_config,
};
pub use slot::HookKind;
