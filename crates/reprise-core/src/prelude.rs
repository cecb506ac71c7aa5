pub use crate::deps;
pub use crate::deps::Deps;
pub use crate::effects::{Cleanup, on_cleanup};
pub use crate::error::{HookError, HookResult};
pub use crate::hooks::{
    Setter, use_effect, use_effect_with_key, use_memo, use_memo_with_key, use_state,
    use_state_with_key,
};
pub use crate::runtime::{RenderConfig, Unmount, mount, mount_with_config};
