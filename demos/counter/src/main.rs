use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use reprise_core::prelude::*;
use reprise_devtools::Inspector;

/// Counter with a keyed "details" panel that can be hidden without losing
/// its state, and an effect that follows the count.
fn app(setters: Rc<RefCell<Option<(Setter<i32>, Setter<bool>)>>>) -> impl Fn() -> HookResult<()> {
    move || {
        let (count, set_count) = use_state(|| 0)?;
        let (show_details, set_show) = use_state(|| true)?;
        let parity = use_memo(
            || if count % 2 == 0 { "even" } else { "odd" },
            deps![count],
        )?;

        use_effect(
            move || {
                log::info!("count is now {count} ({parity})");
                on_cleanup(move || log::info!("leaving count {count}"))
            },
            deps![count],
        )?;

        if show_details {
            let (clicks, _) = use_state_with_key("details.clicks", || count)?;
            use_effect_with_key(
                "details.visible",
                || {
                    log::info!("details shown (first seen at {clicks})");
                    on_cleanup(|| log::info!("details hidden"))
                },
                deps![],
            )?;
        }

        println!("Count: {count} [{parity}]{}", if show_details { " +details" } else { "" });
        *setters.borrow_mut() = Some((set_count, set_show));
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let setters = Rc::new(RefCell::new(None));
    let handle = mount(app(setters.clone())).context("mounting counter")?;
    let mut inspector = Inspector::new();
    inspector.frame(&handle);

    let (set_count, set_show) = setters
        .borrow()
        .clone()
        .context("counter did not render")?;

    set_count.update(|c| c + 1)?;
    set_count.update(|c| c + 1)?;
    set_show.set(false)?;
    set_count.set(2)?; // unchanged, no render
    set_show.set(true)?;
    inspector.frame(&handle);

    let id = handle.id();
    handle.unmount();
    inspector.hud.forget(id);
    Ok(())
}
