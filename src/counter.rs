//! Count-up animation.
//!
//! Elements marked with `data-count-up` animate from zero to their target
//! on a fixed frame interval, writing the floor of the running value each
//! tick and snapping to the exact target at the end. Each tick carries its
//! own running value forward into the next scheduled tick — there is no
//! per-counter state anywhere else.

use crate::config::CounterConfig;
use crate::page::{NodeId, Page};
use crate::timer::{Task, TimerQueue};
use tracing::debug;

const COUNT_ATTR: &str = "data-count-up";
const OWNER: &str = "counter";

/// Schedule the first tick for every counter on the page. Targets that do
/// not parse as integers are skipped. Returns how many animations started.
pub fn start(page: &Page, timers: &mut TimerQueue, config: &CounterConfig) -> usize {
    let frames = (config.duration_ms / config.tick_ms).max(1);
    let mut started = 0;
    for counter in page.with_attr(COUNT_ATTR) {
        let Some(raw) = page.attr(counter, COUNT_ATTR) else {
            continue;
        };
        let Ok(target) = raw.trim().parse::<i64>() else {
            debug!(value = raw, "count-up target does not parse, skipping");
            continue;
        };
        let increment = target as f64 / frames as f64;
        timers.schedule(OWNER, config.tick_ms, Task::CounterTick {
            counter,
            target,
            current: 0.0,
            increment,
        });
        started += 1;
    }
    started
}

/// One animation frame: advance the running value, write it out, and
/// either schedule the next frame or snap to the target and stop.
pub fn tick(
    page: &mut Page,
    timers: &mut TimerQueue,
    tick_ms: u64,
    counter: NodeId,
    target: i64,
    current: f64,
    increment: f64,
) {
    let next = current + increment;
    if next >= target as f64 {
        page.element_mut(counter).text = target.to_string();
    } else {
        page.element_mut(counter).text = (next.floor() as i64).to_string();
        timers.schedule(OWNER, tick_ms, Task::CounterTick {
            counter,
            target,
            current: next,
            increment,
        });
    }
}
