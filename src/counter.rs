//! Summary counters that count up from zero to their value.
//!
//! The animation is a fixed number of timer ticks spread over the configured
//! duration. Every tick adds an equal increment, and the final tick assigns
//! the target itself, so accumulated floating-point error can never leave the
//! display one cent or one unit off.

use crate::entity::Stat;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// One animation step for the counter with the matching id and tag.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

/// An animated numeric counter with a label.
#[derive(Debug, Clone)]
pub struct Model {
    /// Text after the number.
    pub label: String,
    /// Digits after the decimal point. Zero shows whole units, rounded down while counting.
    pub decimals: usize,
    /// Prepended to the number, e.g. `$`.
    pub prefix: String,
    target: f64,
    shown: f64,
    increment: f64,
    ticks_left: u32,
    interval: Duration,
    id: i64,
    tag: i64,
    /// Style of the number.
    pub value_style: Style,
    /// Style of the label.
    pub label_style: Style,
}

impl Model {
    /// A counter showing zero.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            decimals: 0,
            prefix: String::new(),
            target: 0.0,
            shown: 0.0,
            increment: 0.0,
            ticks_left: 0,
            interval: Duration::from_millis(50),
            id: next_id(),
            tag: 0,
            value_style: Style::new().bold(true).foreground(Color::from("#04B575")),
            label_style: Style::new().foreground(Color::from("#909090")),
        }
    }

    /// A counter labelled and formatted after `stat`, not yet animating.
    pub fn from_stat(stat: &Stat) -> Self {
        let mut counter = Self::new(stat.label);
        counter.decimals = stat.decimals;
        counter.prefix = stat.prefix.to_string();
        counter.target = stat.value;
        counter.shown = stat.value;
        counter
    }

    /// The value the counter is heading for.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// The value currently displayed.
    pub fn shown(&self) -> f64 {
        self.shown
    }

    /// True until the final frame has been applied.
    pub fn is_animating(&self) -> bool {
        self.ticks_left > 0
    }

    /// Restarts the animation from zero towards `target` over `duration`,
    /// one increment every `interval`.
    pub fn animate_to(&mut self, target: f64, duration: Duration, interval: Duration) -> Cmd {
        let interval = interval.max(Duration::from_millis(1));
        let ticks = (duration.as_millis() / interval.as_millis()).max(1);

        self.target = target;
        self.shown = 0.0;
        self.ticks_left = u32::try_from(ticks).unwrap_or(u32::MAX);
        self.increment = target / f64::from(self.ticks_left);
        self.interval = interval;
        self.tag += 1;
        self.next_frame()
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    /// The message that performs this counter's next step.
    pub fn frame_msg(&self) -> FrameMsg {
        FrameMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Applies a [`FrameMsg`] addressed to this counter and schedules the next
    /// one. Frames for other counters, or from an earlier animation, are ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let frame = msg.downcast_ref::<FrameMsg>()?;
        if frame.id != self.id || frame.tag != self.tag || !self.is_animating() {
            return None;
        }

        self.ticks_left -= 1;
        if self.ticks_left == 0 {
            self.shown = self.target;
            return None;
        }

        self.shown += self.increment;
        // never run past the target before the last tick
        if (self.increment >= 0.0 && self.shown > self.target)
            || (self.increment < 0.0 && self.shown < self.target)
        {
            self.shown = self.target;
        }
        Some(self.next_frame())
    }

    /// The displayed value formatted with the counter's prefix and decimals.
    pub fn value_text(&self) -> String {
        let value = if self.decimals == 0 {
            self.shown.floor()
        } else {
            self.shown
        };
        format!("{}{:.*}", self.prefix, self.decimals, value)
    }

    /// Renders `value label`.
    pub fn view(&self) -> String {
        format!(
            "{} {}",
            self.value_style.render(&self.value_text()),
            self.label_style.render(&self.label)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(counter: &mut Model) -> usize {
        let mut steps = 0;
        while counter.is_animating() {
            let msg: Msg = Box::new(counter.frame_msg());
            counter.update(&msg);
            steps += 1;
            assert!(steps < 10_000, "animation did not terminate");
        }
        steps
    }

    #[test]
    fn test_ends_exactly_on_target() {
        for target in [0.0, 1.0, 7.0, 0.3, 1234.56, 99_999.99, 1e-3] {
            let mut counter = Model::new("x");
            let _cmd = counter.animate_to(
                target,
                Duration::from_millis(1000),
                Duration::from_millis(30),
            );
            let steps = run_to_end(&mut counter);
            assert_eq!(steps, 33);
            assert_eq!(counter.shown(), target);
        }
    }

    #[test]
    fn test_never_overshoots() {
        let mut counter = Model::new("x");
        let _cmd = counter.animate_to(10.0, Duration::from_millis(70), Duration::from_millis(10));
        while counter.is_animating() {
            let msg: Msg = Box::new(counter.frame_msg());
            counter.update(&msg);
            assert!(counter.shown() <= 10.0);
        }
        assert_eq!(counter.shown(), 10.0);
    }

    #[test]
    fn test_duration_shorter_than_interval_is_single_tick() {
        let mut counter = Model::new("x");
        let _cmd = counter.animate_to(5.0, Duration::from_millis(1), Duration::from_millis(50));
        assert_eq!(run_to_end(&mut counter), 1);
        assert_eq!(counter.shown(), 5.0);
    }

    #[test]
    fn test_restart_drops_old_frames() {
        let mut counter = Model::new("x");
        let _cmd = counter.animate_to(10.0, Duration::from_millis(100), Duration::from_millis(10));
        let stale: Msg = Box::new(counter.frame_msg());
        let _cmd = counter.animate_to(20.0, Duration::from_millis(100), Duration::from_millis(10));
        assert!(counter.update(&stale).is_none());
        assert_eq!(counter.shown(), 0.0);
    }

    #[test]
    fn test_value_text_formats_money() {
        let counter = Model::from_stat(&Stat::money("Revenue", 1234.5));
        assert_eq!(counter.value_text(), "$1234.50");
        let count = Model::from_stat(&Stat::count("Users", 42));
        assert_eq!(count.value_text(), "42");
    }
}
