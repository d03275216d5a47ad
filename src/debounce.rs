//! Coalesces bursts of input into a single delayed action.
//!
//! Every [`Model::trigger`] bumps the tag and schedules a [`FireMsg`] after
//! the delay. Only the message carrying the latest tag is accepted by
//! [`Model::update`], so a run of keystrokes produces exactly one firing,
//! `delay` after the last key.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Sent when a scheduled firing comes due.
#[derive(Debug, Clone)]
pub struct FireMsg {
    id: i64,
    tag: i64,
}

/// A debouncer. One per input that should not act on every keystroke.
#[derive(Debug, Clone)]
pub struct Model {
    delay: Duration,
    id: i64,
    tag: i64,
    pending: bool,
}

impl Model {
    /// A debouncer waiting `delay` after the last trigger.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            id: next_id(),
            tag: 0,
            pending: false,
        }
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a firing is scheduled and not yet accepted.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Invalidates any scheduled firing and schedules a new one.
    pub fn trigger(&mut self) -> Cmd {
        self.tag += 1;
        self.pending = true;
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.delay, move |_| Box::new(FireMsg { id, tag }) as Msg)
    }

    /// Drops whatever is scheduled without firing.
    pub fn cancel(&mut self) {
        self.tag += 1;
        self.pending = false;
    }

    /// The message the most recent trigger will deliver.
    pub fn pending_msg(&self) -> FireMsg {
        FireMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Returns true when `msg` is the live firing of this debouncer.
    pub fn update(&mut self, msg: &Msg) -> bool {
        match msg.downcast_ref::<FireMsg>() {
            Some(fire) if fire.id == self.id && fire.tag == self.tag && self.pending => {
                self.pending = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_trigger_fires() {
        let mut d = Model::new(Duration::from_millis(300));
        let _ = d.trigger();
        let first: Msg = Box::new(d.pending_msg());
        let _ = d.trigger();
        let _ = d.trigger();
        let last: Msg = Box::new(d.pending_msg());

        assert!(!d.update(&first));
        assert!(d.update(&last));
        // a duplicate delivery does not fire twice
        assert!(!d.update(&last));
    }

    #[test]
    fn test_cancel_suppresses_firing() {
        let mut d = Model::new(Duration::from_millis(300));
        let _ = d.trigger();
        let msg: Msg = Box::new(d.pending_msg());
        d.cancel();
        assert!(!d.update(&msg));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_other_debouncer_ignored() {
        let mut a = Model::new(Duration::from_millis(1));
        let mut b = Model::new(Duration::from_millis(1));
        let _ = a.trigger();
        let _ = b.trigger();
        let from_b: Msg = Box::new(b.pending_msg());
        assert!(!a.update(&from_b));
    }

    #[tokio::test]
    async fn test_trigger_delivers_fire_msg() {
        let mut d = Model::new(Duration::from_millis(5));
        let cmd = d.trigger();
        let msg = cmd.await.expect("tick produces a message");
        assert!(d.update(&msg));
    }
}
