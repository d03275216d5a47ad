//! Animated loading indicator shown while a fetch is in flight.
//!
//! Each spinner has a unique id so several can run side by side, and a tag
//! that is bumped on every frame: a tick carrying an old tag is dropped,
//! which keeps a spinner from speeding up when extra ticks are scheduled.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Animation frames and the delay between them.
#[derive(Debug, Clone)]
pub struct Spinner {
    /// Frames, shown in order.
    pub frames: Vec<String>,
    /// Delay between frames.
    pub fps: Duration,
}

/// `|/-\` line spinner.
pub static LINE: Lazy<Spinner> = Lazy::new(|| Spinner {
    frames: ["|", "/", "-", "\\"].iter().map(|s| s.to_string()).collect(),
    fps: Duration::from_millis(100),
});

/// Braille dot spinner. The default.
pub static DOT: Lazy<Spinner> = Lazy::new(|| Spinner {
    frames: ["⣾ ", "⣽ ", "⣻ ", "⢿ ", "⡿ ", "⣟ ", "⣯ ", "⣷ "]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    fps: Duration::from_millis(100),
});

/// Advances the spinner with the matching id and tag.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The spinner this tick is for.
    pub id: i64,
    tag: i64,
}

/// A spinner.
#[derive(Debug, Clone)]
pub struct Model {
    /// Frames and speed.
    pub spinner: Spinner,
    /// Frame style.
    pub style: Style,
    frame: usize,
    id: i64,
    tag: i64,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// A [`DOT`] spinner.
    pub fn new() -> Self {
        Self {
            spinner: DOT.clone(),
            style: Style::new().foreground(Color::from("205")),
            frame: 0,
            id: next_id(),
            tag: 0,
        }
    }

    /// Replaces the frames and restarts from the first.
    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self.frame = 0;
        self
    }

    /// Unique id of this spinner.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The message that advances this spinner by one frame.
    pub fn tick_msg(&self) -> TickMsg {
        TickMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Schedules the next frame.
    pub fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.spinner.fps, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    /// Advances on a tick addressed to this spinner and schedules the next
    /// one. Other messages are ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<TickMsg>()?;
        if tick.id != self.id || tick.tag != self.tag {
            return None;
        }

        self.frame = (self.frame + 1) % self.spinner.frames.len().max(1);
        self.tag += 1;
        Some(self.tick())
    }

    /// The current frame.
    pub fn view(&self) -> String {
        match self.spinner.frames.get(self.frame) {
            Some(frame) => self.style.render(frame),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        assert_ne!(Model::new().id(), Model::new().id());
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut s = Model::new().with_spinner(LINE.clone());
        assert_eq!(strip_ansi_escapes::strip_str(s.view()), "|");
        let msg: Msg = Box::new(s.tick_msg());
        assert!(s.update(&msg).is_some());
        assert_eq!(strip_ansi_escapes::strip_str(s.view()), "/");
    }

    #[test]
    fn test_stale_tag_is_dropped() {
        let mut s = Model::new().with_spinner(LINE.clone());
        let first: Msg = Box::new(s.tick_msg());
        let duplicate: Msg = Box::new(s.tick_msg());
        assert!(s.update(&first).is_some());
        assert!(s.update(&duplicate).is_none());
    }

    #[test]
    fn test_foreign_tick_is_ignored() {
        let mut a = Model::new();
        let b = Model::new();
        let msg: Msg = Box::new(b.tick_msg());
        assert!(a.update(&msg).is_none());
    }
}
