//! Character-by-character reveal of assistant replies.
//!
//! A [`Reveal`] yields progressively longer prefixes of a reply and finishes
//! with a final frame holding the full text. It does no timing itself: the
//! caller waits on a [`Ticker`] between frames, so tests can step a reveal
//! without wall-clock delays.

use std::time::Duration;

/// Characters added per frame unless configured otherwise.
pub const DEFAULT_REVEAL_STEP: usize = 2;

/// Delay between frames unless configured otherwise.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(50);

/// One step of a reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    /// The prefix of the text shown by this frame.
    pub visible: String,
    /// True for the last frame, which always shows the full text.
    pub is_final: bool,
}

/// A cancellable sequence of reveal frames.
///
/// For a text of `n` characters and step `s`, the partial frames show the
/// first `1`, `1 + s`, `1 + 2s`, ... characters (each shorter than `n`),
/// followed by one final frame with the full text.
#[derive(Debug, Clone)]
pub struct Reveal {
    chars: Vec<char>,
    position: usize,
    step: usize,
    cancelled: bool,
    finished: bool,
}

impl Reveal {
    /// Create a reveal over `text` advancing `step` characters per frame.
    ///
    /// A step of zero is treated as one.
    pub fn new(text: &str, step: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
            step: step.max(1),
            cancelled: false,
            finished: false,
        }
    }

    /// Skip the remaining partial frames; the next frame is the final one.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns true once the final frame has been produced.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn full_text(&self) -> String {
        self.chars.iter().collect()
    }
}

impl Iterator for Reveal {
    type Item = RevealFrame;

    fn next(&mut self) -> Option<RevealFrame> {
        if self.finished {
            return None;
        }
        let shown = self.position + 1;
        if !self.cancelled && shown < self.chars.len() {
            self.position += self.step;
            return Some(RevealFrame {
                visible: self.chars[..shown].iter().collect(),
                is_final: false,
            });
        }
        self.finished = true;
        Some(RevealFrame {
            visible: self.full_text(),
            is_final: true,
        })
    }
}

/// Paces a reveal.
#[async_trait::async_trait]
pub trait Ticker: Send {
    /// Wait until the next frame is due.
    async fn tick(&mut self);
}

/// Ticker that sleeps a fixed interval on the tokio timer.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    interval: Duration,
}

impl IntervalTicker {
    /// Create a ticker with the given frame interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}

#[async_trait::async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        tokio::time::sleep(self.interval).await;
    }
}

/// Ticker that never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait::async_trait]
impl Ticker for NoDelay {
    async fn tick(&mut self) {}
}
