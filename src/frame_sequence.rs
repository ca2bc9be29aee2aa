use serde::{Deserialize, Serialize};

/// What to do when a [`FrameSequence`] reaches the end of its source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replay {
    /// Stop at the end.
    #[default]
    Once,
    /// Start again from the first item.
    Forever,
}

/// Wraps a source of frames (or of anything that produces frames, such as a list of paths) and
/// optionally replays it from the start when it runs out.
///
/// Every pass starts from a fresh clone of the source as it was when the sequence was created. A
/// source that produces nothing is never replayed, so an empty `Forever` sequence ends immediately.
#[derive(Debug, Clone)]
pub struct FrameSequence<I> {
    source: I,
    current: I,
    replay: Replay,
    limit: Option<u64>,
    yielded: u64,
    yielded_this_pass: bool,
    passes: u64,
}

impl<I> FrameSequence<I>
where
    I: Iterator + Clone,
{
    pub fn new(source: I, replay: Replay) -> Self {
        Self {
            current: source.clone(),
            source,
            replay,
            limit: None,
            yielded: 0,
            yielded_this_pass: false,
            passes: 1,
        }
    }

    /// Stop after `limit` items in total, across all passes.
    #[must_use]
    pub fn with_limit(self, limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    /// Number of passes over the source that have been started.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl<I> Iterator for FrameSequence<I>
where
    I: Iterator + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }

        let item = match self.current.next() {
            Some(item) => item,
            None if self.replay == Replay::Forever && self.yielded_this_pass => {
                self.current = self.source.clone();
                self.passes += 1;
                self.yielded_this_pass = false;
                self.current.next()?
            }
            None => return None,
        };

        self.yielded += 1;
        self.yielded_this_pass = true;
        Some(item)
    }
}
