use std::collections::{vec_deque, VecDeque};

use image::Pixel;

use super::{background::median_composite, Error, Frame};
use crate::MotionResult;

/// A rolling window over the most recent frames of a sequence. Holds at most `capacity` frames;
/// pushing onto a full window evicts the oldest frame.
///
/// The window owns a copy of every frame it holds, so callers are free to reuse their decode
/// buffers between frames.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<P: Pixel<Subpixel = u8>> {
    frames: VecDeque<Frame<P>>,
    capacity: usize,
}

impl<P: Pixel<Subpixel = u8>> HistoryBuffer<P> {
    pub fn new(capacity: usize) -> MotionResult<Self> {
        if capacity == 0 {
            return Err(Error::InvalidOption(
                "history length must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            frames: VecDeque::with_capacity(capacity + 1),
            capacity,
        })
    }

    /// Append a copy of `frame`. If the window was already full, the oldest frame is removed and
    /// returned.
    ///
    /// Fails without modifying the window if `frame` is not the same size as the frames already
    /// held.
    pub fn push(&mut self, frame: &Frame<P>) -> MotionResult<Option<Frame<P>>> {
        if let Some(expected) = self.dimensions() {
            if frame.dimensions() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: frame.dimensions(),
                });
            }
        }

        self.frames.push_back(frame.clone());

        let evicted = if self.frames.len() > self.capacity {
            self.frames.pop_front()
        } else {
            None
        };

        Ok(evicted)
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Dimensions of the frames in the window, or None if it is empty.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.front().map(|f| f.dimensions())
    }

    /// The frames in the window, oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, Frame<P>> {
        self.frames.iter()
    }

    /// The per-pixel median of every frame in the window. See [`median_composite`].
    pub fn median(&self) -> MotionResult<Frame<P>> {
        median_composite(self.iter())
    }
}
