pub mod background;
pub mod cluster;
mod disjoint_set;
pub mod foreground;
pub mod history;
pub mod labelling;
pub mod pipeline;
pub mod sink;

#[cfg(test)]
mod test;

use image::ImageBuffer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single frame of the sequence. Any 8-bit pixel type can be used (e.g. [`image::Luma<u8>`] or
/// [`image::Rgb<u8>`]), but every frame of a sequence must share the same type and dimensions.
pub type Frame<P> = ImageBuffer<P, Vec<u8>>;

/// An error that prevented a frame from being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    /// There were no frames to process.
    #[error("No frames to process")]
    EmptyInput,

    /// A frame's dimensions differ from the frames that came before it.
    #[error("Frame dimensions {actual:?} do not match the sequence dimensions {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A frame and the background it is being compared against differ in size.
    #[error("Frame dimensions {current:?} do not match the background dimensions {background:?}")]
    ShapeMismatch {
        current: (u32, u32),
        background: (u32, u32),
    },

    /// A background was requested before any frames were available to build it from.
    #[error("Cannot build a background from an empty history")]
    EmptyHistory,

    /// The options given to the detector cannot be used.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}
