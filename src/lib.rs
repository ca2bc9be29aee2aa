#![allow(clippy::let_and_return)]
#![allow(clippy::len_without_is_empty)]
#![warn(clippy::cast_lossless)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::todo)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::unimplemented)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![allow(clippy::doc_markdown)]

//! # Overview
//! `motion_regions_lib` finds moving objects in a sequence of still frames (for example a directory
//! of images captured from a fixed camera) and reports them as bounding boxes.
//!
//! # High Level API
//! Create a [`MotionPipeline`] and feed it frames in order. Once enough frames have been seen to
//! build a background, every frame produces a [`FrameRegions`] describing where motion was found.
//! ```rust
//! use image::{GrayImage, Luma};
//! use motion_regions_lib::{DetectorOptions, FrameOutcome, MotionPipeline};
//!
//! let options = DetectorOptions::default();
//! let mut pipeline = MotionPipeline::<Luma<u8>>::new(options).unwrap();
//!
//! // A static, empty scene...
//! let blank = GrayImage::new(64, 64);
//! for _ in 0..options.history_len {
//!     pipeline.process_frame(&blank).unwrap();
//! }
//!
//! // ...and then something appears.
//! let mut moved = blank.clone();
//! for x in 20..40 {
//!     for y in 20..40 {
//!         moved.put_pixel(x, y, Luma([255]));
//!     }
//! }
//!
//! let FrameOutcome::Regions(regions) = pipeline.process_frame(&moved).unwrap() else {
//!     panic!("the background should be ready by now");
//! };
//! assert_eq!(regions.clusters.len(), 1);
//! ```
//!
//! To process a whole sequence at once, pass any iterator of frames to [`MotionPipeline::run`]
//! along with a [`RegionSink`] to receive the results. Wrap the iterator in a [`FrameSequence`] to
//! replay it from the start when it runs out.
//!
//! # How it works
//! The library keeps the last N frames (5 by default) and builds a synthetic background from them
//! by taking the median of every pixel across the window. Objects that pass through the scene occupy
//! any given pixel for only a few frames, so the median "sees through" them.
//!
//! Each new frame is compared against that background. Pixels that differ by more than a threshold
//! are marked as foreground, and a morphological close joins nearby specks of foreground that belong
//! to the same object. The mask is split into connected components, components that are too small
//! to be anything but noise are thrown away, and the rest are clustered: any component whose
//! bounding box is within a set distance of an existing cluster is merged into it.
//!
//! ## Clustering
//! Two strategies are available through [`MergeStrategy`]:
//! * [`MergeStrategy::Sweep`] visits components once in label order and merges each into every
//!   cluster it is near. It is cheap but depends on visiting order: a box that grows after being
//!   merged is not re-checked against clusters it was not near before.
//! * [`MergeStrategy::TransitiveClosure`] joins every pair of nearby components and takes the
//!   bounding box of each group. The result does not depend on order.
//!
//! # Limitations
//! Anything that stays still for more than half of the history window becomes part of the
//! background. The camera is assumed to be fixed: panning or a change in exposure will light up
//! the entire frame.

mod definitions;
mod frame_sequence;
mod motion;
mod rect;

pub use definitions::{
    DetectorOptions, DifferenceMode, KernelShape, MergeStrategy, DEFAULT_HISTORY_LEN,
    DEFAULT_KERNEL_SIZE, DEFAULT_MERGE_DISTANCE, DEFAULT_MIN_AREA, DEFAULT_THRESHOLD,
};
pub use frame_sequence::{FrameSequence, Replay};
pub use motion::{
    background::median_composite,
    cluster::{Cluster, RegionClusterer},
    foreground::ForegroundExtractor,
    history::HistoryBuffer,
    labelling::{component_mask, label_components, Component},
    pipeline::{FrameOutcome, FrameRegions, MotionPipeline, RunStats},
    sink::{CollectSink, NullSink, RegionSink},
    Error, Frame,
};
pub use rect::Rect;

pub type MotionResult<T> = Result<T, crate::Error>;
