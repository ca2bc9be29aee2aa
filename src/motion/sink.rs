use image::Pixel;

use super::{pipeline::FrameRegions, Frame};

/// Receives the regions found in each frame of a run. See [`crate::MotionPipeline::run`].
pub trait RegionSink<P: Pixel<Subpixel = u8>> {
    /// Called once for every frame in which detection ran (i.e. every frame after warmup), with
    /// the frame itself and what was found in it.
    fn accept(&mut self, frame: &Frame<P>, regions: &FrameRegions);

    /// Checked after every frame. Returning true ends the run early.
    fn should_stop(&self) -> bool {
        false
    }
}

/// Discards everything it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<P: Pixel<Subpixel = u8>> RegionSink<P> for NullSink {
    fn accept(&mut self, _frame: &Frame<P>, _regions: &FrameRegions) {}
}

/// Keeps the regions of every frame, optionally asking the run to stop once it has seen enough.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    pub regions: Vec<FrameRegions>,
    pub stop_after: Option<usize>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_after(stop_after: usize) -> Self {
        Self {
            regions: vec![],
            stop_after: Some(stop_after),
        }
    }
}

impl<P: Pixel<Subpixel = u8>> RegionSink<P> for CollectSink {
    fn accept(&mut self, _frame: &Frame<P>, regions: &FrameRegions) {
        self.regions.push(regions.clone());
    }

    fn should_stop(&self) -> bool {
        self.stop_after
            .is_some_and(|stop_after| self.regions.len() >= stop_after)
    }
}
