use image::{GrayImage, Pixel};
use log::{debug, info, trace, warn};

use super::{
    cluster::{Cluster, RegionClusterer},
    foreground::ForegroundExtractor,
    history::HistoryBuffer,
    labelling::{component_mask, label_components, Component},
    sink::RegionSink,
    Error, Frame,
};
use crate::{definitions::DetectorOptions, MotionResult};

/// Everything found in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRegions {
    /// Position of the frame among the frames accepted by the pipeline, starting at 0. Frames that
    /// were rejected do not count.
    pub frame_index: u64,

    /// Components that were large enough to be clustered, in label order.
    pub components: Vec<Component>,

    /// The merged boxes.
    pub clusters: Vec<Cluster>,

    /// Binary mask of the pixels of every component in `components`.
    pub foreground: GrayImage,
}

/// The result of feeding one frame to a [`MotionPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Not enough frames have been seen to build a background yet. Nothing was detected.
    Warmup { frames_seen: usize, needed: usize },

    /// Detection ran against the background.
    Regions(FrameRegions),
}

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Every frame the input produced, including skipped ones.
    pub frames_read: u64,

    /// Frames rejected because they did not match the size of the run.
    pub frames_skipped: u64,

    /// Frames in which at least one cluster was found.
    pub frames_with_regions: u64,

    pub total_clusters: u64,
}

/// Detects motion in a sequence of frames. Feed frames in order with
/// [`MotionPipeline::process_frame`], or hand over a whole sequence with [`MotionPipeline::run`].
///
/// The first frame fixes the dimensions for the life of the pipeline.
#[derive(Debug, Clone)]
pub struct MotionPipeline<P: Pixel<Subpixel = u8>> {
    options: DetectorOptions,
    history: HistoryBuffer<P>,
    background: Option<Frame<P>>,
    extractor: ForegroundExtractor,
    clusterer: RegionClusterer,
    frames_processed: u64,
}

impl<P: Pixel<Subpixel = u8>> MotionPipeline<P> {
    pub fn new(options: DetectorOptions) -> MotionResult<Self> {
        options.validate()?;

        Ok(Self {
            options,
            history: HistoryBuffer::new(options.history_len)?,
            background: None,
            extractor: ForegroundExtractor::from_options(&options),
            clusterer: RegionClusterer::from_options(&options),
            frames_processed: 0,
        })
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    pub fn history(&self) -> &HistoryBuffer<P> {
        &self.history
    }

    /// The current background, once the history has filled.
    pub fn background(&self) -> Option<&Frame<P>> {
        self.background.as_ref()
    }

    /// Number of frames accepted so far.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Process the next frame of the sequence.
    ///
    /// If a background is available the frame is compared against it. The frame is then added to
    /// the history, and once the history is full the background is rebuilt from it, so the first
    /// detection happens on the frame after the history fills.
    ///
    /// A frame whose dimensions differ from the first frame is rejected with
    /// [`Error::DimensionMismatch`] and leaves the pipeline unchanged.
    pub fn process_frame(&mut self, frame: &Frame<P>) -> MotionResult<FrameOutcome> {
        if let Some(expected) = self.history.dimensions() {
            if frame.dimensions() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: frame.dimensions(),
                });
            }
        }

        let regions = match &self.background {
            Some(background) => Some(self.detect(frame, background)?),
            None => None,
        };

        if self.history.push(frame)?.is_some() {
            trace!("Evicted oldest frame from history");
        }
        if self.history.is_full() {
            self.background = Some(self.history.median()?);
        }
        self.frames_processed += 1;

        let outcome = match regions {
            Some(regions) => FrameOutcome::Regions(regions),
            None => {
                trace!(
                    "Warming up: {}/{} frames",
                    self.history.len(),
                    self.history.capacity()
                );
                FrameOutcome::Warmup {
                    frames_seen: self.history.len(),
                    needed: self.history.capacity(),
                }
            }
        };

        Ok(outcome)
    }

    fn detect(&self, frame: &Frame<P>, background: &Frame<P>) -> MotionResult<FrameRegions> {
        let frame_index = self.frames_processed;

        let mask = self.extractor.extract(frame, background)?;
        let (labels, all_components) = label_components(&mask);

        let components = all_components
            .into_iter()
            .filter(|c| !self.clusterer.is_noise(c))
            .collect::<Vec<_>>();

        let clusters = self.clusterer.cluster(components.iter().copied());
        let foreground = component_mask(&labels, components.iter().map(|c| c.label));

        debug!(
            "Frame {frame_index}: {} components, {} clusters",
            components.len(),
            clusters.len()
        );
        for cluster in &clusters {
            trace!(
                "Frame {frame_index}: cluster {:?} from labels {:?}",
                cluster.rect,
                cluster.labels
            );
        }

        Ok(FrameRegions {
            frame_index,
            components,
            clusters,
            foreground,
        })
    }

    /// Process every frame of `frames` in order, passing the regions found in each to `sink`.
    ///
    /// Frames that do not match the size of the run are skipped with a warning. The run ends early
    /// if the sink asks to stop. Fails with [`Error::EmptyInput`] if `frames` yields nothing.
    pub fn run<I, S>(&mut self, frames: I, sink: &mut S) -> MotionResult<RunStats>
    where
        I: IntoIterator<Item = Frame<P>>,
        S: RegionSink<P> + ?Sized,
    {
        let mut stats = RunStats::default();

        for frame in frames {
            stats.frames_read += 1;

            match self.process_frame(&frame) {
                Ok(FrameOutcome::Warmup { .. }) => (),
                Ok(FrameOutcome::Regions(regions)) => {
                    if !regions.clusters.is_empty() {
                        stats.frames_with_regions += 1;
                    }
                    stats.total_clusters += regions.clusters.len() as u64;
                    sink.accept(&frame, &regions);
                }
                Err(e @ Error::DimensionMismatch { .. }) => {
                    warn!("Skipping frame {}: {e}", stats.frames_read - 1);
                    stats.frames_skipped += 1;
                }
                Err(e) => return Err(e),
            }

            if sink.should_stop() {
                debug!("Sink requested stop after {} frames", stats.frames_read);
                break;
            }
        }

        if stats.frames_read == 0 {
            return Err(Error::EmptyInput);
        }

        info!(
            "Read {} frames ({} skipped). Found {} clusters in {} frames",
            stats.frames_read,
            stats.frames_skipped,
            stats.total_clusters,
            stats.frames_with_regions
        );

        Ok(stats)
    }
}
