use serde::{Deserialize, Serialize};

use crate::{Error, MotionResult};

/// The default number of frames in the rolling history. The background is the per-pixel median of
/// this many frames, so anything that stays still for more than half of them becomes background.
///
/// Reccomended range: 3-15. Larger windows cost memory (one full frame per entry) and time.
pub const DEFAULT_HISTORY_LEN: usize = 5;

/// The default minimum size of a connected component, in pixels. Smaller components are treated
/// as noise and never reach clustering.
pub const DEFAULT_MIN_AREA: u32 = 100;

/// The default difference (in luma levels) between a frame and the background above which a pixel
/// is considered foreground.
pub const DEFAULT_THRESHOLD: u8 = 25;

/// The default side length, in pixels, of the structuring element used to close small gaps in the
/// foreground mask. Must be odd.
pub const DEFAULT_KERNEL_SIZE: u8 = 5;

/// The default gap, in pixels, within which two bounding boxes are merged. At 0 only boxes that
/// touch or overlap are merged.
pub const DEFAULT_MERGE_DISTANCE: u32 = 0;

/// Shape of the structuring element used when closing the foreground mask.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelShape {
    /// A disc (euclidean distance).
    #[default]
    Ellipse,
    /// A filled square (chessboard distance).
    Rect,
    /// A diamond (manhattan distance). A 3x3 diamond is a cross.
    Cross,
}

/// How foreground components are grouped into clusters.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// A single pass over the components in label order. Each component is merged into every
    /// existing cluster that it is near. Depends on visiting order.
    #[default]
    Sweep,
    /// Every pair of nearby components is joined, and each resulting group becomes one cluster.
    /// Independent of visiting order.
    TransitiveClosure,
}

/// How a frame is compared against the background.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceMode {
    /// `|background - frame|`. Reacts to objects both lighter and darker than the scene.
    #[default]
    Absolute,
    /// `background - frame`, saturating at zero. Only reacts to objects darker than the scene.
    Directional,
}

/// Tunable parameters for motion detection. Every field has a default, so a partial JSON document
/// is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Number of frames in the rolling history.
    pub history_len: usize,

    /// Components smaller than this (in pixels) are discarded as noise.
    pub min_area: u32,

    /// Luma differences strictly greater than this are foreground.
    pub threshold: u8,

    /// Shape of the closing structuring element.
    pub kernel_shape: KernelShape,

    /// Side length of the closing structuring element. Must be odd. 1 disables closing.
    pub kernel_size: u8,

    /// Maximum gap between two boxes, in pixels on each axis, for them to be merged.
    pub merge_distance: u32,

    /// How components are grouped into clusters.
    pub merge_strategy: MergeStrategy,

    /// How frames are compared against the background.
    pub difference: DifferenceMode,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            history_len: DEFAULT_HISTORY_LEN,
            min_area: DEFAULT_MIN_AREA,
            threshold: DEFAULT_THRESHOLD,
            kernel_shape: KernelShape::default(),
            kernel_size: DEFAULT_KERNEL_SIZE,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            merge_strategy: MergeStrategy::default(),
            difference: DifferenceMode::default(),
        }
    }
}

impl DetectorOptions {
    /// Check that the options describe a pipeline that can actually be built.
    pub fn validate(&self) -> MotionResult<()> {
        if self.history_len == 0 {
            return Err(Error::InvalidOption(
                "history length must be at least 1".to_string(),
            ));
        }

        if self.kernel_size % 2 == 0 {
            return Err(Error::InvalidOption(format!(
                "kernel size must be odd, got {}",
                self.kernel_size
            )));
        }

        Ok(())
    }

    //the morphology functions take a radius rather than a side length.
    pub(crate) fn kernel_radius(&self) -> u8 {
        self.kernel_size / 2
    }
}
