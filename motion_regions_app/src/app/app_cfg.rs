use std::path::PathBuf;

use motion_regions_lib::{DetectorOptions, DifferenceMode, KernelShape, MergeStrategy, Replay};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportVerbosity {
    Quiet,
    Default,
    Verbose,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    Normal,
    Json,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) enum KernelShapeArg {
    Ellipse,
    Rect,
    Cross,
}

impl From<KernelShapeArg> for KernelShape {
    fn from(arg: KernelShapeArg) -> Self {
        match arg {
            KernelShapeArg::Ellipse => Self::Ellipse,
            KernelShapeArg::Rect => Self::Rect,
            KernelShapeArg::Cross => Self::Cross,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) enum MergeStrategyArg {
    Sweep,
    TransitiveClosure,
}

impl From<MergeStrategyArg> for MergeStrategy {
    fn from(arg: MergeStrategyArg) -> Self {
        match arg {
            MergeStrategyArg::Sweep => Self::Sweep,
            MergeStrategyArg::TransitiveClosure => Self::TransitiveClosure,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) enum DifferenceArg {
    Absolute,
    Directional,
}

impl From<DifferenceArg> for DifferenceMode {
    fn from(arg: DifferenceArg) -> Self {
        match arg {
            DifferenceArg::Absolute => Self::Absolute,
            DifferenceArg::Directional => Self::Directional,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputCfg {
    pub frames_dir: PathBuf,
    pub replay: Replay,
    pub max_frames: Option<u64>,
}

// Detector options given explicitly on the command line. Each one that is present replaces the
// value from the config file (or the default).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub history_len: Option<usize>,
    pub min_area: Option<u32>,
    pub threshold: Option<u8>,
    pub kernel_shape: Option<KernelShape>,
    pub kernel_size: Option<u8>,
    pub merge_distance: Option<u32>,
    pub merge_strategy: Option<MergeStrategy>,
    pub difference: Option<DifferenceMode>,
}

impl OptionOverrides {
    pub fn apply(&self, base: DetectorOptions) -> DetectorOptions {
        DetectorOptions {
            history_len: self.history_len.unwrap_or(base.history_len),
            min_area: self.min_area.unwrap_or(base.min_area),
            threshold: self.threshold.unwrap_or(base.threshold),
            kernel_shape: self.kernel_shape.unwrap_or(base.kernel_shape),
            kernel_size: self.kernel_size.unwrap_or(base.kernel_size),
            merge_distance: self.merge_distance.unwrap_or(base.merge_distance),
            merge_strategy: self.merge_strategy.unwrap_or(base.merge_strategy),
            difference: self.difference.unwrap_or(base.difference),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorCfg {
    pub config_file: Option<PathBuf>,
    pub overrides: OptionOverrides,
}

#[derive(Debug, Clone)]
pub struct OutputCfg {
    pub format: OutputFormat,
    pub verbosity: ReportVerbosity,
}

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub input_cfg: InputCfg,
    pub detector_cfg: DetectorCfg,
    pub output_cfg: OutputCfg,
}
