use image::{GrayImage, Luma, Pixel};
use imageproc::{
    contrast::{threshold_mut, ThresholdType},
    distance_transform::Norm,
    morphology::close,
};

use super::{Error, Frame};
use crate::{
    definitions::{DetectorOptions, DifferenceMode, KernelShape},
    MotionResult,
};

/// Turns a frame and a background into a binary mask of the pixels that have changed. Foreground
/// pixels are 255 and everything else is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForegroundExtractor {
    threshold: u8,
    difference: DifferenceMode,
    kernel_shape: KernelShape,
    kernel_radius: u8,
}

impl ForegroundExtractor {
    pub fn from_options(options: &DetectorOptions) -> Self {
        Self {
            threshold: options.threshold,
            difference: options.difference,
            kernel_shape: options.kernel_shape,
            kernel_radius: options.kernel_radius(),
        }
    }

    /// Difference `current` against `background`, reduce to luma, threshold, then close small gaps
    /// with the configured structuring element.
    pub fn extract<P>(&self, current: &Frame<P>, background: &Frame<P>) -> MotionResult<GrayImage>
    where
        P: Pixel<Subpixel = u8>,
    {
        if current.dimensions() != background.dimensions() {
            return Err(Error::ShapeMismatch {
                current: current.dimensions(),
                background: background.dimensions(),
            });
        }

        let (width, height) = current.dimensions();
        let mut mask = GrayImage::new(width, height);

        let diff_fn: fn(u8, u8) -> u8 = match self.difference {
            DifferenceMode::Absolute => |bg, cur| bg.abs_diff(cur),
            DifferenceMode::Directional => |bg, cur| bg.saturating_sub(cur),
        };

        for (&mut Luma([ref mut mask_pix]), (bg_pix, cur_pix)) in mask
            .pixels_mut()
            .zip(background.pixels().zip(current.pixels()))
        {
            let Luma([diff]) = bg_pix.map2(cur_pix, diff_fn).to_luma();
            *mask_pix = diff;
        }

        threshold_mut(&mut mask, self.threshold, ThresholdType::Binary);

        if self.kernel_radius == 0 {
            return Ok(mask);
        }

        Ok(close(&mask, self.norm(), self.kernel_radius))
    }

    fn norm(&self) -> Norm {
        match self.kernel_shape {
            KernelShape::Ellipse => Norm::L2,
            KernelShape::Rect => Norm::LInf,
            KernelShape::Cross => Norm::L1,
        }
    }
}
