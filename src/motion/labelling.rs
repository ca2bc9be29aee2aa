use std::collections::{BTreeMap, BTreeSet};

use image::{GrayImage, Luma};
use imageproc::{
    definitions::Image,
    region_labelling::{connected_components, Connectivity},
};
use serde::{Deserialize, Serialize};

use crate::Rect;

/// A connected group of foreground pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    /// Label of the component in the label image. Never 0 (background).
    pub label: u32,

    /// Smallest rect containing every pixel of the component.
    pub rect: Rect,

    /// Number of pixels in the component.
    pub area: u32,
}

#[derive(Debug)]
struct Extent {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    area: u32,
}

impl Extent {
    fn new(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            area: 0,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.area += 1;
    }

    fn into_component(self, label: u32) -> Component {
        //image coordinates are at most u32::MAX but rect coordinates are i32.
        let to_coord = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);

        Component {
            label,
            rect: Rect::new(
                to_coord(self.min_x),
                to_coord(self.min_y),
                self.max_x - self.min_x + 1,
                self.max_y - self.min_y + 1,
            ),
            area: self.area,
        }
    }
}

/// Split a binary mask into 8-connected components. Any nonzero pixel is foreground.
///
/// Returns the label image (0 for background, 1.. for each component) and one [`Component`] per
/// label, in ascending label order.
pub fn label_components(mask: &GrayImage) -> (Image<Luma<u32>>, Vec<Component>) {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0]));

    let mut extents = BTreeMap::<u32, Extent>::new();
    for (x, y, &Luma([label])) in labels.enumerate_pixels() {
        if label == 0 {
            continue;
        }
        extents
            .entry(label)
            .or_insert_with(|| Extent::new(x, y))
            .add(x, y);
    }

    let components = extents
        .into_iter()
        .map(|(label, extent)| extent.into_component(label))
        .collect();

    (labels, components)
}

/// Render the given labels of a label image into a fresh binary mask. Pixels belonging to a kept
/// label are 255, all others are 0.
pub fn component_mask(
    labels: &Image<Luma<u32>>,
    keep: impl IntoIterator<Item = u32>,
) -> GrayImage {
    let keep = keep.into_iter().collect::<BTreeSet<_>>();
    let mut ret = GrayImage::new(labels.width(), labels.height());

    let pixels = ret.pixels_mut().zip(labels.pixels());
    for (&mut Luma([ref mut ret_pix]), &Luma([ref label])) in pixels {
        if *label != 0 && keep.contains(label) {
            *ret_pix = 255;
        }
    }

    ret
}
