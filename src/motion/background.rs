use image::Pixel;
use rayon::prelude::*;

use super::{Error, Frame};
use crate::MotionResult;

/// Given a sequence of frames of the same size, build a new frame where every sample (each channel
/// of each pixel, independently) is the median of that sample across the sequence.
///
/// For an even number of frames the lower of the two middle values is taken, so no averaging
/// happens and the output only ever contains values that were present in the input.
///
/// Rows are computed in parallel.
pub fn median_composite<'a, P, I>(frames: I) -> MotionResult<Frame<P>>
where
    P: Pixel<Subpixel = u8> + 'a,
    I: IntoIterator<Item = &'a Frame<P>>,
{
    let frames = frames.into_iter().collect::<Vec<_>>();
    let (width, height) = frames.first().ok_or(Error::EmptyHistory)?.dimensions();

    //check that the new frame is the same size as all previous frames.
    if let Some(bad) = frames.iter().find(|f| f.dimensions() != (width, height)) {
        return Err(Error::DimensionMismatch {
            expected: (width, height),
            actual: bad.dimensions(),
        });
    }

    let mut ret = Frame::<P>::new(width, height);
    let row_len = width as usize * usize::from(P::CHANNEL_COUNT);
    if row_len == 0 {
        return Ok(ret);
    }

    let raws = frames
        .iter()
        .map(|f| f.as_raw().as_slice())
        .collect::<Vec<_>>();
    let lower_mid = (raws.len() - 1) / 2;

    ret.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(row_no, out_row)| {
            let row_start = row_no * row_len;

            //one scratch buffer per row, reused for every sample in it.
            let mut samples = Vec::with_capacity(raws.len());
            for (col, out_sample) in out_row.iter_mut().enumerate() {
                samples.clear();
                samples.extend(raws.iter().map(|raw| raw[row_start + col]));

                let (_, median, _) = samples.select_nth_unstable(lower_mid);
                *out_sample = *median;
            }
        });

    Ok(ret)
}
