use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use walkdir::WalkDir;

use crate::app::*;

/// Every file directly inside `dir` that looks like a readable image, sorted by file name.
/// Subdirectories are not entered.
pub fn list_frame_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::FramesDirMissing(dir.to_path_buf()));
    }

    let mut ret = vec![];
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| AppError::FramesDirRead {
            path: dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let readable = ImageFormat::from_path(entry.path())
            .is_ok_and(|fmt| fmt.reading_enabled());
        if readable {
            ret.push(entry.into_path());
        } else {
            trace!("Not an image: {}", entry.path().display());
        }
    }

    Ok(ret)
}

pub fn load_frame(path: &Path) -> Result<RgbImage, AppError> {
    let img = image::open(path).map_err(|source| AppError::FrameDecode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.into_rgb8())
}

/// Decodes each path as it is reached. Files that fail to decode are skipped with a warning.
///
/// If every path in a whole pass fails, iteration ends so that a looping run over a directory of
/// unreadable files does not spin forever.
pub struct DecodedFrames<I> {
    paths: I,
    pass_len: usize,
    failures_in_a_row: usize,
}

impl<I> DecodedFrames<I>
where
    I: Iterator<Item = PathBuf>,
{
    pub fn new(paths: I, pass_len: usize) -> Self {
        Self {
            paths,
            pass_len,
            failures_in_a_row: 0,
        }
    }
}

impl<I> Iterator for DecodedFrames<I>
where
    I: Iterator<Item = PathBuf>,
{
    type Item = RgbImage;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pass_len > 0 && self.failures_in_a_row >= self.pass_len {
                warn!("No frame could be decoded in a full pass over the input. Stopping");
                return None;
            }

            let path = self.paths.next()?;
            match load_frame(&path) {
                Ok(frame) => {
                    self.failures_in_a_row = 0;
                    return Some(frame);
                }
                Err(e) => {
                    warn!("Skipping frame: {e}");
                    self.failures_in_a_row += 1;
                }
            }
        }
    }
}
