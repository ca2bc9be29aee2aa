use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /////////////////////////////////
    //detection
    #[error("Motion detection error: {0}")]
    Motion(#[from] motion_regions_lib::Error),

    /////////////////////////////////
    //reading frames
    #[error("Frames directory not found: {}", .0.display())]
    FramesDirMissing(PathBuf),

    #[error("Failed to list frames directory {}", .path.display())]
    FramesDirRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No image files in {}", .0.display())]
    NoFrames(PathBuf),

    #[error("Failed to decode frame {}", .path.display())]
    FrameDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /////////////////////////////////
    //configuration
    #[error("Failed to read config file {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /////////////////////////////////
    //output
    #[error("Failed to write output")]
    Output(#[source] std::io::Error),
}

pub fn print_error_and_quit(e: eyre::Report) -> ! {
    #[allow(clippy::print_stderr)]
    let () = eprintln!("{:?}", e);
    std::process::exit(1);
}
