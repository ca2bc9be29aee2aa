use std::{error::Error, io::BufWriter};

use image::Rgb;
use motion_regions_lib::*;

use super::{
    frame_dir::{list_frame_files, DecodedFrames},
    sinks::{JsonSink, TextSink},
};
use crate::app::*;

// * read cfg
// * resolve detector options
// * list frames
// * run the pipeline into the chosen sink
// * report totals

pub fn run_app() -> i32 {
    let cfg = arg_parse::parse_args();
    configure_logs(cfg.output_cfg.verbosity);

    let ret = match run_app_inner(&cfg) {
        Ok(()) => 0,
        Err(fatal_error) => {
            print_fatal_err(fatal_error, cfg.output_cfg.verbosity);
            1
        }
    };

    ret
}

fn run_app_inner(cfg: &AppCfg) -> eyre::Result<()> {
    let options = resolve_options(&cfg.detector_cfg)?;
    debug!("Detector options: {options:?}");

    let frames_dir = &cfg.input_cfg.frames_dir;
    let paths = list_frame_files(frames_dir)?;
    if paths.is_empty() {
        return Err(AppError::NoFrames(frames_dir.clone()).into());
    }
    info!("Found {} frames in {}", paths.len(), frames_dir.display());

    let pass_len = paths.len();
    let mut seq = FrameSequence::new(paths.into_iter(), cfg.input_cfg.replay);
    if let Some(max_frames) = cfg.input_cfg.max_frames {
        seq = seq.with_limit(max_frames);
    }
    let frames = DecodedFrames::new(seq, pass_len);

    let mut pipeline = MotionPipeline::<Rgb<u8>>::new(options).map_err(AppError::from)?;

    let stats = match cfg.output_cfg.format {
        OutputFormat::Normal => pipeline
            .run(frames, &mut TextSink)
            .map_err(AppError::from)?,
        OutputFormat::Json => {
            let stdout = std::io::stdout().lock();
            let mut sink = JsonSink::new(BufWriter::new(stdout));
            let stats = pipeline.run(frames, &mut sink).map_err(AppError::from)?;
            sink.finish()?;
            stats
        }
    };

    if stats.frames_skipped > 0 {
        warn!(
            "{} frames were skipped because their size did not match the first frame",
            stats.frames_skipped
        );
    }

    Ok(())
}

// Options come from the defaults, then the config file if one was given, then any options given
// explicitly on the command line.
fn resolve_options(cfg: &DetectorCfg) -> Result<DetectorOptions, AppError> {
    let base = match &cfg.config_file {
        None => DetectorOptions::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
                path: path.clone(),
                source,
            })?
        }
    };

    let options = cfg.overrides.apply(base);
    options.validate()?;

    Ok(options)
}

fn print_fatal_err(fatal_err: eyre::Report, verbosity: ReportVerbosity) {
    error!(target: "app-errorlog", "{}", fatal_err);

    if verbosity == ReportVerbosity::Verbose {
        let mut source: Option<&(dyn Error + 'static)> = fatal_err.source();
        while let Some(e) = source {
            error!(target: "app-errorlog", "    caused by: {}", e);
            source = e.source();
        }
    }
}

pub fn configure_logs(verbosity: ReportVerbosity) {
    use simplelog::*;

    let mut cfg = simplelog::ConfigBuilder::new();

    let min_loglevel = match verbosity {
        ReportVerbosity::Quiet => LevelFilter::Warn,
        ReportVerbosity::Default => LevelFilter::Info,
        ReportVerbosity::Verbose => LevelFilter::Trace,
    };

    //If the logger cannot be set up then carry on without logs.
    let _ = TermLogger::init(
        min_loglevel,
        cfg.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
