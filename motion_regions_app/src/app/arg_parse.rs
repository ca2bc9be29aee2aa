use std::path::{Path, PathBuf};

use clap::{value_parser, ArgAction::*};
use motion_regions_lib::*;

use crate::app::*;

// input
const FRAMES_DIR: &str = "Frames directory";
const LOOP: &str = "Loop forever";
const MAX_FRAMES: &str = "Maximum frames";

// detector configuration
const CONFIG_FILE: &str = "Config file";
const HISTORY: &str = "History length";
const MIN_AREA: &str = "Minimum area";
const THRESHOLD: &str = "Threshold";
const KERNEL_SHAPE: &str = "Kernel shape";
const KERNEL_SIZE: &str = "Kernel size";
const MERGE_DISTANCE: &str = "Merge distance";
const MERGE_STRATEGY: &str = "Merge strategy";
const DIFFERENCE: &str = "Difference mode";

//output settings
const OUTPUT_FORMAT: &str = "Format";

//Verbosity
const VERBOSITY_QUIET: &str = "Quiet";
const VERBOSITY_VERBOSE: &str = "Verbose";

const DISPLAY_ORDERING: [&str; 15] = [
    //
    // input
    FRAMES_DIR,
    LOOP,
    MAX_FRAMES,
    //
    //detector
    CONFIG_FILE,
    HISTORY,
    MIN_AREA,
    THRESHOLD,
    KERNEL_SHAPE,
    KERNEL_SIZE,
    MERGE_DISTANCE,
    MERGE_STRATEGY,
    DIFFERENCE,
    //
    //outputs
    OUTPUT_FORMAT,
    //
    //verbosity
    VERBOSITY_QUIET,
    VERBOSITY_VERBOSE,
];

fn build_app() -> clap::Command {
    let get_ordering = |arg_name: &str| -> usize {
        match DISPLAY_ORDERING.iter().position(|x| *x == arg_name) {
            Some(idx) => idx,
            None => {
                panic!("argument not assigned a display order: {arg_name:?}");
            }
        }
    };

    //args are not added through method chaining because rustfmt struggles with very long expressions.
    let mut clap_app = clap::Command::new("Motion regions")
        .version(clap::crate_version!())
        .about("Find moving objects in a directory of still frames");

    clap_app = clap_app.arg(
        clap::Arg::new(FRAMES_DIR)
            .long("frames")
            .required(true)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("Directory containing the frames. Every image file directly inside the directory is read, in file name order.")
            .display_order(get_ordering(FRAMES_DIR)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(LOOP)
            .long("loop")
            .help("Start again from the first frame after reaching the last. Use --max-frames to bound the run.")
            .action(SetTrue)
            .display_order(get_ordering(LOOP)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(MAX_FRAMES)
            .long("max-frames")
            .num_args(1)
            .value_parser(value_parser!(u64))
            .help("Stop after reading this many frame files")
            .display_order(get_ordering(MAX_FRAMES)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(CONFIG_FILE)
            .long("config")
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("JSON file of detector options. Options given on the command line take precedence over the file.")
            .display_order(get_ordering(CONFIG_FILE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(HISTORY)
            .long("history")
            .num_args(1)
            .value_parser(value_parser!(usize))
            .help(format!(
                "Number of frames the background is built from [default: {DEFAULT_HISTORY_LEN}]"
            ))
            .display_order(get_ordering(HISTORY)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(MIN_AREA)
            .long("min-area")
            .num_args(1)
            .value_parser(value_parser!(u32))
            .help(format!(
                "Foreground regions smaller than this many pixels are ignored [default: {DEFAULT_MIN_AREA}]"
            ))
            .display_order(get_ordering(MIN_AREA)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(THRESHOLD)
            .long("threshold")
            .num_args(1)
            .value_parser(value_parser!(u8))
            .help(format!(
                "Pixels that differ from the background by more than this are foreground [default: {DEFAULT_THRESHOLD}]"
            ))
            .display_order(get_ordering(THRESHOLD)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(KERNEL_SHAPE)
            .long("kernel-shape")
            .num_args(1)
            .value_parser(value_parser!(KernelShapeArg))
            .help("Shape used to close small gaps in the foreground [default: ellipse]")
            .display_order(get_ordering(KERNEL_SHAPE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(KERNEL_SIZE)
            .long("kernel-size")
            .num_args(1)
            .value_parser(value_parser!(u8))
            .help(format!(
                "Side length of the closing shape. Must be odd, 1 disables closing [default: {DEFAULT_KERNEL_SIZE}]"
            ))
            .display_order(get_ordering(KERNEL_SIZE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(MERGE_DISTANCE)
            .long("merge-distance")
            .num_args(1)
            .value_parser(value_parser!(u32))
            .help(format!(
                "Boxes separated by at most this many pixels are merged [default: {DEFAULT_MERGE_DISTANCE}]"
            ))
            .display_order(get_ordering(MERGE_DISTANCE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(MERGE_STRATEGY)
            .long("merge-strategy")
            .num_args(1)
            .value_parser(value_parser!(MergeStrategyArg))
            .help("Merge boxes in a single pass over the regions, or join every pair of nearby regions [default: sweep]")
            .display_order(get_ordering(MERGE_STRATEGY)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(DIFFERENCE)
            .long("difference")
            .num_args(1)
            .value_parser(value_parser!(DifferenceArg))
            .help("Detect objects both lighter and darker than the background, or only darker ones [default: absolute]")
            .display_order(get_ordering(DIFFERENCE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(OUTPUT_FORMAT)
            .long("format")
            .help("Whether to output as normal text, or JSON (one object per frame).")
            .value_parser(value_parser!(OutputFormat))
            .default_value("normal")
            .num_args(1)
            .display_order(get_ordering(OUTPUT_FORMAT)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_QUIET)
            .long("quiet")
            .help("Reduced verbosity")
            .conflicts_with(VERBOSITY_VERBOSE)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_QUIET)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_VERBOSE)
            .long("verbose")
            .help("Increased verbosity")
            .conflicts_with(VERBOSITY_QUIET)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_VERBOSE)),
    );

    clap_app
}

pub fn parse_args() -> AppCfg {
    //capture the cwd once, to minimize the risk of working with two values if it is changed by the OS at runtime.
    let cwd = std::env::current_dir()
        .map_err(|e| eyre::Report::new(e).wrap_err("failed to extract cwd"))
        .unwrap_or_else(|e| print_error_and_quit(e));

    let args = build_app().get_matches();
    cfg_from_matches(&args, &cwd)
}

fn cfg_from_matches(args: &clap::ArgMatches, cwd: &Path) -> AppCfg {
    let input_cfg = InputCfg {
        frames_dir: args
            .get_one::<PathBuf>(FRAMES_DIR)
            .map(|p| absolutify_path(cwd, p))
            .unwrap_or_default(),
        replay: if args.get_flag(LOOP) {
            Replay::Forever
        } else {
            Replay::Once
        },
        max_frames: args.get_one::<u64>(MAX_FRAMES).copied(),
    };

    let overrides = OptionOverrides {
        history_len: args.get_one::<usize>(HISTORY).copied(),
        min_area: args.get_one::<u32>(MIN_AREA).copied(),
        threshold: args.get_one::<u8>(THRESHOLD).copied(),
        kernel_shape: args
            .get_one::<KernelShapeArg>(KERNEL_SHAPE)
            .map(|&arg| arg.into()),
        kernel_size: args.get_one::<u8>(KERNEL_SIZE).copied(),
        merge_distance: args.get_one::<u32>(MERGE_DISTANCE).copied(),
        merge_strategy: args
            .get_one::<MergeStrategyArg>(MERGE_STRATEGY)
            .map(|&arg| arg.into()),
        difference: args
            .get_one::<DifferenceArg>(DIFFERENCE)
            .map(|&arg| arg.into()),
    };

    let detector_cfg = DetectorCfg {
        config_file: args
            .get_one::<PathBuf>(CONFIG_FILE)
            .map(|p| absolutify_path(cwd, p)),
        overrides,
    };

    let verbosity = if args.get_flag(VERBOSITY_QUIET) {
        ReportVerbosity::Quiet
    } else if args.get_flag(VERBOSITY_VERBOSE) {
        ReportVerbosity::Verbose
    } else {
        ReportVerbosity::Default
    };

    let output_cfg = OutputCfg {
        format: args
            .get_one::<OutputFormat>(OUTPUT_FORMAT)
            .copied()
            .unwrap_or(OutputFormat::Normal),
        verbosity,
    };

    AppCfg {
        input_cfg,
        detector_cfg,
        output_cfg,
    }
}

fn absolutify_path(cwd: &Path, path: &Path) -> PathBuf {
    //get the absolute path if it is not absolute, by prepending the cwd.
    let path = if path.is_relative() {
        cwd.join(path)
    } else {
        path.to_path_buf()
    };

    //now try canonicalizing the path. If that fails then carry on with the joined path, and let
    //whoever opens it report the problem.
    let p = path.canonicalize().unwrap_or(path);

    p
}
