use image::{GrayImage, Luma, Rgb, RgbImage};

use super::{
    pipeline::{FrameOutcome, FrameRegions, MotionPipeline, RunStats},
    sink::{CollectSink, NullSink},
    Error,
};
use crate::{
    definitions::{DetectorOptions, DifferenceMode, KernelShape},
    Rect,
};

const SIZE: u32 = 64;

fn blank() -> GrayImage {
    GrayImage::new(SIZE, SIZE)
}

fn with_square(base: &GrayImage, x: u32, y: u32, side: u32, val: u8) -> GrayImage {
    let mut ret = base.clone();
    for px in x..x + side {
        for py in y..y + side {
            ret.put_pixel(px, py, Luma([val]));
        }
    }
    ret
}

fn expect_regions(outcome: FrameOutcome) -> FrameRegions {
    match outcome {
        FrameOutcome::Regions(regions) => regions,
        FrameOutcome::Warmup { .. } => panic!("expected detection to run"),
    }
}

#[test]
fn test_warmup_counts() {
    let opts = DetectorOptions {
        history_len: 3,
        ..Default::default()
    };
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(opts).unwrap();

    for i in 1..=3 {
        let exp = FrameOutcome::Warmup {
            frames_seen: i,
            needed: 3,
        };
        assert_eq!(exp, pipeline.process_frame(&blank()).unwrap());
    }
    assert!(pipeline.background().is_some());

    //the first frame after the history fills is compared against the background
    let regions = expect_regions(pipeline.process_frame(&blank()).unwrap());
    assert_eq!(regions.frame_index, 3);
    assert!(regions.clusters.is_empty());
    assert!(regions.components.is_empty());
}

#[test]
fn test_history_keeps_latest_frames() {
    let opts = DetectorOptions {
        history_len: 3,
        ..Default::default()
    };
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(opts).unwrap();

    for val in 1..=5 {
        pipeline
            .process_frame(&GrayImage::from_pixel(4, 4, Luma([val])))
            .unwrap();
    }

    //frames 1 and 2 were evicted and the background follows the remaining three
    let held = pipeline
        .history()
        .iter()
        .map(|f| f.get_pixel(0, 0).0[0])
        .collect::<Vec<_>>();
    assert_eq!(held, vec![3, 4, 5]);
    assert_eq!(pipeline.frames_processed(), 5);

    let background = pipeline.background().unwrap();
    assert_eq!(background.get_pixel(0, 0).0[0], 4);
}

#[test]
fn test_square_appears() {
    let opts = DetectorOptions {
        kernel_shape: KernelShape::Rect,
        ..Default::default()
    };
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(opts).unwrap();
    for _ in 0..opts.history_len {
        pipeline.process_frame(&blank()).unwrap();
    }

    let frame = with_square(&blank(), 20, 20, 20, 255);
    let regions = expect_regions(pipeline.process_frame(&frame).unwrap());

    let square = Rect::new(20, 20, 20, 20);
    assert_eq!(regions.components.len(), 1);
    assert_eq!(regions.components[0].area, 400);
    assert_eq!(regions.clusters.len(), 1);
    assert_eq!(regions.clusters[0].rect, square);
    assert_eq!(regions.foreground, frame);
}

#[test]
fn test_square_appears_default_kernel() {
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(DetectorOptions::default()).unwrap();
    for _ in 0..5 {
        pipeline.process_frame(&blank()).unwrap();
    }

    let frame = with_square(&blank(), 20, 20, 20, 255);
    let regions = expect_regions(pipeline.process_frame(&frame).unwrap());

    let square = Rect::new(20, 20, 20, 20);
    assert_eq!(regions.clusters.len(), 1);
    let found = regions.clusters[0].rect;
    assert!(found.contains(&square));
    assert!(square.expanded(2).contains(&found));
    assert!((400..=576).contains(&regions.components[0].area));
}

//an object that stays put for long enough is absorbed into the background
#[test]
fn test_stationary_object_fades_into_background() {
    let opts = DetectorOptions {
        history_len: 3,
        ..Default::default()
    };
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(opts).unwrap();
    for _ in 0..3 {
        pipeline.process_frame(&blank()).unwrap();
    }

    let frame = with_square(&blank(), 10, 10, 15, 200);
    let cluster_counts = (0..5)
        .map(|_| {
            let regions = expect_regions(pipeline.process_frame(&frame).unwrap());
            regions.clusters.len()
        })
        .collect::<Vec<_>>();

    //the median flips to the square once it fills two of the three history slots
    assert_eq!(cluster_counts, vec![1, 1, 0, 0, 0]);
}

#[test]
fn test_mismatched_frame_rejected() {
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(DetectorOptions::default()).unwrap();
    pipeline.process_frame(&blank()).unwrap();

    let exp = Err(Error::DimensionMismatch {
        expected: (SIZE, SIZE),
        actual: (SIZE, SIZE + 1),
    });
    assert_eq!(exp, pipeline.process_frame(&GrayImage::new(SIZE, SIZE + 1)));
    assert_eq!(pipeline.frames_processed(), 1);
    assert_eq!(pipeline.history().len(), 1);
}

#[test]
fn test_invalid_options() {
    let opts = DetectorOptions {
        kernel_size: 4,
        ..Default::default()
    };
    assert!(matches!(
        MotionPipeline::<Luma<u8>>::new(opts),
        Err(Error::InvalidOption(_))
    ));
}

#[test]
fn test_directional_misses_bright_objects() {
    let opts = DetectorOptions {
        difference: DifferenceMode::Directional,
        ..Default::default()
    };
    let grey = GrayImage::from_pixel(SIZE, SIZE, Luma([128]));

    let mut pipeline = MotionPipeline::<Luma<u8>>::new(opts).unwrap();
    for _ in 0..opts.history_len {
        pipeline.process_frame(&grey).unwrap();
    }

    let bright = with_square(&grey, 5, 5, 20, 255);
    let regions = expect_regions(pipeline.process_frame(&bright).unwrap());
    assert!(regions.clusters.is_empty());

    let dark = with_square(&grey, 5, 5, 20, 0);
    let regions = expect_regions(pipeline.process_frame(&dark).unwrap());
    assert_eq!(regions.clusters.len(), 1);
}

#[test]
fn test_run_skips_bad_frames() {
    let opts = DetectorOptions {
        history_len: 2,
        ..Default::default()
    };
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(opts).unwrap();

    let frames = vec![
        blank(),
        GrayImage::new(3, 3),
        blank(),
        with_square(&blank(), 30, 30, 12, 255),
        blank(),
    ];

    let mut sink = CollectSink::new();
    let stats = pipeline.run(frames, &mut sink).unwrap();

    let exp = RunStats {
        frames_read: 5,
        frames_skipped: 1,
        frames_with_regions: 1,
        total_clusters: 1,
    };
    assert_eq!(exp, stats);

    //detection ran for the last two accepted frames
    let indexes = sink
        .regions
        .iter()
        .map(|r| r.frame_index)
        .collect::<Vec<_>>();
    assert_eq!(indexes, vec![2, 3]);
}

#[test]
fn test_run_empty_input() {
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(DetectorOptions::default()).unwrap();
    let res = pipeline.run(Vec::<GrayImage>::new(), &mut NullSink);
    assert_eq!(Err(Error::EmptyInput), res);
}

#[test]
fn test_run_stops_when_asked() {
    let opts = DetectorOptions {
        history_len: 1,
        ..Default::default()
    };
    let mut pipeline = MotionPipeline::<Luma<u8>>::new(opts).unwrap();

    let frames = std::iter::repeat(blank()).take(100);
    let mut sink = CollectSink::with_stop_after(3);
    let stats = pipeline.run(frames, &mut sink).unwrap();

    //one warmup frame, then three detections
    assert_eq!(stats.frames_read, 4);
    assert_eq!(sink.regions.len(), 3);
}

#[test]
fn test_colour_frames() {
    let mut pipeline = MotionPipeline::<Rgb<u8>>::new(DetectorOptions::default()).unwrap();
    let bg = RgbImage::from_pixel(SIZE, SIZE, Rgb([40, 90, 40]));
    for _ in 0..5 {
        pipeline.process_frame(&bg).unwrap();
    }

    let mut frame = bg.clone();
    for x in 40..55 {
        for y in 2..20 {
            frame.put_pixel(x, y, Rgb([250, 20, 20]));
        }
    }

    let regions = expect_regions(pipeline.process_frame(&frame).unwrap());
    assert_eq!(regions.clusters.len(), 1);
    assert!(regions.clusters[0].rect.contains(&Rect::new(40, 2, 15, 18)));
}
