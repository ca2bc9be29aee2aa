use std::io::Write;

use image::Rgb;
use itertools::Itertools;
use motion_regions_lib::{Cluster, Frame, FrameRegions, RegionSink};
use serde::Serialize;

use crate::app::*;

/// Prints one line per frame in which something moved, followed by one indented line per box.
#[derive(Debug, Default)]
pub struct TextSink;

impl RegionSink<Rgb<u8>> for TextSink {
    fn accept(&mut self, _frame: &Frame<Rgb<u8>>, regions: &FrameRegions) {
        if regions.clusters.is_empty() {
            return;
        }

        #[allow(clippy::print_stdout)]
        let () = println!(
            "frame {}: {} region(s)",
            regions.frame_index,
            regions.clusters.len()
        );

        for Cluster { rect, labels } in &regions.clusters {
            #[allow(clippy::print_stdout)]
            let () = println!(
                "    x={} y={} w={} h={} (components: {})",
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                labels.iter().join(", ")
            );
        }
    }
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame_index: u64,
    clusters: &'a [Cluster],
}

/// Writes one JSON object per processed frame, one per line. If a write fails the sink asks the run
/// to stop, and the error is returned by [`JsonSink::finish`].
pub struct JsonSink<W: Write> {
    writer: W,
    error: Option<std::io::Error>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn write_record(&mut self, regions: &FrameRegions) -> std::io::Result<()> {
        let record = FrameRecord {
            frame_index: regions.frame_index,
            clusters: &regions.clusters,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(self.writer)
    }

    pub fn finish(mut self) -> Result<W, AppError> {
        if let Some(e) = self.error.take() {
            return Err(AppError::Output(e));
        }
        self.writer.flush().map_err(AppError::Output)?;
        Ok(self.writer)
    }
}

impl<W: Write> RegionSink<Rgb<u8>> for JsonSink<W> {
    fn accept(&mut self, _frame: &Frame<Rgb<u8>>, regions: &FrameRegions) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_record(regions) {
            self.error = Some(e);
        }
    }

    fn should_stop(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod test {
    use image::GrayImage;
    use motion_regions_lib::Rect;

    use super::*;

    fn regions(frame_index: u64, clusters: Vec<Cluster>) -> FrameRegions {
        FrameRegions {
            frame_index,
            components: vec![],
            clusters,
            foreground: GrayImage::new(1, 1),
        }
    }

    #[test]
    fn test_json_lines() {
        let frame = Frame::<Rgb<u8>>::new(1, 1);
        let mut sink = JsonSink::new(vec![]);

        sink.accept(&frame, &regions(5, vec![]));
        sink.accept(
            &frame,
            &regions(
                6,
                vec![Cluster {
                    rect: Rect::new(1, 2, 3, 4),
                    labels: vec![1, 3],
                }],
            ),
        );
        assert!(!sink.should_stop());

        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["frame_index"], 5);
        assert_eq!(first["clusters"].as_array().unwrap().len(), 0);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        let exp = serde_json::json!({
            "frame_index": 6,
            "clusters": [{
                "rect": { "x": 1, "y": 2, "width": 3, "height": 4 },
                "labels": [1, 3],
            }],
        });
        assert_eq!(exp, second);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_stops_run() {
        let frame = Frame::<Rgb<u8>>::new(1, 1);
        let mut sink = JsonSink::new(BrokenPipe);

        sink.accept(&frame, &regions(0, vec![]));
        assert!(sink.should_stop());
        assert!(matches!(sink.finish(), Err(AppError::Output(_))));
    }
}
