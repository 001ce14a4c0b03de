use crate::core::track::{ColorBand, Track};
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct SegmentRow<'a> {
    index: usize,
    z: f64,
    y1: f64,
    y2: f64,
    curve: f64,
    zebra: bool,
    band: &'a str,
    decor: String,
}

/// export_track_csv writes the segment table of the track (geometry, banding and decor) to a CSV
/// file.
pub fn export_track_csv(track: &Track, filepath: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(filepath).context(format!(
        "Failed to create track export file {}!",
        filepath.display()
    ))?;

    for seg in track.segments.iter() {
        let band = match seg.band {
            ColorBand::Light => "light",
            ColorBand::Dark => "dark",
            ColorBand::Finish => "finish",
        };

        writer
            .serialize(SegmentRow {
                index: seg.index,
                z: seg.p1.z,
                y1: seg.p1.y,
                y2: seg.p2.y,
                curve: seg.curve,
                zebra: seg.zebra,
                band,
                decor: seg
                    .sprites
                    .iter()
                    .map(|s| s.source)
                    .collect::<Vec<&str>>()
                    .join(";"),
            })
            .context(format!("Failed to write segment {}!", seg.index))?;
    }

    writer
        .flush()
        .context(format!("Failed to flush {}!", filepath.display()))?;
    Ok(())
}
