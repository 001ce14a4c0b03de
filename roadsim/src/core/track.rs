use crate::interfaces::gui_interface::RgbColor;
use anyhow::Context;
use helpers::geometry::Point3d;
use serde::Deserialize;

/// World-space length of a single road segment.
pub const SEGMENT_LENGTH: f64 = 200.0;
/// Number of segments sharing one color band (rumble-strip banding).
pub const RUMBLE_LENGTH: usize = 3;
/// Half width of the road in world units (lateral offset 1.0 equals this distance).
pub const ROAD_WIDTH: f64 = 2000.0;

/// * `name` - Name of the circuit (used for console output only)
/// * `draw_distance` - Number of segments projected per frame
/// * `fog_density` - Density of the exponential distance fog
/// * `lanes` - Number of lanes painted onto the road
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrackPars {
    pub name: String,
    pub draw_distance: usize,
    pub fog_density: f64,
    pub lanes: u32,
}

impl Default for TrackPars {
    fn default() -> Self {
        TrackPars {
            name: String::from("CityNight"),
            draw_distance: 300,
            fog_density: 5.0,
            lanes: 4,
        }
    }
}

// COLORS ------------------------------------------------------------------------------------------
/// Hex color strings of one band palette. An empty strip disables the lane ticks.
#[derive(Debug, Deserialize, Clone)]
pub struct BandPars {
    pub road: String,
    pub grass: String,
    pub rumble: String,
    pub strip: String,
    pub sidewalk: String,
    pub curb: String,
}

/// * `sky` - Clear color of the frame
/// * `fog` - Color of the distance fog overlay
/// * `light`/`dark` - Alternating band palettes
/// * `finish` - Palette of the finish line segments
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PalettePars {
    pub sky: String,
    pub fog: String,
    pub light: BandPars,
    pub dark: BandPars,
    pub finish: BandPars,
}

impl Default for PalettePars {
    fn default() -> Self {
        let band = |road: &str, grass: &str, rumble: &str, strip: &str, sidewalk: &str, curb: &str| {
            BandPars {
                road: road.to_owned(),
                grass: grass.to_owned(),
                rumble: rumble.to_owned(),
                strip: strip.to_owned(),
                sidewalk: sidewalk.to_owned(),
                curb: curb.to_owned(),
            }
        };

        PalettePars {
            sky: String::from("#020617"),
            fog: String::from("#020617"),
            light: band("#0a0d14", "#1e293b", "#111827", "#fbbf24", "#334155", "#475569"),
            dark: band("#05070a", "#0f172a", "#0d1117", "", "#1e293b", "#334155"),
            finish: band("#000000", "#111827", "#000000", "", "#000000", "#000000"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBand {
    Light,
    Dark,
    Finish,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandColors {
    pub road: RgbColor,
    pub grass: RgbColor,
    pub rumble: RgbColor,
    pub strip: Option<RgbColor>,
    pub sidewalk: RgbColor,
    pub curb: RgbColor,
}

impl BandColors {
    fn from_pars(pars: &BandPars) -> anyhow::Result<BandColors> {
        Ok(BandColors {
            road: RgbColor::from_hex(&pars.road)?,
            grass: RgbColor::from_hex(&pars.grass)?,
            rumble: RgbColor::from_hex(&pars.rumble)?,
            strip: if pars.strip.is_empty() {
                None
            } else {
                Some(RgbColor::from_hex(&pars.strip)?)
            },
            sidewalk: RgbColor::from_hex(&pars.sidewalk)?,
            curb: RgbColor::from_hex(&pars.curb)?,
        })
    }
}

/// Palette contains the parsed colors of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub sky: RgbColor,
    pub fog: RgbColor,
    pub light: BandColors,
    pub dark: BandColors,
    pub finish: BandColors,
}

impl Palette {
    pub fn from_pars(pars: &PalettePars) -> anyhow::Result<Palette> {
        Ok(Palette {
            sky: RgbColor::from_hex(&pars.sky).context("Invalid sky color!")?,
            fog: RgbColor::from_hex(&pars.fog).context("Invalid fog color!")?,
            light: BandColors::from_pars(&pars.light).context("Invalid light band palette!")?,
            dark: BandColors::from_pars(&pars.dark).context("Invalid dark band palette!")?,
            finish: BandColors::from_pars(&pars.finish)
                .context("Invalid finish band palette!")?,
        })
    }

    pub fn band(&self, band: ColorBand) -> &BandColors {
        match band {
            ColorBand::Light => &self.light,
            ColorBand::Dark => &self.dark,
            ColorBand::Finish => &self.finish,
        }
    }
}

// SEGMENTS ----------------------------------------------------------------------------------------
/// SpritePlacement is a decor item attached to a segment. `offset` is the lateral position in
/// lane units (negative = left), `offset_y` the vertical anchor factor (defaults to -1.0, i.e. the
/// sprite stands on the road).
#[derive(Debug, Clone, PartialEq)]
pub struct SpritePlacement {
    pub source: &'static str,
    pub offset: f64,
    pub offset_y: Option<f64>,
}

/// Segment is the atomic unit of the track. `p1` is the near boundary (index * SEGMENT_LENGTH),
/// `p2` the far boundary. `cars` contains the indices of the vehicles that are currently located
/// within the segment (indices into the vehicle list of the race).
#[derive(Debug, Clone)]
pub struct Segment {
    pub index: usize,
    pub p1: Point3d,
    pub p2: Point3d,
    pub curve: f64,
    pub band: ColorBand,
    pub zebra: bool,
    pub sprites: Vec<SpritePlacement>,
    pub cars: Vec<usize>,
}

impl Segment {
    pub fn new(index: usize, curve: f64, y1: f64, y2: f64) -> Segment {
        Segment {
            index,
            p1: Point3d {
                x: 0.0,
                y: y1,
                z: index as f64 * SEGMENT_LENGTH,
            },
            p2: Point3d {
                x: 0.0,
                y: y2,
                z: (index + 1) as f64 * SEGMENT_LENGTH,
            },
            curve,
            band: if (index / RUMBLE_LENGTH) % 2 == 1 {
                ColorBand::Dark
            } else {
                ColorBand::Light
            },
            zebra: false,
            sprites: vec![],
            cars: vec![],
        }
    }
}

/// Track is the closed ring of segments that makes up one lap.
#[derive(Debug, Clone)]
pub struct Track {
    pub segments: Vec<Segment>,
    pub length: f64,
    placeholder: Segment,
}

impl Track {
    pub fn new(segments: Vec<Segment>) -> Track {
        let length = segments.len() as f64 * SEGMENT_LENGTH;

        Track {
            segments,
            length,
            placeholder: Segment::new(0, 0.0, 0.0, 0.0),
        }
    }

    /// The method returns a track without segments. All lookups on it return a flat placeholder
    /// segment.
    pub fn empty() -> Track {
        Track::new(vec![])
    }

    pub fn no_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The method returns the index of the segment containing the world position z (wrapped
    /// around the ring). An empty track always returns 0.
    pub fn segment_idx(&self, z: f64) -> usize {
        if self.segments.is_empty() {
            return 0;
        }
        ((z / SEGMENT_LENGTH).floor() as i64).rem_euclid(self.segments.len() as i64) as usize
    }

    /// The method returns the segment containing the world position z, or the placeholder
    /// segment if the track is not built.
    pub fn find_segment(&self, z: f64) -> &Segment {
        self.segments
            .get(self.segment_idx(z))
            .unwrap_or(&self.placeholder)
    }

    pub fn segment(&self, idx: usize) -> &Segment {
        self.segments.get(idx).unwrap_or(&self.placeholder)
    }
}
