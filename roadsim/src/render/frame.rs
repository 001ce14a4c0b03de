use crate::interfaces::gui_interface::RgbColor;
use helpers::geometry::Point2d;

/// Color is an RGBA color with straight (non-premultiplied) alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 1.0);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 1.0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Color {
        Color { r, g, b, a }
    }

    pub fn with_alpha(&self, a: f64) -> Color {
        Color { a, ..*self }
    }
}

impl From<RgbColor> for Color {
    fn from(c: RgbColor) -> Self {
        Color::rgba(c.r, c.g, c.b, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// DrawCmd is a single primitive of the display list. Coordinates are in pixels with the origin in
/// the upper left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole frame.
    Fill { color: Color },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        color: Color,
    },
    /// Convex quadrilateral (trapezoid of a road band).
    Quad { pts: [Point2d; 4], color: Color },
    /// Sprite drawn as a box of its flat color. `visible_fraction` is the unclipped upper part of
    /// the sprite image (1.0 = fully visible), `h` is already reduced by the clipped part.
    Sprite {
        name: &'static str,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        visible_fraction: f64,
        color: Color,
    },
    /// Rectangle whose color blends from `bottom` to `top`.
    VerticalGradient {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        top: Color,
        bottom: Color,
    },
    Polyline {
        pts: Vec<Point2d>,
        width: f64,
        color: Color,
    },
    Line {
        from: Point2d,
        to: Point2d,
        width: f64,
        color: Color,
        dashed: bool,
    },
    Circle {
        center: Point2d,
        radius: f64,
        fill: Color,
        stroke: Option<(f64, Color)>,
    },
    Text {
        pos: Point2d,
        text: String,
        size: f64,
        color: Color,
        align: TextAlign,
    },
}

/// Frame is the display list produced by one render pass.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub cmds: Vec<DrawCmd>,
}

impl Frame {
    pub fn new(width: f64, height: f64) -> Frame {
        Frame {
            width,
            height,
            cmds: vec![],
        }
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.cmds.push(DrawCmd::Rect {
            x,
            y,
            w,
            h,
            radius: 0.0,
            color,
        });
    }

    /// trapezoid adds the quad spanned by the horizontal edges (x1 +- w1, y1) and (x2 +- w2, y2).
    #[allow(clippy::too_many_arguments)]
    pub fn trapezoid(&mut self, x1: f64, y1: f64, w1: f64, x2: f64, y2: f64, w2: f64, color: Color) {
        self.quad(x1 - w1, y1, x1 + w1, y1, x2 + w2, y2, x2 - w2, y2, color);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        x4: f64,
        y4: f64,
        color: Color,
    ) {
        self.cmds.push(DrawCmd::Quad {
            pts: [
                Point2d { x: x1, y: y1 },
                Point2d { x: x2, y: y2 },
                Point2d { x: x3, y: y3 },
                Point2d { x: x4, y: y4 },
            ],
            color,
        });
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, size: f64, color: Color, align: TextAlign) {
        self.cmds.push(DrawCmd::Text {
            pos: Point2d { x, y },
            text: text.to_owned(),
            size,
            color,
            align,
        });
    }

    /// no_sprites counts the sprite commands of the frame.
    pub fn no_sprites(&self) -> usize {
        self.cmds
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Sprite { .. }))
            .count()
    }

    pub fn sprite_names(&self) -> Vec<&'static str> {
        self.cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Sprite { name, .. } => Some(*name),
                _ => None,
            })
            .collect()
    }
}
