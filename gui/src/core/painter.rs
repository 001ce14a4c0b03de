use eframe::egui;
use egui::{Align2, Color32, CornerRadius, FontId, Mesh, Pos2, Rect, Shape, Stroke, Vec2};
use helpers::geometry::Point2d;
use roadsim::render::frame::{Color, DrawCmd, Frame, TextAlign};

const DASH_LENGTH: f32 = 5.0;
const GAP_LENGTH: f32 = 5.0;

/// to_color32 converts a display list color (straight alpha in [0, 1]) into an egui color.
pub fn to_color32(color: &Color) -> Color32 {
    let a = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, a)
}

/// to_pos shifts a display list point by the origin of the painted area.
pub fn to_pos(p: &Point2d, offset: Vec2) -> Pos2 {
    Pos2 {
        x: p.x as f32,
        y: p.y as f32,
    } + offset
}

fn to_rect(x: f64, y: f64, w: f64, h: f64, offset: Vec2) -> Rect {
    Rect::from_min_size(
        Pos2 {
            x: x as f32,
            y: y as f32,
        } + offset,
        Vec2 {
            x: w as f32,
            y: h as f32,
        },
    )
}

fn to_align2(align: TextAlign) -> Align2 {
    match align {
        TextAlign::Left => Align2::LEFT_CENTER,
        TextAlign::Center => Align2::CENTER_CENTER,
        TextAlign::Right => Align2::RIGHT_CENTER,
    }
}

/// paint_frame converts the display list of a frame into egui shapes and adds them to the
/// painter in drawing order. `offset` is the position of the frame's upper left corner.
pub fn paint_frame(painter: &egui::Painter, frame: &Frame, offset: Vec2) {
    // create vector for drawn shapes
    let mut shapes = Vec::with_capacity(frame.cmds.len());

    for cmd in frame.cmds.iter() {
        match cmd {
            DrawCmd::Fill { color } => shapes.push(Shape::rect_filled(
                to_rect(0.0, 0.0, frame.width, frame.height, offset),
                CornerRadius::ZERO,
                to_color32(color),
            )),
            DrawCmd::Rect {
                x,
                y,
                w,
                h,
                radius,
                color,
            } => shapes.push(Shape::rect_filled(
                to_rect(*x, *y, *w, *h, offset),
                CornerRadius::same(radius.clamp(0.0, 255.0) as u8),
                to_color32(color),
            )),
            DrawCmd::Quad { pts, color } => shapes.push(Shape::convex_polygon(
                pts.iter().map(|p| to_pos(p, offset)).collect(),
                to_color32(color),
                Stroke::NONE,
            )),
            DrawCmd::Sprite {
                x, y, w, h, color, ..
            } => shapes.push(Shape::rect_filled(
                to_rect(*x, *y, *w, *h, offset),
                CornerRadius::same(2),
                to_color32(color),
            )),
            DrawCmd::VerticalGradient {
                x,
                y,
                w,
                h,
                top,
                bottom,
            } => {
                let rect = to_rect(*x, *y, *w, *h, offset);
                let mut mesh = Mesh::default();

                mesh.colored_vertex(rect.left_top(), to_color32(top));
                mesh.colored_vertex(rect.right_top(), to_color32(top));
                mesh.colored_vertex(rect.left_bottom(), to_color32(bottom));
                mesh.colored_vertex(rect.right_bottom(), to_color32(bottom));
                mesh.add_triangle(0, 1, 2);
                mesh.add_triangle(2, 1, 3);

                shapes.push(Shape::mesh(mesh));
            }
            DrawCmd::Polyline { pts, width, color } => shapes.push(Shape::line(
                pts.iter().map(|p| to_pos(p, offset)).collect(),
                Stroke::new(*width as f32, to_color32(color)),
            )),
            DrawCmd::Line {
                from,
                to,
                width,
                color,
                dashed,
            } => {
                let stroke = Stroke::new(*width as f32, to_color32(color));
                let pts = [to_pos(from, offset), to_pos(to, offset)];

                if *dashed {
                    shapes.extend(Shape::dashed_line(&pts, stroke, DASH_LENGTH, GAP_LENGTH));
                } else {
                    shapes.push(Shape::line_segment(pts, stroke));
                }
            }
            DrawCmd::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let center = to_pos(center, offset);
                shapes.push(Shape::circle_filled(center, *radius as f32, to_color32(fill)));

                if let Some((width, color)) = stroke {
                    shapes.push(Shape::circle_stroke(
                        center,
                        *radius as f32,
                        Stroke::new(*width as f32, to_color32(color)),
                    ));
                }
            }
            DrawCmd::Text {
                pos,
                text,
                size,
                color,
                align,
            } => {
                let galley = painter.layout_no_wrap(
                    text.to_owned(),
                    FontId::proportional(*size as f32),
                    to_color32(color),
                );
                let rect = to_align2(*align).anchor_size(to_pos(pos, offset), galley.size());
                shapes.push(Shape::galley(rect.min, galley, to_color32(color)));
            }
        }
    }

    // update shapes in UI painter
    painter.extend(shapes);
}
