use crate::core::assets::{SpriteAtlas, PLAYER_CAR};
use crate::core::car::RIVAL_SPRITE;
use crate::render::frame::{Color, DrawCmd};
use helpers::projection::Viewport;

/// Reference width used if the player car sprite is not available.
pub const FALLBACK_REFERENCE_WIDTH: f64 = 300.0;
/// Conversion from sprite pixels to world units.
pub const SPRITE_SCALE: f64 = 1.5625;
/// Projected sprites are limited to these fractions of the viewport.
pub const MAX_SPRITE_WIDTH_FRACTION: f64 = 0.8;
pub const MAX_SPRITE_HEIGHT_FRACTION: f64 = 0.6;
/// Sprites whose projection scale is below this threshold are not drawn.
pub const MIN_SPRITE_SCALE: f64 = 1e-5;

/// world_width_multiplier returns the class-specific size of a sprite relative to the reference
/// width.
pub fn world_width_multiplier(name: &str) -> f64 {
    if name == "traffic_light" {
        3.0
    } else if name.starts_with("truck") {
        1.5
    } else if name == RIVAL_SPRITE {
        0.9
    } else if name.starts_with("novelty") || name.starts_with("taxi") {
        0.95
    } else if name.starts_with("building_") {
        12.0
    } else if name.starts_with("tree_") {
        8.0
    } else if name.starts_with("vending_") || name.starts_with("bush_") {
        1.5
    } else if name.starts_with("news_") {
        2.5
    } else if name.starts_with("trash_") {
        0.8
    } else if name == "bench" || name == "barrier" {
        1.8
    } else if name == "cone" {
        0.6
    } else if name.contains("obstacle") || name.contains("construction") {
        0.7
    } else {
        0.9
    }
}

/// reference_width returns the pixel width all world sprite sizes are derived from.
pub fn reference_width(atlas: &SpriteAtlas) -> f64 {
    if atlas.contains(PLAYER_CAR) {
        atlas.get(PLAYER_CAR).width
    } else {
        FALLBACK_REFERENCE_WIDTH
    }
}

/// ScreenSprite describes a sprite anchored at a projected road position.
/// * `scale` - Projection scale at the anchor
/// * `x`/`y` - Screen position of the anchor
/// * `offset_x` - Horizontal anchor factor (-1.0 = right aligned, 0.0 = left aligned)
/// * `offset_y` - Vertical anchor factor (-1.0 = standing on the anchor), at most -0.5 is applied
/// * `clip` - Screen y below which the sprite is hidden (0.0 = no clipping)
#[derive(Debug, Clone, Copy)]
pub struct ScreenSprite {
    pub name: &'static str,
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub clip: f64,
}

/// place_sprite sizes a sprite by its world width and the projection scale, anchors it and clips
/// it against the hill crest. It returns None if nothing of the sprite remains visible.
pub fn place_sprite(
    atlas: &SpriteAtlas,
    viewport: &Viewport,
    sprite: &ScreenSprite,
) -> Option<DrawCmd> {
    if sprite.scale <= MIN_SPRITE_SCALE {
        return None;
    }

    let info = atlas.get(sprite.name);
    if info.width <= 0.0 || info.height <= 0.0 {
        return None;
    }

    let world_width = reference_width(atlas) * SPRITE_SCALE * world_width_multiplier(sprite.name);

    // limit sprites very close to the camera, each axis on its own
    let dest_w_raw = sprite.scale * world_width * viewport.width / 2.0;
    let dest_h_raw = dest_w_raw * info.height / info.width;
    let dest_w = dest_w_raw.min(viewport.width * MAX_SPRITE_WIDTH_FRACTION);
    let dest_h = dest_h_raw.min(viewport.height * MAX_SPRITE_HEIGHT_FRACTION);

    let dest_x = sprite.x + dest_w * sprite.offset_x;
    let dest_y = sprite.y + dest_h * sprite.offset_y.min(-0.5);

    let clip_h = if sprite.clip > 0.0 {
        (dest_y + dest_h - sprite.clip).max(0.0)
    } else {
        0.0
    };

    if clip_h >= dest_h || dest_h <= 1.0 {
        return None;
    }

    Some(DrawCmd::Sprite {
        name: sprite.name,
        x: dest_x,
        y: dest_y,
        w: dest_w,
        h: dest_h - clip_h,
        visible_fraction: 1.0 - clip_h / dest_h,
        color: Color::from(info.color),
    })
}
