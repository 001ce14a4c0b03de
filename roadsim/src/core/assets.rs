use crate::core::car::{RIVAL_SPRITE, VEHICLE_FRAMES};
use crate::core::state_handler::{NOS_FRAMES, PLAYER_FRAMES};
use crate::core::track_builder::{LEFT_BUILDINGS, PROPS, RIGHT_BUILDINGS, TREES};
use crate::interfaces::gui_interface::RgbColor;
use std::collections::HashMap;

pub const PLAYER_CAR: &str = "car";
pub const COCKPIT: &str = "car_1st";
pub const BACKGROUND: &str = "bg";
pub const BACKGROUND_TOUCH: &str = "bg_mobile";
pub const NPC_CAR: &str = "npc_car";
pub const CONSTRUCTION: &str = "construction";

/// Edge length of generated placeholder sprites.
pub const PLACEHOLDER_SIZE: f64 = 128.0;

/// SpriteInfo is the drawable handle handed out by the atlas. The pixel size drives the sprite
/// scaling, `color` is the flat fill used by hosts that draw sprites as colored boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteInfo {
    pub width: f64,
    pub height: f64,
    pub color: RgbColor,
    pub placeholder: bool,
}

/// SpriteAtlas maps asset names to drawable handles. A lookup miss never fails but returns a
/// placeholder of the default size with a class-specific color.
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sprites: HashMap<String, SpriteInfo>,
}

impl SpriteAtlas {
    pub fn new() -> SpriteAtlas {
        SpriteAtlas {
            sprites: HashMap::new(),
        }
    }

    /// with_placeholders registers a placeholder for every asset name the engine knows, i.e. it
    /// behaves as if the bulk asset load failed for all images.
    pub fn with_placeholders() -> SpriteAtlas {
        let mut atlas = SpriteAtlas::new();

        for name in catalogue() {
            atlas
                .sprites
                .insert(name.to_owned(), SpriteAtlas::placeholder_for(name));
        }

        atlas
    }

    pub fn insert(&mut self, name: &str, width: f64, height: f64, color: RgbColor) {
        self.sprites.insert(
            name.to_owned(),
            SpriteInfo {
                width,
                height,
                color,
                placeholder: false,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, name: &str) -> SpriteInfo {
        self.sprites
            .get(name)
            .cloned()
            .unwrap_or_else(|| SpriteAtlas::placeholder_for(name))
    }

    pub fn placeholder_for(name: &str) -> SpriteInfo {
        SpriteInfo {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            color: placeholder_color(name),
            placeholder: true,
        }
    }
}

fn placeholder_color(name: &str) -> RgbColor {
    if name == PLAYER_CAR || name == COCKPIT || name == "traffic_light" {
        RgbColor::new(0xef, 0x44, 0x44)
    } else if name == NPC_CAR
        || name == RIVAL_SPRITE
        || VEHICLE_FRAMES.iter().flatten().flatten().any(|&n| n == name)
    {
        RgbColor::new(0x3b, 0x82, 0xf6)
    } else if name == CONSTRUCTION || name == "cone" || name == "barrier" {
        RgbColor::new(0xf9, 0x73, 0x16)
    } else if name == BACKGROUND || name == BACKGROUND_TOUCH {
        RgbColor::new(0x0f, 0x17, 0x2a)
    } else if name.starts_with("tree_") || name.starts_with("bush_") {
        RgbColor::new(0x06, 0x4e, 0x3b)
    } else if PLAYER_FRAMES.iter().chain(NOS_FRAMES.iter()).any(|&n| n == name) {
        RgbColor::new(0xef, 0x44, 0x44)
    } else {
        RgbColor::new(0x44, 0x44, 0x44)
    }
}

/// catalogue returns the names of all assets the engine refers to.
pub fn catalogue() -> Vec<&'static str> {
    let mut names = vec![
        PLAYER_CAR,
        COCKPIT,
        BACKGROUND,
        BACKGROUND_TOUCH,
        NPC_CAR,
        CONSTRUCTION,
        RIVAL_SPRITE,
    ];
    names.extend(PLAYER_FRAMES.iter());
    names.extend(NOS_FRAMES.iter());
    names.extend(VEHICLE_FRAMES.iter().flatten().flatten());
    names.extend(LEFT_BUILDINGS.iter());
    names.extend(RIGHT_BUILDINGS.iter());
    names.extend(TREES.iter());
    names.extend(PROPS.iter());
    names
}
