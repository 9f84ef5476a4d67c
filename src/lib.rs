#![warn(missing_docs)]

//! Tiled JSON map loader and toroidal scrolling tile renderer for Macroquad.

mod error;
mod geom;
mod layer;
mod loader {
    pub mod json_loader;
}
mod map;
mod properties;
mod render {
    pub mod backend;
}
mod tileset;

pub use error::MapError;
pub use geom::rects_intersect;
pub use layer::{LayerKind, TiledLayer, TiledObject, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use loader::json_loader::{
    decode_map_file, decode_map_str, RawLayer, RawMap, RawObject, RawProperty, RawTileset,
};
pub use map::{MapSettings, TiledMap};
pub use properties::{Properties, PropertyValue};
pub use render::backend::{AtlasStore, TileBlitter};
pub use tileset::TileSet;
