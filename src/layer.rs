use crate::error::MapError;
use crate::geom::rects_intersect;
use crate::loader::json_loader::{properties_from_raw, RawLayer, RawObject};
use crate::properties::Properties;
use macroquad::prelude::Rect;

/// Horizontal flip flag carried in bit 31 of a raw GID.
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip flag carried in bit 30 of a raw GID.
pub const FLIP_V: u32 = 0x4000_0000;
/// Diagonal flip flag carried in bit 29 of a raw GID.
pub const FLIP_D: u32 = 0x2000_0000;
/// Mask selecting the tile ID bits of a raw GID.
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// One named rectangle in an object-group layer.
#[derive(Debug, Clone)]
pub struct TiledObject {
    /// Object name ("" when unnamed).
    pub name: String,
    /// Tile reference, if the object stamps a tile.
    pub gid: Option<u32>,
    /// Left edge in pixel space.
    pub x: f32,
    /// Top edge in pixel space.
    pub y: f32,
    /// Width in pixels; non-positive objects are inert.
    pub width: f32,
    /// Height in pixels; non-positive objects are inert.
    pub height: f32,
    /// Free-form object properties.
    pub properties: Properties,
}

impl TiledObject {
    fn from_raw(raw: RawObject) -> Result<Self, MapError> {
        Ok(TiledObject {
            name: raw.name,
            gid: raw.gid,
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            properties: properties_from_raw(raw.properties)?,
        })
    }

    /// Bounding rectangle of the object.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// What a layer holds: a grid of GIDs or a list of objects.
#[derive(Debug, Clone)]
pub enum LayerKind {
    /// Grid layer: flat row-major GIDs, 0 = empty cell.
    Tiles {
        /// `map rows * map cols` raw GIDs (flip bits included).
        data: Vec<u32>,
    },
    /// Object group: freeform rectangles, not grid-aligned.
    Objects {
        /// Objects in declaration order; query order is part of the contract.
        objects: Vec<TiledObject>,
    },
}

/// One map layer, either a tile grid or an object group.
#[derive(Debug, Clone)]
pub struct TiledLayer {
    /// Layer name, unique per map by convention (first match wins otherwise).
    pub name: String,
    /// Layer width in tiles, as exported.
    pub width: usize,
    /// Layer height in tiles, as exported.
    pub height: usize,
    /// Blend opacity in [0, 1], applied to every tile of the layer.
    pub opacity: f32,
    /// Hidden layers are skipped by the renderer but stay queryable.
    pub visible: bool,
    /// Free-form layer properties.
    pub properties: Properties,
    // Cell index arithmetic uses the owning map's column count, not the
    // layer's own width: layers share the map grid.
    map_cols: usize,
    kind: LayerKind,
}

impl TiledLayer {
    /// Build a layer from its export record, bound to the owning map's
    /// column count. Tile layers with a data length that does not match
    /// `width * height` are rejected.
    pub(crate) fn from_raw(raw: RawLayer, map_cols: usize) -> Result<Self, MapError> {
        let properties = properties_from_raw(raw.properties)?;
        let kind = match raw.kind.as_deref().unwrap_or("tilelayer") {
            "objectgroup" => LayerKind::Objects {
                objects: raw
                    .objects
                    .into_iter()
                    .map(TiledObject::from_raw)
                    .collect::<Result<Vec<_>, _>>()?,
            },
            _ => {
                let expected = raw.width * raw.height;
                if raw.data.len() != expected {
                    return Err(MapError::InvalidLayerSize {
                        layer: raw.name,
                        expected,
                        actual: raw.data.len(),
                    });
                }
                LayerKind::Tiles { data: raw.data }
            }
        };
        Ok(TiledLayer {
            name: raw.name,
            width: raw.width,
            height: raw.height,
            opacity: raw.opacity,
            visible: raw.visible,
            properties,
            map_cols,
            kind,
        })
    }

    /// The layer's payload.
    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// True for object-group layers.
    pub fn is_object_group(&self) -> bool {
        matches!(self.kind, LayerKind::Objects { .. })
    }

    /// Raw GID at `(row, col)`, or `None` if this layer holds no grid data.
    ///
    /// Cells are addressed as `row * map_cols + col` with no wrapping:
    /// callers pre-wrap both coordinates into the map grid (the renderer
    /// always does).
    pub fn gid_at(&self, row: usize, col: usize) -> Option<u32> {
        match &self.kind {
            LayerKind::Tiles { data } => Some(data[row * self.map_cols + col]),
            LayerKind::Objects { .. } => None,
        }
    }

    /// Write a GID at `(row, col)`; returns `false` (no mutation) on
    /// object-group layers. Used by game logic to toggle marker cells at
    /// runtime.
    pub fn set_gid(&mut self, row: usize, col: usize, value: u32) -> bool {
        match &mut self.kind {
            LayerKind::Tiles { data } => {
                data[row * self.map_cols + col] = value;
                true
            }
            LayerKind::Objects { .. } => false,
        }
    }

    /// Objects of an object-group layer; empty for tile layers.
    pub fn objects(&self) -> &[TiledObject] {
        match &self.kind {
            LayerKind::Objects { objects } => objects,
            LayerKind::Tiles { .. } => &[],
        }
    }

    /// First object with the given name, or `None` for tile layers and
    /// unknown names.
    pub fn object_by_name(&self, name: &str) -> Option<&TiledObject> {
        self.objects().iter().find(|o| o.name == name)
    }

    /// First object (declaration order) whose rectangle intersects `query`.
    ///
    /// Declaration order matters when objects overlap; warp triggers rely
    /// on the earlier object winning.
    pub fn object_intersecting(&self, query: Rect) -> Option<&TiledObject> {
        self.objects()
            .iter()
            .find(|o| rects_intersect(o.rect(), query))
    }
}
