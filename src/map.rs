use crate::error::MapError;
use crate::layer::{LayerKind, TiledLayer, GID_MASK};
use crate::loader::json_loader::{
    decode_map_file, decode_map_str, properties_from_raw, RawLayer, RawMap,
};
use crate::properties::Properties;
use crate::render::backend::TileBlitter;
use crate::tileset::TileSet;
use macroquad::prelude::Rect;
use std::collections::HashMap;
use std::path::Path;

/// Construction arguments for a [`TiledMap`]: the viewport in pixels, the
/// runtime tile size, and an optional rewrite of tileset image paths from
/// their editor-relative form to wherever the host keeps its assets.
#[derive(Clone, Copy)]
pub struct MapSettings<'a> {
    /// Viewport width in pixels.
    pub screen_width: f32,
    /// Viewport height in pixels.
    pub screen_height: f32,
    /// Runtime tile width; non-positive falls back to the authored value.
    pub tile_width: f32,
    /// Runtime tile height; non-positive falls back to the authored value.
    pub tile_height: f32,
    /// Applied to every tileset's image path at load time.
    pub image_path_rewrite: Option<&'a dyn Fn(&str) -> String>,
}

impl<'a> MapSettings<'a> {
    /// Settings with an explicit runtime tile size.
    pub fn new(screen_width: f32, screen_height: f32, tile_width: f32, tile_height: f32) -> Self {
        MapSettings {
            screen_width,
            screen_height,
            tile_width,
            tile_height,
            image_path_rewrite: None,
        }
    }

    /// Settings that keep the tile size the map was authored at.
    pub fn authored_tiles(screen_width: f32, screen_height: f32) -> Self {
        Self::new(screen_width, screen_height, 0.0, 0.0)
    }

    /// Attach an image-path rewrite function.
    pub fn with_image_path_rewrite(mut self, rewrite: &'a dyn Fn(&str) -> String) -> Self {
        self.image_path_rewrite = Some(rewrite);
        self
    }
}

/// A loaded Tiled map: layers, tilesets, and the camera-centered scrolling
/// renderer. The map grid is toroidal — scrolling past one edge reveals the
/// opposite one.
#[derive(Debug)]
pub struct TiledMap {
    /// Grid height in tiles.
    pub row_count: usize,
    /// Grid width in tiles.
    pub col_count: usize,
    /// Current tile width in pixels (scaled).
    pub tile_width: f32,
    /// Current tile height in pixels (scaled).
    pub tile_height: f32,
    /// Viewport width in pixels. Never scaled.
    pub screen_width: f32,
    /// Viewport height in pixels. Never scaled.
    pub screen_height: f32,
    /// Whole tiles fitting the viewport vertically, rounded up.
    pub screen_rows: usize,
    /// Whole tiles fitting the viewport horizontally, rounded up.
    pub screen_cols: usize,
    /// Map-level properties.
    pub properties: Properties,
    layers: Vec<TiledLayer>,
    layers_by_name: HashMap<String, usize>,
    object_groups: Vec<usize>,
    tilesets: Vec<TileSet>,
}

impl TiledMap {
    /// Build a map from a decoded export record.
    pub fn from_raw(raw: RawMap, settings: &MapSettings) -> Result<Self, MapError> {
        if raw.width == 0 || raw.height == 0 {
            return Err(MapError::InvalidMap("map grid has zero extent".into()));
        }

        let tile_width = if settings.tile_width > 0.0 {
            settings.tile_width
        } else {
            raw.tilewidth as f32
        };
        let tile_height = if settings.tile_height > 0.0 {
            settings.tile_height
        } else {
            raw.tileheight as f32
        };
        if tile_width <= 0.0 || tile_height <= 0.0 {
            return Err(MapError::InvalidMap("tile size must be positive".into()));
        }

        let mut tilesets: Vec<TileSet> = raw.tilesets.into_iter().map(TileSet::from_raw).collect();
        tilesets.sort_by_key(|t| t.first_gid);
        for pair in tilesets.windows(2) {
            if pair[0].end_gid() > pair[1].first_gid {
                return Err(MapError::InvalidMap(format!(
                    "tilesets '{}' and '{}' have overlapping GID ranges",
                    pair[0].name, pair[1].name
                )));
            }
        }
        if let Some(rewrite) = settings.image_path_rewrite {
            for ts in &mut tilesets {
                ts.image = rewrite(&ts.image);
            }
        }

        let mut map = TiledMap {
            row_count: raw.height,
            col_count: raw.width,
            tile_width,
            tile_height,
            screen_width: settings.screen_width,
            screen_height: settings.screen_height,
            screen_rows: (settings.screen_height / tile_height).ceil() as usize,
            screen_cols: (settings.screen_width / tile_width).ceil() as usize,
            properties: properties_from_raw(raw.properties)?,
            layers: Vec::new(),
            layers_by_name: HashMap::new(),
            object_groups: Vec::new(),
            tilesets,
        };
        for record in raw.layers {
            map.add_layer(record)?;
        }
        Ok(map)
    }

    /// Build a map from an in-memory JSON export.
    pub fn from_str(json: &str, settings: &MapSettings) -> Result<Self, MapError> {
        Self::from_raw(decode_map_str(json)?, settings)
    }

    /// Load a map from a `.json` file on disk.
    pub fn load_from_file(path: impl AsRef<Path>, settings: &MapSettings) -> Result<Self, MapError> {
        Self::from_raw(decode_map_file(path)?, settings)
    }

    /// Layers in draw order, bottom first.
    pub fn layers(&self) -> &[TiledLayer] {
        &self.layers
    }

    /// Tilesets in ascending `first_gid` order.
    pub fn tilesets(&self) -> &[TileSet] {
        &self.tilesets
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer by position in draw order.
    pub fn layer_by_index(&self, index: usize) -> Option<&TiledLayer> {
        self.layers.get(index)
    }

    /// First layer with the given name.
    pub fn layer(&self, name: &str) -> Option<&TiledLayer> {
        self.layers_by_name.get(name).map(|&i| &self.layers[i])
    }

    /// Mutable access to the first layer with the given name.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut TiledLayer> {
        let idx = *self.layers_by_name.get(name)?;
        Some(&mut self.layers[idx])
    }

    /// Object-group layers, in draw order.
    pub fn object_groups(&self) -> impl Iterator<Item = &TiledLayer> {
        self.object_groups.iter().map(move |&i| &self.layers[i])
    }

    /// Append a layer built from an export record.
    ///
    /// Tile-layer records must match the map grid and reference only GIDs
    /// claimed by some tileset.
    pub fn add_layer(&mut self, record: RawLayer) -> Result<(), MapError> {
        let layer = TiledLayer::from_raw(record, self.col_count)?;
        if let LayerKind::Tiles { data } = layer.kind() {
            if layer.width != self.col_count || layer.height != self.row_count {
                return Err(MapError::InvalidMap(format!(
                    "layer '{}' is {}x{} but the map grid is {}x{}",
                    layer.name, layer.width, layer.height, self.col_count, self.row_count
                )));
            }
            let max_gid = self.max_gid();
            for &raw_gid in data {
                let gid = raw_gid & GID_MASK;
                if gid != 0 && gid > max_gid {
                    return Err(MapError::InvalidTileGid {
                        layer: layer.name.clone(),
                        gid,
                        max_gid,
                    });
                }
            }
        }
        self.layers.push(layer);
        self.reindex();
        Ok(())
    }

    /// Remove the first layer matching by name from every index it was
    /// added to. Returns whether a match was found.
    pub fn remove_layer(&mut self, name: &str) -> bool {
        let Some(pos) = self.layers.iter().position(|l| l.name == name) else {
            return false;
        };
        self.layers.remove(pos);
        self.reindex();
        true
    }

    // Derived caches are rebuilt wholesale on every mutation so they can
    // never drift from `layers`. First occurrence of a name wins.
    fn reindex(&mut self) {
        self.layers_by_name.clear();
        self.object_groups.clear();
        for (i, layer) in self.layers.iter().enumerate() {
            self.layers_by_name.entry(layer.name.clone()).or_insert(i);
            if layer.is_object_group() {
                self.object_groups.push(i);
            }
        }
    }

    fn max_gid(&self) -> u32 {
        self.tilesets.last().map(|t| t.end_gid() - 1).unwrap_or(0)
    }

    /// Resolve a GID to its owning tileset and local tile index.
    ///
    /// Flip bits are masked off first; GID 0 (and anything no tileset
    /// claims) resolves to `None`.
    pub fn tileset_for_gid(&self, raw_gid: u32) -> Option<(&TileSet, u32)> {
        let gid = raw_gid & GID_MASK;
        if gid == 0 {
            return None;
        }
        let ts = self.tilesets.iter().rev().find(|t| t.first_gid <= gid)?;
        if gid >= ts.end_gid() {
            return None;
        }
        Some((ts, gid - ts.first_gid))
    }

    /// Render every tile intersecting the viewport, across all visible
    /// layers, bottom to top.
    ///
    /// The camera is centered on tile `(center_row, center_col)` with a
    /// sub-tile pixel offset `(dx, dy)` for smooth scrolling between tiles.
    /// The grid is treated as a torus: the scan wraps row/col indices, so
    /// any center is valid, including negative ones.
    pub fn draw<B: TileBlitter>(
        &self,
        blitter: &mut B,
        center_row: i32,
        center_col: i32,
        dx: f32,
        dy: f32,
    ) {
        if self.row_count == 0 || self.col_count == 0 {
            return;
        }

        // Camera focal point in continuous map pixels, then the viewport's
        // top-left corner in the same space. Both can go negative near the
        // logical origin.
        let cx = center_col as f32 * self.tile_width + dx + self.tile_width / 2.0;
        let cy = center_row as f32 * self.tile_height + dy + self.tile_height / 2.0;
        let x0 = cx - self.screen_width / 2.0;
        let y0 = cy - self.screen_height / 2.0;

        // floor(), not truncation: a negative corner must round toward
        // negative infinity or the seam tile is off by one.
        let top_left_col = (x0 / self.tile_width).floor() as i64;
        let top_left_row = (y0 / self.tile_height).floor() as i64;

        // Screen-space cursor of that tile; zero or negative when the tile
        // is partially scrolled off the edge.
        let start_x = top_left_col as f32 * self.tile_width - x0;
        let start_y = top_left_row as f32 * self.tile_height - y0;

        let first_row = top_left_row.rem_euclid(self.row_count as i64) as usize;
        let first_col = top_left_col.rem_euclid(self.col_count as i64) as usize;

        let mut row = first_row;
        let mut y = start_y;
        while y < self.screen_height {
            let mut col = first_col;
            let mut x = start_x;
            while x < self.screen_width {
                for layer in &self.layers {
                    if !layer.visible {
                        continue;
                    }
                    let Some(raw_gid) = layer.gid_at(row, col) else {
                        continue;
                    };
                    if raw_gid & GID_MASK == 0 {
                        continue;
                    }
                    self.draw_tile(blitter, x, y, raw_gid, layer.opacity);
                }
                col = (col + 1) % self.col_count;
                x += self.tile_width;
            }
            row = (row + 1) % self.row_count;
            y += self.tile_height;
        }
    }

    // One blit per visible cell. An unclaimed GID degrades to a hole, never
    // a dropped frame.
    fn draw_tile<B: TileBlitter>(&self, blitter: &mut B, x: f32, y: f32, raw_gid: u32, opacity: f32) {
        let Some((ts, local)) = self.tileset_for_gid(raw_gid) else {
            log::warn!("no tileset claims GID {}, skipping tile", raw_gid & GID_MASK);
            return;
        };
        let src = ts.src_rect(local);
        let dest = Rect::new(x, y, self.tile_width, self.tile_height);
        blitter.blit(ts, src, dest, opacity);
    }

    /// Rescale the map's tile size and every owned tileset by `factor`,
    /// and recompute the viewport's row/column capacity. Repeated calls
    /// compound multiplicatively.
    pub fn set_scale(&mut self, factor: f32) {
        self.tile_width *= factor;
        self.tile_height *= factor;
        self.screen_rows = (self.screen_height / self.tile_height).ceil() as usize;
        self.screen_cols = (self.screen_width / self.tile_width).ceil() as usize;
        for ts in &mut self.tilesets {
            ts.set_scale(factor);
        }
    }

    /// Map width in pixels at the current tile size.
    pub fn pixel_width(&self) -> f32 {
        self.col_count as f32 * self.tile_width
    }

    /// Map height in pixels at the current tile size.
    pub fn pixel_height(&self) -> f32 {
        self.row_count as f32 * self.tile_height
    }
}
