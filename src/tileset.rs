use crate::loader::json_loader::RawTileset;
use macroquad::prelude::Rect;

/// Metadata for one tileset image atlas.
///
/// All pixel-valued fields are `f32` and already carry any scale applied
/// through [`TileSet::set_scale`]; the atlas geometry (column count, source
/// rectangles) is derived from them on demand.
#[derive(Debug, Clone)]
pub struct TileSet {
    /// Tileset name, also the key under which the host registers its texture.
    pub name: String,
    /// Global ID of this set's first tile (>= 1).
    pub first_gid: u32,
    /// Atlas image path as exported, possibly rewritten at load time.
    pub image: String,
    /// Atlas image width in pixels.
    pub image_width: f32,
    /// Atlas image height in pixels.
    pub image_height: f32,
    /// Outer margin around the atlas grid, in pixels.
    pub margin: f32,
    /// Spacing between adjacent cells, in pixels.
    pub spacing: f32,
    /// Width of one tile cell.
    pub tile_width: f32,
    /// Height of one tile cell.
    pub tile_height: f32,
}

impl TileSet {
    pub(crate) fn from_raw(raw: RawTileset) -> Self {
        TileSet {
            name: raw.name,
            first_gid: raw.firstgid,
            image: raw.image,
            image_width: raw.imagewidth as f32,
            image_height: raw.imageheight as f32,
            margin: raw.margin as f32,
            spacing: raw.spacing as f32,
            tile_width: raw.tilewidth as f32,
            tile_height: raw.tileheight as f32,
        }
    }

    /// Number of tile columns in the atlas image.
    ///
    /// Exported atlases with inter-tile spacing carry no trailing spacing
    /// after the last column, so a remainder of exactly one tile width
    /// counts as an extra column.
    pub fn atlas_cols(&self) -> u32 {
        let stride = self.tile_width + self.spacing;
        if stride <= 0.0 {
            return 0;
        }
        let mut cols = (self.image_width / stride).floor() as u32;
        if self.spacing > 0.0 && self.image_width - cols as f32 * stride == self.tile_width {
            cols += 1;
        }
        cols
    }

    /// Number of tile rows in the atlas image.
    pub fn atlas_rows(&self) -> u32 {
        let stride = self.tile_height + self.spacing;
        if stride <= 0.0 {
            return 0;
        }
        let mut rows = (self.image_height / stride).floor() as u32;
        if self.spacing > 0.0 && self.image_height - rows as f32 * stride == self.tile_height {
            rows += 1;
        }
        rows
    }

    /// Total number of tiles in the atlas.
    pub fn tile_count(&self) -> u32 {
        self.atlas_cols() * self.atlas_rows()
    }

    /// Exclusive upper bound of this set's GID range.
    pub fn end_gid(&self) -> u32 {
        self.first_gid + self.tile_count()
    }

    /// Atlas source rectangle of a local tile index (`gid - first_gid`).
    pub fn src_rect(&self, local: u32) -> Rect {
        let cols = self.atlas_cols().max(1);
        let col = local % cols;
        let row = local / cols;
        Rect::new(
            self.margin + col as f32 * (self.tile_width + self.spacing),
            self.margin + row as f32 * (self.tile_height + self.spacing),
            self.tile_width,
            self.tile_height,
        )
    }

    /// Multiply every pixel-valued field by `factor`, in place.
    ///
    /// Repeated calls compound multiplicatively; callers track the
    /// cumulative scale themselves.
    pub fn set_scale(&mut self, factor: f32) {
        self.image_width *= factor;
        self.image_height *= factor;
        self.margin *= factor;
        self.spacing *= factor;
        self.tile_width *= factor;
        self.tile_height *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(image_w: f32, image_h: f32, tile: f32, margin: f32, spacing: f32) -> TileSet {
        TileSet {
            name: "t".into(),
            first_gid: 1,
            image: "t.png".into(),
            image_width: image_w,
            image_height: image_h,
            margin,
            spacing,
            tile_width: tile,
            tile_height: tile,
        }
    }

    #[test]
    fn atlas_cols_without_spacing() {
        let ts = plain(128.0, 64.0, 16.0, 0.0, 0.0);
        assert_eq!(ts.atlas_cols(), 8);
        assert_eq!(ts.atlas_rows(), 4);
        assert_eq!(ts.tile_count(), 32);
    }

    #[test]
    fn atlas_cols_counts_trailing_column_with_spacing() {
        // 4 columns of 16px with 1px spacing: 16+1+16+1+16+1+16 = 67px,
        // so the last column has no trailing spacing.
        let ts = plain(67.0, 16.0, 16.0, 0.0, 1.0);
        assert_eq!(ts.atlas_cols(), 4);
    }

    #[test]
    fn src_rect_walks_rows_and_columns() {
        let ts = plain(64.0, 64.0, 16.0, 0.0, 0.0);
        assert_eq!(ts.src_rect(0), Rect::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(ts.src_rect(3), Rect::new(48.0, 0.0, 16.0, 16.0));
        assert_eq!(ts.src_rect(4), Rect::new(0.0, 16.0, 16.0, 16.0));
    }

    #[test]
    fn src_rect_honours_margin_and_spacing() {
        let ts = plain(70.0, 70.0, 16.0, 2.0, 1.0);
        assert_eq!(ts.src_rect(0), Rect::new(2.0, 2.0, 16.0, 16.0));
        assert_eq!(ts.src_rect(1), Rect::new(19.0, 2.0, 16.0, 16.0));
    }

    #[test]
    fn set_scale_multiplies_every_pixel_field() {
        let mut ts = plain(128.0, 64.0, 16.0, 2.0, 1.0);
        ts.set_scale(2.0);
        assert_eq!(ts.tile_width, 32.0);
        assert_eq!(ts.tile_height, 32.0);
        assert_eq!(ts.image_width, 256.0);
        assert_eq!(ts.margin, 4.0);
        assert_eq!(ts.spacing, 2.0);
        // grid shape is scale-invariant
        assert_eq!(ts.atlas_cols(), plain(128.0, 64.0, 16.0, 2.0, 1.0).atlas_cols());
    }
}
