use crate::map::TiledMap;
use crate::tileset::TileSet;
use anyhow::Context;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Drawing collaborator of [`TiledMap::draw`].
///
/// The map resolves which tileset owns a tile and where its pixels sit in
/// the atlas; the blitter owns the actual surfaces and performs the copy.
/// The map never loads images itself.
pub trait TileBlitter {
    /// Blit `src` (an atlas sub-rectangle of `tileset`'s image) to the
    /// screen rectangle `dest`, blended at `opacity`.
    fn blit(&mut self, tileset: &TileSet, src: Rect, dest: Rect, opacity: f32);
}

/// Macroquad-backed blitter: one texture per tileset, keyed by name.
#[derive(Default)]
pub struct AtlasStore {
    textures: HashMap<String, Texture2D>,
}

impl AtlasStore {
    /// Empty store; register textures with [`AtlasStore::insert`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the atlas image of every tileset in `map`, resolving image
    /// paths relative to `base_dir`.
    pub async fn load_for_map(map: &TiledMap, base_dir: &Path) -> anyhow::Result<Self> {
        let mut store = Self::new();
        for ts in map.tilesets() {
            let img_path = base_dir.join(&ts.image);
            let tex = load_texture(&img_path.to_string_lossy())
                .await
                .with_context(|| format!("Loading texture {}", ts.image))?;
            tex.set_filter(FilterMode::Nearest);
            store.insert(ts.name.clone(), tex);
        }
        Ok(store)
    }

    /// Register (or replace) the texture for a tileset name.
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture2D) {
        self.textures.insert(name.into(), texture);
    }

    /// Texture registered for a tileset name.
    pub fn texture(&self, name: &str) -> Option<&Texture2D> {
        self.textures.get(name)
    }
}

impl TileBlitter for AtlasStore {
    fn blit(&mut self, tileset: &TileSet, src: Rect, dest: Rect, opacity: f32) {
        let Some(tex) = self.textures.get(&tileset.name) else {
            log::warn!("no texture registered for tileset '{}'", tileset.name);
            return;
        };
        draw_texture_ex(
            tex,
            dest.x,
            dest.y,
            Color::new(1.0, 1.0, 1.0, opacity),
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                source: Some(src),
                ..Default::default()
            },
        );
    }
}
