use macroquad::prelude::*;
use macroquad_tiled_scroll::{AtlasStore, MapSettings, TiledMap};

const TILE: f32 = 16.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Basic Map".into(),
        window_width: 640,
        window_height: 360,
        ..Default::default()
    }
}

// A 24x24 torus with a striped ground layer, so the wraparound seam is easy
// to spot while scrolling.
fn build_map(screen: Vec2) -> TiledMap {
    let data: Vec<u32> = (0..24 * 24).map(|i| 1 + ((i / 24 + i % 24) % 4) as u32).collect();
    let json = format!(
        r#"{{
            "width": 24, "height": 24, "tilewidth": 16, "tileheight": 16,
            "layers": [
                {{ "name": "ground", "type": "tilelayer",
                   "width": 24, "height": 24, "data": {data:?} }}
            ],
            "tilesets": [
                {{ "firstgid": 1, "name": "atlas", "image": "atlas.png",
                   "imagewidth": 64, "imageheight": 16,
                   "tilewidth": 16, "tileheight": 16 }}
            ]
        }}"#
    );
    TiledMap::from_str(&json, &MapSettings::new(screen.x, screen.y, TILE, TILE))
        .expect("demo map is well-formed")
}

// Four solid-color 16px tiles in a row.
fn build_atlas() -> Texture2D {
    let colors = [DARKGREEN, GREEN, LIME, DARKBROWN];
    let mut img = Image::gen_image_color(64, 16, WHITE);
    for (i, color) in colors.iter().enumerate() {
        for y in 0..16 {
            for x in 0..16 {
                img.set_pixel(i as u32 * 16 + x, y, *color);
            }
        }
    }
    let tex = Texture2D::from_image(&img);
    tex.set_filter(FilterMode::Nearest);
    tex
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let screen = vec2(screen_width(), screen_height());
    let map = build_map(screen);
    let mut store = AtlasStore::new();
    store.insert("atlas", build_atlas());

    // camera position in tile units; fractional part becomes the sub-tile
    // pixel offset
    let mut cam = vec2(0.0, 0.0);

    loop {
        let speed = 8.0 * get_frame_time();
        if is_key_down(KeyCode::Left) {
            cam.x -= speed;
        }
        if is_key_down(KeyCode::Right) {
            cam.x += speed;
        }
        if is_key_down(KeyCode::Up) {
            cam.y -= speed;
        }
        if is_key_down(KeyCode::Down) {
            cam.y += speed;
        }

        clear_background(BLACK);

        let (col, row) = (cam.x.floor(), cam.y.floor());
        let dx = (cam.x - col) * TILE;
        let dy = (cam.y - row) * TILE;
        map.draw(&mut store, row as i32, col as i32, dx, dy);

        draw_text(
            &format!("arrows scroll | FPS: {}", get_fps()),
            20.0,
            30.0,
            30.0,
            RED,
        );
        next_frame().await;
    }
}
