use macroquad::prelude::*;
use macroquad_tiled_scroll::{AtlasStore, MapSettings, TiledMap};

const TILE: f32 = 16.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Objects Example".into(),
        window_width: 640,
        window_height: 360,
        ..Default::default()
    }
}

fn build_map(screen: Vec2) -> TiledMap {
    let data: Vec<u32> = vec![1; 16 * 16];
    let json = format!(
        r#"{{
            "width": 16, "height": 16, "tilewidth": 16, "tileheight": 16,
            "layers": [
                {{ "name": "ground", "type": "tilelayer",
                   "width": 16, "height": 16, "data": {data:?} }},
                {{ "name": "triggers", "type": "objectgroup",
                   "objects": [
                     {{ "name": "warp",  "x": 32.0, "y": 32.0, "width": 32.0, "height": 32.0,
                        "properties": [{{ "name": "target", "type": "string", "value": "cave" }}] }},
                     {{ "name": "chest", "x": 128.0, "y": 96.0, "width": 16.0, "height": 16.0 }}
                   ] }}
            ],
            "tilesets": [
                {{ "firstgid": 1, "name": "atlas", "image": "atlas.png",
                   "imagewidth": 16, "imageheight": 16,
                   "tilewidth": 16, "tileheight": 16 }}
            ]
        }}"#
    );
    TiledMap::from_str(&json, &MapSettings::new(screen.x, screen.y, TILE, TILE))
        .expect("demo map is well-formed")
}

fn build_atlas() -> Texture2D {
    let img = Image::gen_image_color(16, 16, DARKGREEN);
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

    let center_row = 8;
    let center_col = 8;

    loop {
        clear_background(BLACK);
        map.draw(&mut store, center_row, center_col, 0.0, 0.0);

        // screen-space origin of map pixel (0,0) for this camera
        let origin = vec2(
            screen.x / 2.0 - (center_col as f32 * TILE + TILE / 2.0),
            screen.y / 2.0 - (center_row as f32 * TILE + TILE / 2.0),
        );

        let triggers = map.layer("triggers").expect("triggers layer");
        for obj in triggers.objects() {
            draw_rectangle_lines(
                origin.x + obj.x,
                origin.y + obj.y,
                obj.width,
                obj.height,
                2.0,
                YELLOW,
            );
        }

        let mouse = Vec2::from(mouse_position()) - origin;
        let probe = Rect::new(mouse.x, mouse.y, 1.0, 1.0);
        let label = match triggers.object_intersecting(probe) {
            Some(obj) => format!(
                "over '{}' (target: {})",
                obj.name,
                obj.properties.get_string("target").unwrap_or("-")
            ),
            None => "hover an object".to_string(),
        };
        draw_text(&label, 20.0, 30.0, 30.0, WHITE);

        next_frame().await;
    }
}
