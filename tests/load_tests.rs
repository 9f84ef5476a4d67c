// tests/load_tests.rs

use std::fs;
use std::path::PathBuf;

use macroquad_tiled_scroll::{MapError, MapSettings, TiledMap};

const SMALL_MAP: &str = r#"
{
    "width": 2,
    "height": 2,
    "tilewidth": 8,
    "tileheight": 8,
    "layers": [
        { "name": "ground", "type": "tilelayer", "width": 2, "height": 2, "data": [1, 0, 0, 2] }
    ],
    "tilesets": [
        { "firstgid": 1, "name": "tiles", "image": "tiles.png",
          "imagewidth": 16, "imageheight": 8, "tilewidth": 8, "tileheight": 8 }
    ]
}
"#;

#[test]
fn integration_load_from_str_and_file() {
    let settings = MapSettings::authored_tiles(64.0, 64.0);

    let map = TiledMap::from_str(SMALL_MAP, &settings).expect("should parse inline JSON");
    assert_eq!(map.col_count, 2);
    assert_eq!(map.row_count, 2);
    assert_eq!(map.tile_width, 8.0);

    let mut path = PathBuf::from(std::env::temp_dir());
    path.push("mq_tiled_scroll_load_test.json");
    fs::write(&path, SMALL_MAP).unwrap();
    let map2 = TiledMap::load_from_file(&path, &settings).unwrap();
    assert_eq!(map2.tile_height, 8.0);
    assert_eq!(map2.layer_count(), 1);
    fs::remove_file(&path).unwrap();
}

#[test]
fn integration_runtime_tile_size_overrides_authored() {
    let settings = MapSettings::new(64.0, 64.0, 16.0, 16.0);
    let map = TiledMap::from_str(SMALL_MAP, &settings).expect("map");
    assert_eq!(map.tile_width, 16.0);
    assert_eq!(map.screen_cols, 4);
    assert_eq!(map.pixel_width(), 32.0);
}

#[test]
fn integration_unsupported_format() {
    let err = TiledMap::load_from_file("foo.tmx", &MapSettings::authored_tiles(64.0, 64.0))
        .unwrap_err();
    match err {
        MapError::UnsupportedFormat(name) => assert_eq!(name, "foo.tmx"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn integration_missing_file_is_io_error() {
    let err = TiledMap::load_from_file(
        "definitely_not_here.json",
        &MapSettings::authored_tiles(64.0, 64.0),
    )
    .unwrap_err();
    assert!(matches!(err, MapError::Io { .. }));
}
