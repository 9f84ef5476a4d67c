use crate::error::MapError;
use crate::properties::{Properties, PropertyValue};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}

/// One `{name, type, value}` property record as exported.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    /// Property name
    pub name: String,
    /// Declared type, when the exporter wrote one
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Untyped JSON value
    pub value: JsonValue,
}

/// One object record of an object-group layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObject {
    /// Object id assigned by the editor
    #[serde(default)]
    pub id: u32,
    /// Object name ("" when unnamed)
    #[serde(default)]
    pub name: String,
    /// Tile reference for tile-stamp objects
    #[serde(default)]
    pub gid: Option<u32>,
    /// Left edge in pixels
    #[serde(default)]
    pub x: f32,
    /// Top edge in pixels
    #[serde(default)]
    pub y: f32,
    /// Width in pixels
    #[serde(default)]
    pub width: f32,
    /// Height in pixels
    #[serde(default)]
    pub height: f32,
    /// Object properties
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

/// One layer record: a tile grid or an object group.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLayer {
    /// Layer name
    #[serde(default)]
    pub name: String,
    /// Width in tiles
    #[serde(default)]
    pub width: usize,
    /// Height in tiles
    #[serde(default)]
    pub height: usize,
    /// "tilelayer" or "objectgroup"; absent means tile layer
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Flat row-major GIDs (tile layers)
    #[serde(default)]
    pub data: Vec<u32>,
    /// Objects (object groups)
    #[serde(default)]
    pub objects: Vec<RawObject>,
    /// Blend opacity
    #[serde(default = "one")]
    pub opacity: f32,
    /// Render flag
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Layer properties
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

/// One embedded tileset record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTileset {
    /// Global ID of the first tile
    pub firstgid: u32,
    /// Atlas image path, editor-relative
    pub image: String,
    /// Atlas image width in pixels
    pub imagewidth: u32,
    /// Atlas image height in pixels
    pub imageheight: u32,
    /// Outer margin in pixels
    #[serde(default)]
    pub margin: u32,
    /// Inter-cell spacing in pixels
    #[serde(default)]
    pub spacing: u32,
    /// Tile cell width in pixels
    pub tilewidth: u32,
    /// Tile cell height in pixels
    pub tileheight: u32,
    /// Tileset name
    #[serde(default)]
    pub name: String,
}

/// The whole map export.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMap {
    /// Grid width in tiles (columns)
    pub width: usize,
    /// Grid height in tiles (rows)
    pub height: usize,
    /// Tile width the map was authored at
    pub tilewidth: u32,
    /// Tile height the map was authored at
    pub tileheight: u32,
    /// Layers in draw order, bottom first
    pub layers: Vec<RawLayer>,
    /// Embedded tilesets
    #[serde(default)]
    pub tilesets: Vec<RawTileset>,
    /// Map-level properties
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

fn property_to_value(prop: RawProperty) -> Result<Option<(String, PropertyValue)>, MapError> {
    let RawProperty { name, kind, value } = prop;

    let parsed = match kind.as_deref() {
        Some("bool") => value.as_bool().map(PropertyValue::Bool),
        Some("int") | Some("object") => value.as_i64().map(PropertyValue::I64),
        Some("float") => value.as_f64().map(|n| PropertyValue::F32(n as f32)),
        Some("string") | Some("file") | Some("color") | Some("class") => {
            value.as_str().map(|s| PropertyValue::String(s.to_owned()))
        }
        Some(other) => {
            return Err(MapError::UnsupportedPropertyType {
                name,
                kind: other.to_owned(),
            });
        }
        None => {
            if let Some(v) = value.as_bool() {
                Some(PropertyValue::Bool(v))
            } else if let Some(v) = value.as_i64() {
                Some(PropertyValue::I64(v))
            } else if let Some(v) = value.as_f64() {
                Some(PropertyValue::F32(v as f32))
            } else {
                value.as_str().map(|s| PropertyValue::String(s.to_owned()))
            }
        }
    };

    Ok(parsed.map(|value| (name, value)))
}

pub(crate) fn properties_from_raw(props: Vec<RawProperty>) -> Result<Properties, MapError> {
    let mut out = Properties::new();
    for p in props {
        if let Some((name, value)) = property_to_value(p)? {
            out.insert(name, value);
        }
    }
    Ok(out)
}

/// Decode a map export from an in-memory JSON string.
pub fn decode_map_str(json: &str) -> Result<RawMap, MapError> {
    serde_json::from_str(json).map_err(|source| MapError::Json {
        path: PathBuf::from("<string>"),
        source,
    })
}

/// Decode a map export from a `.json` file on disk.
pub fn decode_map_file(path: impl AsRef<Path>) -> Result<RawMap, MapError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(p.display().to_string()));
    }

    let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    log::debug!("decoding map file {}", p.display());
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: p.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_tiled_scroll_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn parses_properties_for_map_layer_and_object() {
        let json = r#"{
          "width": 2,
          "height": 2,
          "tilewidth": 16,
          "tileheight": 16,
          "properties": [
            {"name":"is_night","type":"bool","value":true},
            {"name":"gravity","type":"float","value":9.8},
            {"name":"theme","type":"string","value":"forest"}
          ],
          "layers": [
            {
              "type":"tilelayer",
              "name":"ground",
              "width":2,
              "height":2,
              "data":[1,0,0,0],
              "properties":[
                {"name":"is_solid","type":"bool","value":true},
                {"name":"difficulty","type":"int","value":3}
              ]
            },
            {
              "type":"objectgroup",
              "name":"spawns",
              "objects":[
                {
                  "id": 7,
                  "name":"spawn_1",
                  "x": 4.0, "y": 8.0, "width": 16.0, "height": 16.0,
                  "properties":[{"name":"kind","type":"string","value":"player"}]
                }
              ]
            }
          ],
          "tilesets":[{
            "firstgid":1, "name":"tiles", "image":"tiles.png",
            "imagewidth":32, "imageheight":32, "tilewidth":16, "tileheight":16
          }]
        }"#;

        let raw = decode_map_str(json).expect("decode");

        let map_props = properties_from_raw(raw.properties).expect("map props");
        assert_eq!(map_props.get_bool("is_night"), Some(true));
        assert_eq!(map_props.get_f32("gravity"), Some(9.8));
        assert_eq!(map_props.get_string("theme"), Some("forest"));

        let layer_props = properties_from_raw(raw.layers[0].properties.clone()).expect("props");
        assert_eq!(layer_props.get_bool("is_solid"), Some(true));
        assert_eq!(layer_props.get_i32("difficulty"), Some(3));

        let obj = &raw.layers[1].objects[0];
        let obj_props = properties_from_raw(obj.properties.clone()).expect("props");
        assert_eq!(obj_props.get_string("kind"), Some("player"));
    }

    #[test]
    fn keeps_large_int_property_values() {
        let props = properties_from_raw(vec![RawProperty {
            name: "big_id".into(),
            kind: Some("object".into()),
            value: serde_json::json!(5_000_000_000u64),
        }])
        .expect("props");

        assert_eq!(props.get_i64("big_id"), Some(5_000_000_000));
        assert_eq!(props.get_i32("big_id"), None);
    }

    #[test]
    fn infers_untyped_property_values() {
        let props = properties_from_raw(vec![
            RawProperty {
                name: "flag".into(),
                kind: None,
                value: serde_json::json!(true),
            },
            RawProperty {
                name: "label".into(),
                kind: None,
                value: serde_json::json!("warp"),
            },
        ])
        .expect("props");

        assert_eq!(props.get_bool("flag"), Some(true));
        assert_eq!(props.get_string("label"), Some("warp"));
    }

    #[test]
    fn returns_typed_error_for_unknown_property_type() {
        let err = properties_from_raw(vec![RawProperty {
            name: "mystery".into(),
            kind: Some("not_supported".into()),
            value: serde_json::json!("x"),
        }])
        .err()
        .expect("expected property error");
        assert!(matches!(err, MapError::UnsupportedPropertyType { .. }));
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        fs::write(&map_path, "{ not json").expect("failed to write map");

        let err = decode_map_file(&map_path).err().expect("expected decode error");
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn rejects_non_json_extension_before_reading() {
        let err = decode_map_file("overworld.tmx").err().expect("expected error");
        assert!(matches!(err, MapError::UnsupportedFormat(name) if name == "overworld.tmx"));
    }
}
