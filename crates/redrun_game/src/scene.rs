//! Parallax scene configuration.
//!
//! The background's layer stack is data, not code: a small JSON file names
//! the base texture and the ordered layer list with per-layer velocities
//! and vertical offsets. Layer order is depth order, nearest last.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ParallaxFile {
    pub version: String,
    pub scene_id: String,
    /// Texture key of the static backdrop drawn behind every layer.
    pub base: String,
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayerSpec {
    /// Texture key in the asset store.
    pub texture: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Horizontal scroll speed in pixels per tick. Negative: leftward.
    pub velocity_x: f32,
}

pub fn load_parallax_from_path(path: &Path) -> Result<ParallaxFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read parallax scene {}: {e}", path.display()))?;
    let scene: ParallaxFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse parallax scene {}: {e}", path.display()))?;
    validate_parallax(&scene)?;
    Ok(scene)
}

fn validate_parallax(scene: &ParallaxFile) -> Result<(), String> {
    if scene.version != "0.1" {
        return Err(format!(
            "Parallax validation failed: unsupported version '{}'",
            scene.version
        ));
    }
    if scene.base.is_empty() {
        return Err("Parallax validation failed: base texture key is empty".to_string());
    }
    if scene.layers.is_empty() {
        return Err("Parallax validation failed: layers array is empty".to_string());
    }

    let mut seen = HashSet::new();
    for (i, layer) in scene.layers.iter().enumerate() {
        if layer.texture.is_empty() {
            return Err(format!(
                "Parallax validation failed: layer {i} has an empty texture key"
            ));
        }
        if !seen.insert(layer.texture.clone()) {
            return Err(format!(
                "Parallax validation failed: duplicate layer texture '{}'",
                layer.texture
            ));
        }
        // The wraparound math assumes every layer scrolls leftward.
        if layer.velocity_x >= 0.0 {
            return Err(format!(
                "Parallax validation failed: layer '{}' must have a negative velocity_x (got {})",
                layer.texture, layer.velocity_x
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "redrun_scene_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_scene_file(path: &Path, body: &str) {
        fs::write(path, body).expect("failed to write temp scene file");
    }

    #[test]
    fn load_parallax_parses_valid_scene() {
        let path = temp_file_path("valid");
        let json = r#"
        {
          "version": "0.1",
          "scene_id": "steppe_run",
          "base": "background",
          "layers": [
            { "texture": "layer1", "velocity_x": -0.24 },
            { "texture": "layer2", "y": 27.0, "velocity_x": -0.5 }
          ]
        }
        "#;

        write_scene_file(&path, json);
        let scene = load_parallax_from_path(&path).expect("valid scene should load");
        assert_eq!(scene.scene_id, "steppe_run");
        assert_eq!(scene.base, "background");
        assert_eq!(scene.layers.len(), 2);
        assert_eq!(scene.layers[0].x, 0.0);
        assert_eq!(scene.layers[0].y, 0.0);
        assert_eq!(scene.layers[1].y, 27.0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_parallax_rejects_empty_layers() {
        let path = temp_file_path("empty_layers");
        let json = r#"
        {
          "version": "0.1",
          "scene_id": "steppe_run",
          "base": "background",
          "layers": []
        }
        "#;

        write_scene_file(&path, json);
        let err = load_parallax_from_path(&path).expect_err("empty layers should fail");
        assert!(err.contains("layers array is empty"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_parallax_rejects_rightward_layer() {
        let path = temp_file_path("rightward");
        let json = r#"
        {
          "version": "0.1",
          "scene_id": "steppe_run",
          "base": "background",
          "layers": [
            { "texture": "layer1", "velocity_x": 0.5 }
          ]
        }
        "#;

        write_scene_file(&path, json);
        let err = load_parallax_from_path(&path).expect_err("rightward layer should fail");
        assert!(err.contains("negative velocity_x"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_parallax_rejects_duplicate_layer_texture() {
        let path = temp_file_path("dup_texture");
        let json = r#"
        {
          "version": "0.1",
          "scene_id": "steppe_run",
          "base": "background",
          "layers": [
            { "texture": "layer1", "velocity_x": -0.5 },
            { "texture": "layer1", "velocity_x": -1.0 }
          ]
        }
        "#;

        write_scene_file(&path, json);
        let err = load_parallax_from_path(&path).expect_err("duplicate texture should fail");
        assert!(err.contains("duplicate layer texture"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_parallax_rejects_unknown_version() {
        let path = temp_file_path("bad_version");
        let json = r#"
        {
          "version": "9.9",
          "scene_id": "steppe_run",
          "base": "background",
          "layers": [
            { "texture": "layer1", "velocity_x": -0.5 }
          ]
        }
        "#;

        write_scene_file(&path, json);
        let err = load_parallax_from_path(&path).expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));

        let _ = fs::remove_file(path);
    }
}
