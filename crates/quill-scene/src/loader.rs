//! Scene loading from TOML files

use crate::format::SceneFile;
use crate::scene::Scene;
use crate::view::Viewport;
use quill_core::Result;
use std::fs;
use std::path::Path;

/// Load a scene and its view from a TOML file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<(Scene, Viewport, SceneFile)> {
    let content = fs::read_to_string(path)?;
    load_scene_string(&content)
}

/// Load a scene and its view from a TOML string
///
/// Meshes are added and selected in name order, not file order, so when two
/// selected surfaces tie on hit distance the one with the smaller name wins.
pub fn load_scene_string(content: &str) -> Result<(Scene, Viewport, SceneFile)> {
    let scene_file: SceneFile = toml::from_str(content)?;
    let mut scene = Scene::new();

    for (name, def) in &scene_file.meshes {
        let mesh = def.to_mesh(name)?;
        let id = if def.intermediate {
            scene.add_intermediate_mesh(name.clone(), mesh)?
        } else {
            scene.add_mesh(name.clone(), mesh)?
        };
        if def.selected {
            scene.select(id)?;
        }
    }

    let view = Viewport::new(
        scene_file.view.camera.clone(),
        scene_file.view.width,
        scene_file.view.height,
    );
    log::info!(
        "loaded scene '{}' with {} meshes",
        scene_file.scene.name,
        scene.entity_count()
    );
    Ok((scene, view, scene_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SelectionSource;

    const SCENE: &str = r#"
[scene]
name = "table"

[view]
width = 400
height = 300

[view.camera]
position = [0.0, 10.0, 10.0]
target = [0.0, 0.0, 0.0]

[meshes.floor]
kind = "quad"
half_size = [10.0, 10.0]
selected = true

[meshes.crate]
kind = "box"
center = [0.0, 1.0, 0.0]
half_extents = [1.0, 1.0, 1.0]
selected = true

[meshes.crateOrig]
kind = "box"
half_extents = [1.0, 1.0, 1.0]
intermediate = true
selected = true

[meshes.ramp]
kind = "triangles"
vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
triangles = [[0, 1, 2]]
"#;

    #[test]
    fn test_load_scene_string() {
        let (scene, view, file) = load_scene_string(SCENE).unwrap();
        assert_eq!(file.scene.name, "table");
        assert_eq!(scene.entity_count(), 4);
        assert_eq!(view.width, 400.0);
        assert!((view.camera.aspect - 4.0 / 3.0).abs() < 1e-12);

        let surfaces = scene.selected_surfaces();
        assert_eq!(surfaces.len(), 2);
        assert!(surfaces.contains(&scene.get_id("floor").unwrap()));
        assert!(surfaces.contains(&scene.get_id("crate").unwrap()));
    }

    #[test]
    fn test_selection_follows_mesh_name_order() {
        let content = r#"
[scene]
name = "order"

[meshes.zeta]
kind = "quad"
half_size = [1.0, 1.0]
selected = true

[meshes.alpha]
kind = "quad"
half_size = [1.0, 1.0]
selected = true
"#;
        let (scene, _, _) = load_scene_string(content).unwrap();
        let alpha = scene.get_id("alpha").unwrap();
        let zeta = scene.get_id("zeta").unwrap();
        assert_eq!(scene.selected_surfaces(), vec![alpha, zeta]);
    }

    #[test]
    fn test_missing_shape_field() {
        let bad = r#"
[scene]
name = "bad"

[meshes.floor]
kind = "quad"
"#;
        let err = load_scene_string(bad).unwrap_err();
        assert!(err.to_string().contains("half_size"));
    }

    #[test]
    fn test_unknown_kind() {
        let bad = r#"
[scene]
name = "bad"

[meshes.floor]
kind = "sphere"
"#;
        assert!(load_scene_string(bad).is_err());
    }
}
