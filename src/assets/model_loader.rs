//! Background OBJ loading
//!
//! The file is parsed with `tobj` on a worker thread. The finished
//! [`Object`] (or the error) is handed back to the event loop, which is the
//! only place the scene is mutated.

use std::{
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};

use cgmath::Vector3;
use winit::event_loop::EventLoopProxy;

use crate::{
    app::AppEvent,
    error::ModelLoadError,
    gfx::{
        resources::material::{Color, Material},
        scene::{Mesh, Object, Scene},
    },
};

/// Fixed transform applied to a model once it has loaded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPlacement {
    pub scale: f32,
    pub position: Vector3<f32>,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Reads an OBJ file (and its MTL, if any) into a single scene object.
///
/// Every model in the file becomes one mesh. Missing normals are computed
/// from the faces. The diffuse color of the first model's material is used
/// when present.
pub fn load_obj_object(path: &Path, placement: ModelPlacement) -> Result<Object, ModelLoadError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| ModelLoadError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|e| {
        log::debug!("no materials for '{}': {}", path.display(), e);
        Vec::new()
    });

    let meshes: Vec<Mesh> = models
        .iter()
        .map(|model| &model.mesh)
        .filter(|mesh| !mesh.indices.is_empty())
        .map(|mesh| {
            // Use normals from the file if they line up, otherwise calculate them
            let normals = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals.clone()
            } else {
                Mesh::calculate_vertex_normals(&mesh.positions, &mesh.indices)
            };
            Mesh::new(mesh.positions.clone(), normals, mesh.indices.clone())
        })
        .collect();

    if meshes.is_empty() {
        return Err(ModelLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut material = Material::default();
    if let Some(mtl) = models
        .first()
        .and_then(|model| model.mesh.material_id)
        .and_then(|id| materials.get(id))
    {
        let [r, g, b] = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
        material = Material::new(&mtl.name, Color::rgb(r, g, b))
            .with_roughness(1.0 - (mtl.shininess.unwrap_or(32.0) / 128.0).clamp(0.0, 1.0));
    }

    let name = models
        .first()
        .map(|model| model.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

    let Vector3 { x, y, z } = placement.position;
    Ok(Object::new(meshes)
        .with_name(name)
        .with_material(material)
        .with_position(x, y, z)
        .with_uniform_scale(placement.scale)
        .with_shadows(true, true))
}

/// Starts loads on worker threads
pub struct ModelLoader;

impl ModelLoader {
    /// Loads `path` in the background and posts the result to the event loop.
    pub fn spawn(
        path: PathBuf,
        placement: ModelPlacement,
        proxy: EventLoopProxy<AppEvent>,
    ) -> JoinHandle<()> {
        Self::spawn_with(path, placement, move |result| {
            if proxy.send_event(AppEvent::ModelLoaded(result)).is_err() {
                log::warn!("event loop closed before the model finished loading");
            }
        })
    }

    /// Loads `path` in the background and hands the result to `deliver`.
    pub fn spawn_with<F>(path: PathBuf, placement: ModelPlacement, deliver: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Object, ModelLoadError>) + Send + 'static,
    {
        log::info!("loading model '{}'", path.display());
        thread::spawn(move || deliver(load_obj_object(&path, placement)))
    }
}

/// What happened to a finished load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Added { index: usize, name: String },
    /// Carries the message that was logged
    Failed { message: String },
}

/// Appends a loaded model to the scene, or logs the failure.
///
/// A failed load leaves the scene untouched.
pub fn handle_model_loaded(
    scene: &mut Scene,
    result: Result<Object, ModelLoadError>,
) -> LoadOutcome {
    match result {
        Ok(object) => {
            let name = object.name.clone();
            let index = scene.add_object(object);
            let stats = scene.get_statistics();
            log::info!(
                "model '{}' loaded; scene has {} objects, {} triangles, {} vertices",
                name,
                stats.object_count,
                stats.total_triangles,
                stats.total_vertices
            );
            LoadOutcome::Added { index, name }
        }
        Err(e) => {
            let message = format!("model load failed: {}", e);
            log::error!("{}", message);
            LoadOutcome::Failed { message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, sync::mpsc};

    const TRIANGLE_OBJ: &str = "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn temp_obj(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hoverscene_{}_{}.obj", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_leaves_scene_unchanged() {
        let mut scene = Scene::default();
        let result = load_obj_object(Path::new("does/not/exist.obj"), ModelPlacement::default());
        assert!(matches!(result, Err(ModelLoadError::Obj { .. })));

        match handle_model_loaded(&mut scene, result) {
            LoadOutcome::Failed { message } => {
                assert!(message.starts_with("model load failed"));
                assert!(message.contains("does/not/exist.obj"));
            }
            other => panic!("expected a failed load, got {:?}", other),
        }
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.get_statistics().total_triangles, 0);
    }

    #[test]
    fn test_loaded_model_is_placed_and_appended() {
        let path = temp_obj("triangle", TRIANGLE_OBJ);
        let placement = ModelPlacement {
            scale: 2.0,
            position: Vector3::new(0.0, 1.0, 0.0),
        };
        let object = load_obj_object(&path, placement).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(object.name, "tri");
        assert_eq!(object.transform.scale, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(object.transform.position, Vector3::new(0.0, 1.0, 0.0));
        // Normals were computed from the face
        assert_eq!(object.meshes[0].vertices()[0].normal, [0.0, 0.0, 1.0]);

        let mut scene = Scene::default();
        let outcome = handle_model_loaded(&mut scene, Ok(object));
        assert_eq!(
            outcome,
            LoadOutcome::Added {
                index: 0,
                name: "tri".to_string()
            }
        );
        assert_eq!(scene.object_count(), 1);
        assert_eq!(scene.get_statistics().total_triangles, 1);
    }

    #[test]
    fn test_file_without_faces_is_empty() {
        let path = temp_obj("empty", "v 0 0 0\nv 1 0 0\n");
        let result = load_obj_object(&path, ModelPlacement::default());
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ModelLoadError::Empty { .. })));
    }

    #[test]
    fn test_background_load_delivers_result() {
        let (sender, receiver) = mpsc::channel();
        ModelLoader::spawn_with(
            PathBuf::from("does/not/exist.obj"),
            ModelPlacement::default(),
            move |result| sender.send(result.is_err()).unwrap(),
        )
        .join()
        .unwrap();

        assert!(receiver.recv().unwrap());
    }
}
