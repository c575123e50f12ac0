use wgpu::Device;

use crate::gfx::resources::material::Color;

use super::{
    light::{AmbientLight, DirectionalLight},
    object::Object,
};

/// Main scene containing background, lights and objects
pub struct Scene {
    pub background: Color,
    pub ambient_light: AmbientLight,
    pub directional_light: DirectionalLight,
    pub objects: Vec<Object>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl Scene {
    /// Creates an empty scene with default lights
    pub fn new(background: Color) -> Self {
        Self {
            background,
            ambient_light: AmbientLight::default(),
            directional_light: DirectionalLight::default(),
            objects: Vec::new(),
        }
    }

    /// Appends an object and returns its index.
    pub fn add_object(&mut self, object: Object) -> usize {
        log::debug!("adding object '{}' to scene", object.name);
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Index of the first object carrying `name`.
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|obj| obj.name == name)
    }

    /// First object carrying `name`.
    pub fn find_object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|obj| obj.name == name)
    }

    pub fn find_object_mut(&mut self, name: &str) -> Option<&mut Object> {
        self.objects.iter_mut().find(|obj| obj.name == name)
    }

    /// Gets immutable reference to an object by index
    pub fn get_object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    /// Gets mutable reference to an object by index
    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.objects.get_mut(index)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn get_object_names(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.name.clone()).collect()
    }

    /// Uploads every object that has not been uploaded yet.
    ///
    /// Objects may be appended at any time (e.g. when a model load completes),
    /// so this runs before every frame and is a no-op once all are resident.
    pub fn init_gpu_resources(&mut self, device: &Device, object_layout: &wgpu::BindGroupLayout) {
        for object in self
            .objects
            .iter_mut()
            .filter(|object| !object.has_gpu_resources())
        {
            object.init_gpu_resources(device, object_layout);
        }
    }

    /// Syncs transforms and materials of all objects to the GPU.
    pub fn sync_gpu(&mut self, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            object.sync_gpu(queue);
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let total_triangles = self
            .objects
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.index_count() / 3).sum::<u32>())
            .sum();

        let total_vertices = self
            .objects
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.vertices().len() as u32).sum::<u32>())
            .sum();

        SceneStatistics {
            object_count: self.objects.len(),
            total_triangles,
            total_vertices,
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{geometry::generate_box, scene::object::Mesh};

    fn named_box(name: &str) -> Object {
        Object::new(vec![Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0))]).with_name(name)
    }

    #[test]
    fn test_add_and_find_by_name() {
        let mut scene = Scene::new(Color::from_hex(0x202025));
        assert_eq!(scene.add_object(named_box("a")), 0);
        assert_eq!(scene.add_object(named_box("b")), 1);

        assert_eq!(scene.find_index("b"), Some(1));
        assert!(scene.find_object("missing").is_none());
        assert_eq!(scene.get_object_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut scene = Scene::default();
        scene.add_object(named_box("dup"));
        scene.add_object(named_box("dup"));
        assert_eq!(scene.find_index("dup"), Some(0));
    }

    #[test]
    fn test_statistics() {
        let mut scene = Scene::default();
        scene.add_object(named_box("a"));
        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 1);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_vertices, 24);
    }
}
