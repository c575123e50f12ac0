use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3, Zero};
use wgpu::Device;

use crate::{
    gfx::{geometry::GeometryData, resources::material::Material},
    wgpu_utils::uniform_buffer::UniformBuffer,
};

use super::vertex::Vertex3D;

/// Triangle mesh kept on the CPU for picking and uploaded once for drawing.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat `[x, y, z, ...]` position and normal arrays.
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Self {
        let vertices = positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
            })
            .collect();

        Self::from_vertices(vertices, indices)
    }

    pub fn from_vertices(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self::from_vertices(vertices, indices)
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Iterates the mesh triangles as position triples in object space.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let fetch = |i: u32| {
                self.vertices
                    .get(i as usize)
                    .map(|v| Vector3::from(v.position))
            };
            Some([fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?])
        })
    }

    /// Per-vertex normals averaged from the adjacent faces, for meshes that
    /// come without any.
    pub fn calculate_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];
        let position = |i: usize| {
            Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
        };

        for triangle in indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            if i0.max(i1).max(i2) >= vertex_count {
                continue;
            }

            let face_normal = (position(i1) - position(i0)).cross(position(i2) - position(i0));

            for vertex_idx in [i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal.x;
                normals[vertex_idx * 3 + 1] += face_normal.y;
                normals[vertex_idx * 3 + 2] += face_normal.z;
            }
        }

        for normal in normals.chunks_exact_mut(3) {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                normal.iter_mut().for_each(|c| *c /= length);
            }
        }

        normals
    }

    fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Composes the model matrix as `T * Rx * Ry * Rz * S`.
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(cgmath::Rad(self.rotation.x))
            * Matrix4::from_angle_y(cgmath::Rad(self.rotation.y))
            * Matrix4::from_angle_z(cgmath::Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

/// Per-object uniform data. MUST match `ObjectUniform` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    /// metallic, roughness, receive_shadow, unused
    pub params: [f32; 4],
}

pub struct ObjectGpuResources {
    uniform: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

/// A named, renderable scene node
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub transform: Transform,
    pub material: Material,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Create a new Object with identity transformation and default material
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self {
            name: String::new(),
            meshes,
            transform: Transform::default(),
            material: Material::default(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            gpu_resources: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.transform.matrix()
    }

    pub fn uniform(&self) -> ObjectUniform {
        let model = self.model_matrix();
        let normal_matrix = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);

        ObjectUniform {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            base_color: self.material.color.to_linear_rgba(1.0),
            params: [
                self.material.metallic,
                self.material.roughness,
                if self.receive_shadow { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    /// Uploads mesh buffers and creates the per-object uniform binding.
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &wgpu::BindGroupLayout) {
        for mesh in self.meshes.iter_mut() {
            mesh.init_gpu_resources(device);
        }

        let uniform = UniformBuffer::new_with_data(device, &self.uniform());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.binding_resource(),
            }],
        });

        log::debug!(
            "uploaded object '{}' ({} meshes)",
            self.name,
            self.meshes.len()
        );

        self.gpu_resources = Some(ObjectGpuResources {
            uniform,
            bind_group,
        });
    }

    /// Writes the current transform and material to the GPU if they changed.
    pub fn sync_gpu(&mut self, queue: &wgpu::Queue) {
        let content = self.uniform();
        if let Some(gpu) = self.gpu_resources.as_mut() {
            gpu.uniform.update_content(queue, content);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|gpu| &gpu.bind_group)
    }
}

pub trait DrawObject {
    fn draw_mesh(&mut self, mesh: &Mesh);
    fn draw_object(&mut self, object: &Object);
}

impl DrawObject for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    /// Binds the object's uniform at group 1 and draws all of its meshes.
    fn draw_object(&mut self, object: &Object) {
        let Some(bind_group) = object.bind_group() else {
            return;
        };
        self.set_bind_group(1, bind_group, &[]);
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}
