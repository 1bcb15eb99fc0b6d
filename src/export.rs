use std::io;
use std::path::Path;

use mesh_tools::compat::{point3, vector2, vector3};
use mesh_tools::{GltfBuilder, Triangle};

use crate::mesh::Mesh;

impl Mesh {
    /// Export the mesh to a GLB file
    ///
    /// # Arguments
    /// * `path` - The path to save the GLB file to
    pub fn save_glb<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let mut builder = GltfBuilder::new();

        // Smooth, reflective water so the normals read clearly in a viewer
        let water_material = builder.create_metallic_material(
            Some("WaterMaterial".to_string()),
            [0.0, 0.4, 0.8, 1.0],
            0.9,
            0.1,
        );

        if let Some(materials) = &mut builder.gltf.materials {
            if let Some(material) = materials.get_mut(water_material) {
                material.double_sided = Some(true);
            }
        }

        let positions: Vec<_> = self
            .vertices
            .iter()
            .map(|v| point3::new(v.position.x, v.position.y, v.position.z))
            .collect();
        let normals: Vec<_> = self
            .vertices
            .iter()
            .map(|v| vector3::new(v.normal.x, v.normal.y, v.normal.z))
            .collect();
        let texcoords: Vec<_> = self
            .vertices
            .iter()
            .map(|v| vector2::new(v.uv.x, v.uv.y))
            .collect();

        let triangles: Vec<Triangle> = self
            .faces
            .iter()
            .map(|face| Triangle::new(face.0, face.1, face.2))
            .collect();

        let mesh_index = builder.create_simple_mesh(
            Some("SurfaceMesh".to_string()),
            &positions,
            &triangles,
            Some(normals),
            Some(texcoords),
            Some(water_material),
        );

        let node_index = builder.add_node(
            Some("Surface".to_string()),
            Some(mesh_index),
            None,
            None,
            None,
        );

        let scene_index = builder.add_scene(Some("SurfaceScene".to_string()), Some(vec![node_index]));
        builder.gltf.scene = Some(scene_index);

        let path_str = path.to_str().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "Output path is not valid UTF-8")
        })?;

        builder.export_glb(path_str).map_err(|e| {
            io::Error::new(io::ErrorKind::Other, format!("Failed to export GLB: {}", e))
        })?;

        Ok(())
    }
}
