//! glTF export
//!
//! Writes a [`Scene`] as glTF 2.0. The node hierarchy mirrors the scene's
//! assemblies under one root node that turns the Z-up generation frame into
//! glTF's Y-up frame. Primitive nodes reference unit meshes and carry their
//! dimensions in the node scale, so every box of one material shares one mesh.

use std::collections::{BTreeMap, HashMap};
use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use glam::{Quat, Vec3};
use gltf::json::{
    self,
    accessor::{ComponentType, GenericComponentType, Type},
    buffer::Target,
    material::{AlphaMode, PbrBaseColorFactor, PbrMetallicRoughness, StrengthFactor},
    mesh::{Mode, Semantic},
    scene::UnitQuaternion,
    validation::{Checked::Valid, USize64},
    Index,
};

use crate::core::{Error, Result};
use crate::geometry::font::{self, TextSpec};
use crate::geometry::mesh::{ROUND_SEGMENTS, SPHERE_RINGS};
use crate::geometry::MeshData;
use crate::scene::{MaterialId, NodeContent, Scene, SceneNodeId, Shape};

/// How the binary buffer is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// `<name>.gltf` plus `<name>.bin` beside it.
    #[default]
    Separate,
    /// Single `.gltf` with the buffer inlined as a base64 data URI.
    Embedded,
}

/// What was written.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportSummary {
    pub gltf_path: PathBuf,
    /// Set for [`ExportFormat::Separate`] when the scene has geometry.
    pub bin_path: Option<PathBuf>,
    pub node_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub primitive_count: usize,
    pub buffer_bytes: usize,
}

/// Identity of a geometry buffer. Unit meshes are keyed by kind, text by content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum GeometryKey {
    Box,
    Cylinder,
    Sphere,
    Text {
        body: String,
        size: u32,
        extrusion: u32,
        bottom: bool,
    },
}

impl GeometryKey {
    fn of(shape: &Shape) -> Self {
        match shape {
            Shape::Box { .. } => GeometryKey::Box,
            Shape::Cylinder { .. } => GeometryKey::Cylinder,
            Shape::Sphere { .. } => GeometryKey::Sphere,
            Shape::Text(spec) => GeometryKey::Text {
                body: spec.body.clone(),
                size: spec.size.to_bits(),
                extrusion: spec.extrusion.to_bits(),
                bottom: spec.align_y == font::VerticalAlign::Bottom,
            },
        }
    }

    fn label(&self) -> String {
        match self {
            GeometryKey::Box => "box".into(),
            GeometryKey::Cylinder => "cylinder".into(),
            GeometryKey::Sphere => "sphere".into(),
            GeometryKey::Text { body, .. } => format!("text_{body}"),
        }
    }
}

/// Accessors for one uploaded geometry.
#[derive(Clone, Copy, Debug)]
struct GeometryAccessors {
    position: Index<json::Accessor>,
    normal: Index<json::Accessor>,
    indices: Index<json::Accessor>,
}

fn unit_mesh(shape: &Shape) -> MeshData {
    match shape {
        Shape::Box { .. } => MeshData::unit_box(),
        Shape::Cylinder { .. } => MeshData::unit_cylinder(ROUND_SEGMENTS),
        Shape::Sphere { .. } => MeshData::unit_sphere(ROUND_SEGMENTS, SPHERE_RINGS),
        Shape::Text(spec) => font::text_mesh(spec),
    }
}

fn text_is_blank(spec: &TextSpec) -> bool {
    spec.body.trim().is_empty()
}

/// Append `value` to a root collection and return its typed index.
fn push<T>(list: &mut Vec<T>, value: T) -> Index<T> {
    let index = Index::new(list.len() as u32);
    list.push(value);
    index
}

struct Builder<'a> {
    scene: &'a Scene,
    root: json::Root,
    bin: Vec<u8>,
    geometry: HashMap<GeometryKey, Option<GeometryAccessors>>,
    meshes: HashMap<(GeometryKey, MaterialId), Index<json::Mesh>>,
    materials: HashMap<MaterialId, Index<json::Material>>,
    primitive_count: usize,
}

impl<'a> Builder<'a> {
    fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            root: json::Root::default(),
            bin: Vec::new(),
            geometry: HashMap::new(),
            meshes: HashMap::new(),
            materials: HashMap::new(),
            primitive_count: 0,
        }
    }

    fn push_materials(&mut self) {
        for material in self.scene.materials().iter() {
            let p = &material.params;
            let blended = p.is_blended();
            let index = push(
                &mut self.root.materials,
                json::Material {
                    name: Some(material.name.clone()),
                    pbr_metallic_roughness: PbrMetallicRoughness {
                        base_color_factor: PbrBaseColorFactor(p.rgba()),
                        metallic_factor: StrengthFactor(p.metallic),
                        roughness_factor: StrengthFactor(p.roughness),
                        ..Default::default()
                    },
                    alpha_mode: Valid(if blended { AlphaMode::Blend } else { AlphaMode::Opaque }),
                    double_sided: blended,
                    ..Default::default()
                },
            );
            self.materials.insert(material.id, index);
        }
    }

    /// Append `bytes` to the binary buffer behind a new view.
    fn push_view(&mut self, bytes: &[u8], target: Target) -> Index<json::buffer::View> {
        let view = json::buffer::View {
            buffer: Index::new(0),
            byte_length: USize64(bytes.len() as u64),
            byte_offset: Some(USize64(self.bin.len() as u64)),
            byte_stride: None,
            name: None,
            target: Some(Valid(target)),
            extensions: Default::default(),
            extras: Default::default(),
        };
        self.bin.extend_from_slice(bytes);
        push(&mut self.root.buffer_views, view)
    }

    fn push_accessor(
        &mut self,
        view: Index<json::buffer::View>,
        component_type: ComponentType,
        count: usize,
        kind: Type,
        bounds: Option<(Vec3, Vec3)>,
    ) -> Index<json::Accessor> {
        let (min, max) = match bounds {
            Some((min, max)) => (
                Some(json::Value::from(min.to_array().to_vec())),
                Some(json::Value::from(max.to_array().to_vec())),
            ),
            None => (None, None),
        };
        let accessor = json::Accessor {
            buffer_view: Some(view),
            byte_offset: Some(USize64(0)),
            count: USize64(count as u64),
            component_type: Valid(GenericComponentType(component_type)),
            type_: Valid(kind),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
            extensions: Default::default(),
            extras: Default::default(),
        };
        push(&mut self.root.accessors, accessor)
    }

    /// Upload geometry once per key. Blank text yields `None`.
    fn geometry_for(&mut self, shape: &Shape) -> Option<GeometryAccessors> {
        let key = GeometryKey::of(shape);
        if let Some(cached) = self.geometry.get(&key) {
            return *cached;
        }
        let uploaded = match shape {
            Shape::Text(spec) if text_is_blank(spec) => None,
            _ => {
                let mesh = unit_mesh(shape);
                if mesh.is_empty() { None } else { Some(self.upload(&mesh)) }
            }
        };
        self.geometry.insert(key, uploaded);
        uploaded
    }

    fn upload(&mut self, mesh: &MeshData) -> GeometryAccessors {
        let bounds = mesh.bounds();
        let vertices = mesh.vertex_count();

        let view = self.push_view(bytemuck::cast_slice(&mesh.positions), Target::ArrayBuffer);
        let position =
            self.push_accessor(view, ComponentType::F32, vertices, Type::Vec3, Some((bounds.min, bounds.max)));

        let view = self.push_view(bytemuck::cast_slice(&mesh.normals), Target::ArrayBuffer);
        let normal = self.push_accessor(view, ComponentType::F32, vertices, Type::Vec3, None);

        let view = self.push_view(bytemuck::cast_slice(&mesh.indices), Target::ElementArrayBuffer);
        let indices = self.push_accessor(view, ComponentType::U32, mesh.indices.len(), Type::Scalar, None);

        GeometryAccessors { position, normal, indices }
    }

    /// One glTF mesh per (geometry, material) pair.
    fn mesh_for(&mut self, shape: &Shape, material: MaterialId) -> Result<Option<Index<json::Mesh>>> {
        let key = (GeometryKey::of(shape), material);
        if let Some(index) = self.meshes.get(&key) {
            return Ok(Some(*index));
        }
        let Some(geometry) = self.geometry_for(shape) else {
            return Ok(None);
        };
        let (material_index, material_name) = self
            .materials
            .get(&material)
            .zip(self.scene.materials().get(material))
            .map(|(index, m)| (*index, m.name.as_str()))
            .ok_or_else(|| Error::Export(format!("unregistered material {:?}", material)))?;

        let mut attributes = BTreeMap::new();
        attributes.insert(Valid(Semantic::Positions), geometry.position);
        attributes.insert(Valid(Semantic::Normals), geometry.normal);

        let mesh = json::Mesh {
            name: Some(format!("{}_{}", key.0.label(), material_name)),
            primitives: vec![json::mesh::Primitive {
                attributes,
                indices: Some(geometry.indices),
                material: Some(material_index),
                mode: Valid(Mode::Triangles),
                targets: None,
                extensions: Default::default(),
                extras: Default::default(),
            }],
            weights: None,
            extensions: Default::default(),
            extras: Default::default(),
        };
        let index = push(&mut self.root.meshes, mesh);
        self.meshes.insert(key, index);
        Ok(Some(index))
    }

    /// Emit `id` and its subtree; returns the glTF node index.
    fn visit(&mut self, id: SceneNodeId) -> Result<Index<json::Node>> {
        let scene = self.scene;
        let node = scene
            .graph()
            .get(id)
            .ok_or_else(|| Error::Export(format!("dangling node {:?}", id)))?;

        // Reserve the slot so parents precede their children.
        let index = push(&mut self.root.nodes, json::Node::default());

        let mut children = Vec::new();
        for child in scene.graph().children(id) {
            children.push(self.visit(child)?);
        }

        let t = &node.local_transform;
        let mut out = json::Node {
            name: Some(node.name.clone()),
            children: (!children.is_empty()).then_some(children),
            translation: (t.position != Vec3::ZERO).then(|| t.position.to_array()),
            rotation: (t.rotation != Quat::IDENTITY).then(|| UnitQuaternion(t.rotation.to_array())),
            scale: (t.scale != Vec3::ONE).then(|| t.scale.to_array()),
            ..Default::default()
        };

        if let NodeContent::Primitive { shape, material } = &node.content {
            out.mesh = self.mesh_for(shape, *material)?;
            let scale = t.scale * shape.mesh_scale();
            out.scale = (scale != Vec3::ONE).then(|| scale.to_array());
            self.primitive_count += 1;
        }

        self.root.nodes[index.value()] = out;
        Ok(index)
    }

    fn build(mut self) -> Result<(json::Root, Vec<u8>, usize)> {
        self.root.asset.generator = Some(concat!("facade ", env!("CARGO_PKG_VERSION")).into());
        self.push_materials();

        // Root wrapper: Z-up generation frame to Y-up glTF frame.
        let wrapper = push(
            &mut self.root.nodes,
            json::Node {
                name: Some(self.scene.name().to_string()),
                rotation: Some(UnitQuaternion(Quat::from_rotation_x(-FRAC_PI_2).to_array())),
                ..Default::default()
            },
        );
        let mut children = Vec::new();
        for child in self.scene.graph().children(self.scene.root()) {
            children.push(self.visit(child)?);
        }
        if !children.is_empty() {
            self.root.nodes[wrapper.value()].children = Some(children);
        }

        let scene = push(
            &mut self.root.scenes,
            json::Scene {
                name: Some(self.scene.name().to_string()),
                nodes: vec![wrapper],
                extensions: Default::default(),
                extras: Default::default(),
            },
        );
        self.root.scene = Some(scene);

        let count = self.primitive_count;
        Ok((self.root, self.bin, count))
    }
}

/// Write `scene` to `path` (a `.gltf` file). Parent directories are created.
pub fn export_scene(scene: &Scene, path: &Path, format: ExportFormat) -> Result<ExportSummary> {
    let (mut root, bin, primitive_count) = Builder::new(scene).build()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut bin_path = None;
    if !bin.is_empty() {
        let uri = match format {
            ExportFormat::Separate => {
                let file = path.with_extension("bin");
                let name = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| Error::Export(format!("bad output path {}", path.display())))?
                    .to_string();
                std::fs::write(&file, &bin)?;
                bin_path = Some(file);
                name
            }
            ExportFormat::Embedded => format!(
                "data:application/octet-stream;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(&bin)
            ),
        };
        root.buffers.push(json::Buffer {
            byte_length: USize64(bin.len() as u64),
            name: None,
            uri: Some(uri),
            extensions: Default::default(),
            extras: Default::default(),
        });
    }

    let text = json::serialize::to_string_pretty(&root)?;
    std::fs::write(path, text)?;

    let summary = ExportSummary {
        gltf_path: path.to_path_buf(),
        bin_path,
        node_count: root.nodes.len(),
        mesh_count: root.meshes.len(),
        material_count: root.materials.len(),
        primitive_count,
        buffer_bytes: bin.len(),
    };
    log::info!(
        "exported {} ({} nodes, {} meshes, {} materials, {} bytes)",
        path.display(),
        summary.node_count,
        summary.mesh_count,
        summary.material_count,
        summary.buffer_bytes
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{build_building, place_wall_text, BuildingParams, WallSide};
    use crate::environment::{build_tree, TreeSpec};
    use glam::Vec2;
    use serde_json::Value;
    use tempfile::TempDir;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new("sample");
        let building = build_building(&mut scene, "B", &BuildingParams::default()).unwrap();
        place_wall_text(&mut scene, &building, "HI", 1, WallSide::Front, [0.1, 0.1, 0.1]).unwrap();
        build_tree(&mut scene, &TreeSpec::new("Tree_0", Vec2::new(5.0, -2.0), 4.0)).unwrap();
        scene
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_separate_writes_bin_beside_gltf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/sample.gltf");
        let summary = export_scene(&sample_scene(), &path, ExportFormat::Separate).unwrap();

        let bin = summary.bin_path.clone().unwrap();
        assert_eq!(bin, dir.path().join("out/sample.bin"));
        assert_eq!(std::fs::metadata(&bin).unwrap().len() as usize, summary.buffer_bytes);

        let json = read_json(&path);
        assert_eq!(json["buffers"][0]["uri"], "sample.bin");
        assert_eq!(json["asset"]["version"], "2.0");
    }

    #[test]
    fn test_embedded_inlines_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.gltf");
        let summary = export_scene(&sample_scene(), &path, ExportFormat::Embedded).unwrap();
        assert!(summary.bin_path.is_none());
        assert!(!dir.path().join("sample.bin").exists());

        let json = read_json(&path);
        let uri = json["buffers"][0]["uri"].as_str().unwrap();
        let data = uri.strip_prefix("data:application/octet-stream;base64,").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(data).unwrap();
        assert_eq!(decoded.len(), summary.buffer_bytes);
    }

    #[test]
    fn test_root_converts_to_y_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.gltf");
        export_scene(&sample_scene(), &path, ExportFormat::Separate).unwrap();
        let json = read_json(&path);

        assert_eq!(json["scenes"][0]["nodes"], serde_json::json!([0]));
        let root = &json["nodes"][0];
        assert_eq!(root["name"], "sample");
        let q: Vec<f32> = root["rotation"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap() as f32)
            .collect();
        let rot = Quat::from_array([q[0], q[1], q[2], q[3]]);
        assert!((rot * Vec3::Z - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_meshes_shared_per_shape_and_material() {
        let scene = sample_scene();
        let dir = TempDir::new().unwrap();
        let summary = export_scene(&scene, &dir.path().join("s.gltf"), ExportFormat::Separate).unwrap();

        // Building boxes use 4 materials, text 1, tree trunk cylinder and leaf sphere 1 each.
        assert_eq!(summary.mesh_count, 4 + 1 + 2);
        assert!(summary.primitive_count > summary.mesh_count);
        assert_eq!(summary.material_count, scene.materials().len());
    }

    #[test]
    fn test_hierarchy_mirrors_assemblies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.gltf");
        export_scene(&sample_scene(), &path, ExportFormat::Separate).unwrap();
        let json = read_json(&path);
        let nodes = json["nodes"].as_array().unwrap();

        let root_children: Vec<&str> = json["nodes"][0]["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| nodes[i.as_u64().unwrap() as usize]["name"].as_str().unwrap())
            .collect();
        assert_eq!(root_children, vec!["B", "Tree_0"]);

        let roof = nodes.iter().find(|n| n["name"] == "B_Roof").unwrap();
        assert!(roof["mesh"].is_u64());
        let scale: Vec<f64> = roof["scale"].as_array().unwrap().iter().map(|v| v.as_f64().unwrap()).collect();
        assert!((scale[0] - 10.3).abs() < 1e-4);
    }

    #[test]
    fn test_position_accessor_has_bounds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.gltf");
        export_scene(&sample_scene(), &path, ExportFormat::Separate).unwrap();
        let json = read_json(&path);
        for mesh in json["meshes"].as_array().unwrap() {
            let pos = mesh["primitives"][0]["attributes"]["POSITION"].as_u64().unwrap() as usize;
            let accessor = &json["accessors"][pos];
            assert!(accessor["min"].is_array());
            assert!(accessor["max"].is_array());
        }
    }

    #[test]
    fn test_blended_materials() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.gltf");
        export_scene(&sample_scene(), &path, ExportFormat::Separate).unwrap();
        let json = read_json(&path);
        let glass = json["materials"].as_array().unwrap().iter().find(|m| m["name"] == "B_Glass").unwrap();
        assert_eq!(glass["alphaMode"], "BLEND");
        assert_eq!(glass["doubleSided"], true);
        let wall = json["materials"].as_array().unwrap().iter().find(|m| m["name"] == "B_Wall").unwrap();
        assert!(wall.get("alphaMode").is_none_or(|mode| mode == "OPAQUE"));
    }

    #[test]
    fn test_empty_scene_exports_without_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.gltf");
        let summary = export_scene(&Scene::new("empty"), &path, ExportFormat::Separate).unwrap();
        assert_eq!(summary.node_count, 1);
        assert!(summary.bin_path.is_none());
        assert_eq!(summary.buffer_bytes, 0);
        let json = read_json(&path);
        assert!(json.get("buffers").is_none_or(|b| b.as_array().is_some_and(|a| a.is_empty())));
    }

    #[test]
    fn test_output_loads_with_gltf_reader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.gltf");
        let summary = export_scene(&sample_scene(), &path, ExportFormat::Embedded).unwrap();

        let (document, buffers, _) = gltf::import(&path).unwrap();
        assert_eq!(document.nodes().count(), summary.node_count);
        assert_eq!(document.meshes().count(), summary.mesh_count);
        assert!(buffers[0].len() >= summary.buffer_bytes);

        let glass = document.materials().find(|m| m.name() == Some("B_Glass")).unwrap();
        assert_eq!(glass.alpha_mode(), gltf::material::AlphaMode::Blend);

        let mesh = document.meshes().next().unwrap();
        let primitive = mesh.primitives().next().unwrap();
        assert_eq!(primitive.mode(), gltf::mesh::Mode::Triangles);
        assert!(primitive.get(&gltf::Semantic::Positions).is_some());
        assert!(primitive.get(&gltf::Semantic::Normals).is_some());
        assert!(primitive.indices().is_some());
    }

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let err = export_scene(&sample_scene(), &blocker.join("s.gltf"), ExportFormat::Separate).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
