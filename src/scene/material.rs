//! Material registry
//!
//! Materials are created once and referenced by handle from any number of
//! primitives. Names are the identity: asking for an existing name with the
//! same parameters returns the cached handle, while different parameters
//! under the same name is an error.

use std::collections::HashMap;

use crate::core::{Error, Result};

/// Handle into a [`MaterialRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Flat shading parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    /// Linear RGB base color, each channel in [0, 1].
    pub base_color: [f32; 3],
    pub metallic: f32,
    pub roughness: f32,
    /// Opacity; anything below 1.0 switches the material to blending.
    pub alpha: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            base_color: [0.8, 0.8, 0.8],
            metallic: 0.0,
            roughness: 0.5,
            alpha: 1.0,
        }
    }
}

impl MaterialParams {
    /// Opaque dielectric with the given color.
    pub fn color(base_color: [f32; 3]) -> Self {
        Self {
            base_color,
            ..Default::default()
        }
    }

    pub fn metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Whether this material needs alpha blending.
    pub fn is_blended(&self) -> bool {
        self.alpha < 1.0
    }

    /// RGBA factor as written to interchange formats.
    pub fn rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.base_color;
        [r, g, b, self.alpha]
    }

    fn validate(&self, name: &str) -> Result<()> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        if !self.base_color.iter().all(|c| unit(*c)) {
            return Err(Error::Config(format!(
                "material {name}: base color {:?} outside [0, 1]",
                self.base_color
            )));
        }
        if !unit(self.metallic) || !unit(self.roughness) || !unit(self.alpha) {
            return Err(Error::Config(format!(
                "material {name}: metallic {}, roughness {}, alpha {} must lie in [0, 1]",
                self.metallic, self.roughness, self.alpha
            )));
        }
        Ok(())
    }
}

/// A registered material.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub params: MaterialParams,
}

/// Name-keyed store of every material in a scene.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
}

impl MaterialRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `name`, creating the material on first use.
    pub fn get_or_create(&mut self, name: impl Into<String>, params: MaterialParams) -> Result<MaterialId> {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            let existing = &self.materials[id.0 as usize];
            if existing.params != params {
                return Err(Error::MaterialConflict(format!(
                    "{name} already registered with {:?}, requested {:?}",
                    existing.params, params
                )));
            }
            return Ok(id);
        }

        params.validate(&name)?;

        let id = MaterialId(self.materials.len() as u32);
        log::trace!("material {} -> {:?}", name, id);
        self.by_name.insert(name.clone(), id);
        self.materials.push(Material { id, name, params });
        Ok(id)
    }

    /// Get a material by handle.
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Look up a handle by name.
    pub fn by_name(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    /// All materials in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_caches_by_name() {
        let mut reg = MaterialRegistry::new();
        let params = MaterialParams::color([0.15, 0.15, 0.15]).roughness(0.95);
        let a = reg.get_or_create("Asphalt", params).unwrap();
        let b = reg.get_or_create("Asphalt", params).unwrap();
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.by_name("Asphalt"), Some(a));
    }

    #[test]
    fn test_conflicting_params_rejected() {
        let mut reg = MaterialRegistry::new();
        reg.get_or_create("Wall", MaterialParams::color([0.9, 0.9, 0.9])).unwrap();
        let err = reg
            .get_or_create("Wall", MaterialParams::color([0.1, 0.1, 0.1]))
            .unwrap_err();
        assert!(matches!(err, Error::MaterialConflict(_)));
    }

    #[test]
    fn test_alpha_below_one_blends() {
        let glass = MaterialParams::color([0.6, 0.8, 0.9]).alpha(0.5);
        assert!(glass.is_blended());
        assert_eq!(glass.rgba(), [0.6, 0.8, 0.9, 0.5]);
        assert!(!MaterialParams::default().is_blended());
    }

    #[test]
    fn test_out_of_range_params_rejected() {
        let mut reg = MaterialRegistry::new();
        assert!(reg.get_or_create("Bad", MaterialParams::color([1.5, 0.0, 0.0])).is_err());
        assert!(reg.get_or_create("Bad", MaterialParams::default().roughness(-0.1)).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut reg = MaterialRegistry::new();
        let a = reg.get_or_create("A", MaterialParams::default()).unwrap();
        let b = reg.get_or_create("B", MaterialParams::default()).unwrap();
        assert_eq!(a, MaterialId(0));
        assert_eq!(b, MaterialId(1));
        let names: Vec<_> = reg.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }
}
