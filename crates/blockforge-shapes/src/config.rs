use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use blockforge_geom::{Aabb, Axis, Direction};
use serde::Deserialize;

use crate::ops::{flip_shape, rotate_shape};
use crate::shape::Shape;

// --- Config ---

// Top-level shapes file: [shapes.<name>] tables
#[derive(Deserialize, Debug, Default)]
pub struct ShapesConfig {
    #[serde(default)]
    pub shapes: HashMap<String, ShapeDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeDef {
    // Pixel units: [x0, y0, z0, x1, y1, z1]
    #[serde(default)]
    pub boxes: Vec<[f64; 6]>,
    // Optional mirror applied once at load time
    #[serde(default)]
    pub flip: Option<Axis>,
}

/// Named shapes. Each shape lives behind one `Arc` for the lifetime of the
/// library, so oriented lookups hit the rotation cache after the first call.
#[derive(Default, Clone, Debug)]
pub struct ShapeLibrary {
    shapes: HashMap<String, Arc<Shape>>,
}

impl ShapeLibrary {
    pub fn new() -> Self {
        Self {
            shapes: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, shape: Shape) -> Arc<Shape> {
        let shape = Arc::new(shape);
        self.shapes.insert(name.into(), Arc::clone(&shape));
        shape
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Shape>> {
        self.shapes.get(name)
    }

    /// `name` oriented to `facing`, via the process-wide rotation cache.
    pub fn oriented(&self, name: &str, facing: Direction) -> Option<Arc<Shape>> {
        self.get(name).map(|s| rotate_shape(s, facing))
    }

    /// Shape names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shapes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn from_config(cfg: ShapesConfig) -> Result<Self, Box<dyn Error>> {
        let mut lib = ShapeLibrary::new();
        for (name, def) in cfg.shapes {
            let mut boxes = Vec::with_capacity(def.boxes.len());
            for (i, [x0, y0, z0, x1, y1, z1]) in def.boxes.into_iter().enumerate() {
                if x0 > x1 || y0 > y1 || z0 > z1 {
                    return Err(format!("shape '{name}' box {i} has min > max").into());
                }
                boxes.push(Aabb::from_pixels(x0, y0, z0, x1, y1, z1));
            }
            let mut shape = Shape::from_boxes(boxes);
            if let Some(axis) = def.flip {
                shape = flip_shape(&shape, axis);
            }
            if shape.is_empty() {
                log::warn!(target: "shapes", "shape '{}' has no volume", name);
            }
            lib.insert(name, shape);
        }
        log::debug!(target: "shapes", "loaded {} shape(s)", lib.len());
        Ok(lib)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ShapesConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
