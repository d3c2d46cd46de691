/// Flower scene graph: a rotating group of primitives plus an axes helper
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::Mesh;
use crate::transform::{RotationState, Transform};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const SKY_BLUE: Rgb = Rgb::new(135, 206, 235);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale the colour by a brightness factor in `[0, 1]`
    pub fn shade(self, brightness: f32) -> Self {
        let factor = brightness.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * factor).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Scene construction parameters
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Stem height; the pistil and petals sit at the top of the stem
    pub flower_size: f32,
    /// Draw the XYZ axes helper
    pub show_axes: bool,
    /// Length of each axes helper line
    pub axes_length: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            flower_size: 50.0,
            show_axes: true,
            axes_length: 50.0,
        }
    }
}

/// A mesh with a flat colour and a local transform relative to its group
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub mesh: Mesh,
    pub color: Rgb,
    pub position: Vector3<f32>,
    pub rotation: RotationState,
}

impl SceneNode {
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Transform::model_matrix(&self.position, &self.rotation)
    }
}

/// A coloured world-space line, drawn unlit
#[derive(Debug, Clone, Copy)]
pub struct LineSegment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub color: Rgb,
}

/// Petal layout: (x, z, rotation x in degrees, rotation y in degrees)
const PETALS: [(f32, f32, f32, f32); 4] = [
    (-5.0, 0.0, 90.0, -30.0),
    (0.0, -5.0, 120.0, 0.0),
    (5.0, 0.0, 90.0, 30.0),
    (0.0, 5.0, 60.0, 0.0),
];

/// The complete flower scene
#[derive(Debug, Clone)]
pub struct FlowerScene {
    pub background: Rgb,
    /// Rotation of the flower group, driven by the animation controller
    pub group: RotationState,
    pub nodes: Vec<SceneNode>,
    /// World-space helper lines, not affected by the group rotation
    pub helpers: Vec<LineSegment>,
}

impl FlowerScene {
    pub fn new(config: &SceneConfig) -> Self {
        let size = config.flower_size;
        let mut nodes = Vec::with_capacity(2 + PETALS.len());

        nodes.push(SceneNode {
            name: "stem".to_string(),
            mesh: Mesh::cylinder(2.0, 2.0, size, 32),
            color: Rgb::GREEN,
            position: Vector3::new(0.0, size / 2.0, 0.0),
            rotation: RotationState::zero(),
        });

        nodes.push(SceneNode {
            name: "pistil".to_string(),
            mesh: Mesh::sphere(4.5, 32, 16),
            color: Rgb::YELLOW,
            position: Vector3::new(0.0, size, 0.0),
            rotation: RotationState::zero(),
        });

        // All petals share one torus, like a shared geometry buffer
        let petal = Mesh::torus(6.0, 1.0, 16, 100);
        for (i, &(x, z, rx, ry)) in PETALS.iter().enumerate() {
            nodes.push(SceneNode {
                name: format!("petal-{}", i),
                mesh: petal.clone(),
                color: Rgb::RED,
                position: Vector3::new(x, size, z),
                rotation: RotationState::from_degrees(rx, ry, 0.0),
            });
        }

        let helpers = if config.show_axes {
            axes_helper(config.axes_length)
        } else {
            Vec::new()
        };

        Self {
            background: Rgb::SKY_BLUE,
            group: RotationState::zero(),
            nodes,
            helpers,
        }
    }

    /// Group matrix; the group sits at the origin
    pub fn group_matrix(&self) -> Matrix4<f32> {
        Transform::rotation_matrix(&self.group)
    }

    /// World matrix of a node: group rotation applied over the node's local transform
    pub fn node_matrix(&self, node: &SceneNode) -> Matrix4<f32> {
        self.group_matrix() * node.local_matrix()
    }

    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(|node| node.mesh.triangle_count()).sum()
    }
}

impl Default for FlowerScene {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

fn axes_helper(length: f32) -> Vec<LineSegment> {
    let origin = Point3::origin();
    vec![
        LineSegment {
            start: origin,
            end: Point3::new(length, 0.0, 0.0),
            color: Rgb::RED,
        },
        LineSegment {
            start: origin,
            end: Point3::new(0.0, length, 0.0),
            color: Rgb::GREEN,
        },
        LineSegment {
            start: origin,
            end: Point3::new(0.0, 0.0, length),
            color: Rgb::BLUE,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_flower_layout() {
        let scene = FlowerScene::default();
        assert_eq!(scene.nodes.len(), 6);
        assert_eq!(scene.helpers.len(), 3);
        assert_eq!(scene.background, Rgb::SKY_BLUE);

        let stem = scene.node("stem").unwrap();
        assert_eq!(stem.position.y, 25.0);
        assert_eq!(stem.color, Rgb::GREEN);

        let pistil = scene.node("pistil").unwrap();
        assert_eq!(pistil.position.y, 50.0);

        let petals: Vec<_> = scene.nodes.iter().filter(|n| n.name.starts_with("petal")).collect();
        assert_eq!(petals.len(), 4);
        assert!(petals.iter().all(|p| p.color == Rgb::RED && p.position.y == 50.0));
        assert!((petals[1].rotation.x - 120f32.to_radians()).abs() < 1e-6);
        assert!((petals[0].rotation.y + 30f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_stem_spans_ground_to_flower_size() {
        let scene = FlowerScene::new(&SceneConfig {
            flower_size: 40.0,
            ..SceneConfig::default()
        });
        let stem = scene.node("stem").unwrap();
        let matrix = scene.node_matrix(stem);
        let (min, max) = stem.mesh.bounds().unwrap();
        assert!(matrix.transform_point(&min).y.abs() < 1e-4);
        assert!((matrix.transform_point(&max).y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_group_rotation_moves_pistil() {
        let mut scene = FlowerScene::default();
        scene.group = RotationState::from_degrees(0.0, 0.0, 90.0);
        let pistil = scene.node("pistil").unwrap();
        let center = scene.node_matrix(pistil).transform_point(&Point3::origin());
        // Z rotation of +90 deg tips the top of the stem towards -X
        assert!((center - Point3::new(-50.0, 0.0, 0.0)).norm() < 1e-3);
    }

    #[test]
    fn test_axes_can_be_hidden() {
        let scene = FlowerScene::new(&SceneConfig {
            show_axes: false,
            ..SceneConfig::default()
        });
        assert!(scene.helpers.is_empty());
    }

    #[test]
    fn test_palette_by_node() {
        let scene = FlowerScene::default();
        let palette: HashSet<Rgb> = scene.nodes.iter().map(|n| n.color).collect();
        assert_eq!(palette, HashSet::from([Rgb::GREEN, Rgb::YELLOW, Rgb::RED]));
        let helpers: HashSet<Rgb> = scene.helpers.iter().map(|l| l.color).collect();
        assert_eq!(helpers.len(), 3);
    }

    #[test]
    fn test_shade() {
        assert_eq!(Rgb::new(200, 100, 0).shade(0.5), Rgb::new(100, 50, 0));
        assert_eq!(Rgb::RED.shade(2.0), Rgb::RED);
    }
}
