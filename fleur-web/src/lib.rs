/// Fleur Web - WASM binding for browser hosts
///
/// A JS page drives `tick()` from `requestAnimationFrame`, forwards pointer
/// input to `orbit`/`zoom`, and draws the exported node buffers with WebGL.
use fleur_core::{
    FlowerSession, Mesh, SceneConfig, SceneNode, TickOutcome, WeatherContext,
};
use nalgebra::Matrix4;
use wasm_bindgen::prelude::*;

/// Outcome of a tick, mirrored for JS
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Spinning = 0,
    Reset = 1,
    Tilting = 2,
    Saturated = 3,
}

impl From<TickOutcome> for TickKind {
    fn from(outcome: TickOutcome) -> Self {
        match outcome {
            TickOutcome::Spinning => TickKind::Spinning,
            TickOutcome::Reset => TickKind::Reset,
            TickOutcome::Tilting => TickKind::Tilting,
            TickOutcome::Saturated => TickKind::Saturated,
        }
    }
}

#[wasm_bindgen]
pub struct WebFlower {
    session: FlowerSession,
}

#[wasm_bindgen]
impl WebFlower {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<WebFlower, JsValue> {
        if width == 0 || height == 0 {
            return Err(JsValue::from_str("canvas size must be non-zero"));
        }
        Ok(Self::with_viewport(width, height))
    }

    pub fn set_city(&mut self, city: &str) {
        self.session.context.select_city(city);
    }

    pub fn clear_city(&mut self) {
        self.session.context.clear_city();
    }

    pub fn city(&self) -> String {
        self.session.context.selected_city().to_string()
    }

    pub fn set_wind_speed(&mut self, wind_speed: f64) {
        self.session.context.set_wind_speed(wind_speed);
    }

    pub fn request_reset(&mut self) {
        self.session.context.request_reset();
    }

    /// Queue an orbit by pointer delta, in radians
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.session.controls.rotate_left(dx);
        self.session.controls.rotate_up(dy);
    }

    /// Zoom by `scale`: above 1 moves closer, below 1 moves away
    pub fn zoom(&mut self, scale: f32) {
        if scale >= 1.0 {
            self.session.controls.dolly_in(scale);
        } else if scale > 0.0 {
            self.session.controls.dolly_out(1.0 / scale);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.session.set_aspect(width as f32 / height as f32);
        }
    }

    /// Advance one frame; the host redraws afterwards
    pub fn tick(&mut self) -> TickKind {
        self.session.step().outcome.into()
    }

    /// Group Euler rotation `[x, y, z]` in radians
    pub fn group_rotation(&self) -> Vec<f32> {
        let group = self.session.scene.group;
        vec![group.x, group.y, group.z]
    }

    /// Accumulated tilt `[x, z]` in degrees
    pub fn tilt(&self) -> Vec<f64> {
        let tilt = self.session.tilt();
        vec![tilt.rotation_x, tilt.rotation_z]
    }

    pub fn camera_position(&self) -> Vec<f32> {
        let p = self.session.camera.position;
        vec![p.x, p.y, p.z]
    }

    /// Column-major projection * view matrix
    pub fn view_projection(&self) -> Vec<f32> {
        column_major(&self.session.camera.view_projection())
    }

    /// Scene background as `[r, g, b]`
    pub fn background(&self) -> Vec<u8> {
        let c = self.session.scene.background;
        vec![c.r, c.g, c.b]
    }

    pub fn node_count(&self) -> usize {
        self.session.scene.nodes.len()
    }

    pub fn node_name(&self, index: usize) -> Option<String> {
        self.node(index).map(|node| node.name.clone())
    }

    /// Flat triangle list `[x, y, z, ...]` in node space
    pub fn node_positions(&self, index: usize) -> Vec<f32> {
        self.node(index)
            .map(|node| flatten(&node.mesh, |v| [v.position.x, v.position.y, v.position.z]))
            .unwrap_or_default()
    }

    /// Per-vertex normals matching `node_positions`
    pub fn node_normals(&self, index: usize) -> Vec<f32> {
        self.node(index)
            .map(|node| flatten(&node.mesh, |v| [v.normal.x, v.normal.y, v.normal.z]))
            .unwrap_or_default()
    }

    pub fn node_color(&self, index: usize) -> Vec<u8> {
        self.node(index)
            .map(|node| vec![node.color.r, node.color.g, node.color.b])
            .unwrap_or_default()
    }

    /// Column-major world matrix of a node, including the group rotation
    pub fn node_matrix(&self, index: usize) -> Vec<f32> {
        self.node(index)
            .map(|node| column_major(&self.session.scene.node_matrix(node)))
            .unwrap_or_default()
    }
}

impl WebFlower {
    /// Construct without going through `JsValue`, for native callers
    pub fn with_viewport(width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        log::debug!("web flower created for {}x{}", width, height);
        Self {
            session: FlowerSession::new(&SceneConfig::default(), aspect),
        }
    }

    fn node(&self, index: usize) -> Option<&SceneNode> {
        self.session.scene.nodes.get(index)
    }
}

fn column_major(matrix: &Matrix4<f32>) -> Vec<f32> {
    matrix.as_slice().to_vec()
}

fn flatten(mesh: &Mesh, attribute: impl Fn(&fleur_core::Vertex) -> [f32; 3]) -> Vec<f32> {
    mesh.triangles
        .iter()
        .flat_map(|t| t.vertices.iter())
        .flat_map(|v| attribute(v))
        .collect()
}
