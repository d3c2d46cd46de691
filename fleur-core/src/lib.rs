/// Fleur Core Library - Scene, animation and camera logic
///
/// This library holds everything that does not touch a display: the flower
/// scene graph, primitive meshes, transforms, the orbit camera and the
/// weather-driven animation controller. Hosts (terminal, web) step a
/// [`FlowerSession`] once per frame and draw the result.

pub mod animation;
pub mod context;
pub mod feed;
pub mod geometry;
pub mod orbit;
pub mod projection;
pub mod scene;
pub mod session;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationController, AnimationState, TickOutcome};
pub use context::{AppContext, WeatherContext};
pub use feed::{FeedError, WeatherCommand, WeatherEvent, WeatherFeed};
pub use geometry::{Mesh, Triangle, Vertex};
pub use orbit::OrbitControls;
pub use projection::{Camera, ProjectionMode};
pub use scene::{FlowerScene, LineSegment, Rgb, SceneConfig, SceneNode};
pub use session::{FlowerSession, FrameReport};
pub use transform::{RotationState, Transform};
