/// Frame session: owns the scene, camera and weather state, stepped by a host loop
use crate::animation::{AnimationController, AnimationState, TickOutcome};
use crate::context::AppContext;
use crate::feed::WeatherFeed;
use crate::orbit::OrbitControls;
use crate::projection::Camera;
use crate::scene::{FlowerScene, SceneConfig};

/// Result of one session step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Index of the frame that was just stepped
    pub frame: u64,
    pub outcome: TickOutcome,
    pub tilt: AnimationState,
    /// True when the orbit controls moved the camera this frame
    pub camera_moved: bool,
    /// Number of feed events applied before the tick
    pub feed_events: usize,
}

/// Everything a host needs to animate and draw the flower.
///
/// A host calls [`FlowerSession::step`] once per display refresh and then
/// draws `scene` through `camera`.
pub struct FlowerSession {
    pub scene: FlowerScene,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub context: AppContext,
    controller: AnimationController,
    feed: Option<WeatherFeed>,
    frame: u64,
}

impl FlowerSession {
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        let camera = Camera::with_aspect(aspect);
        let controls = OrbitControls::for_camera(&camera);
        Self {
            scene: FlowerScene::new(config),
            camera,
            controls,
            context: AppContext::new(),
            controller: AnimationController::new(),
            feed: None,
            frame: 0,
        }
    }

    pub fn with_context(mut self, context: AppContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_feed(mut self, feed: WeatherFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn tilt(&self) -> AnimationState {
        self.controller.state()
    }

    pub fn feed(&self) -> Option<&WeatherFeed> {
        self.feed.as_ref()
    }

    /// Advance one frame: feed events, camera controls, then the animation tick
    pub fn step(&mut self) -> FrameReport {
        let feed_events = match self.feed.as_mut() {
            Some(feed) => feed.apply_due(self.frame, &mut self.context),
            None => 0,
        };

        let camera_moved = self.controls.update(&mut self.camera);
        let outcome = self
            .controller
            .tick(&mut self.context, &mut self.scene.group);

        let report = FrameReport {
            frame: self.frame,
            outcome,
            tilt: self.controller.state(),
            camera_moved,
            feed_events,
        };
        self.frame += 1;
        report
    }

    /// Update the viewport aspect ratio after a host resize
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
    }
}
