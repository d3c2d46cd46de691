/// Weather-driven flower animation
///
/// With no city selected the flower group spins around Y. Once a city is
/// selected the group tilts around X and Z at a rate proportional to the wind
/// speed, until both tilt angles reach [`TILT_LIMIT_DEG`].
use log::debug;

use crate::context::WeatherContext;
use crate::transform::RotationState;

/// Y rotation added every tick while no city is selected (radians)
pub const SPIN_STEP: f32 = 0.01;

/// Tilt added every tick per unit of wind speed (degrees)
pub const TILT_STEP: f64 = 0.01;

/// Tilt stops growing once either angle reaches this value (degrees)
pub const TILT_LIMIT_DEG: f64 = 17.0;

/// Accumulated tilt of the flower, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationState {
    pub rotation_x: f64,
    pub rotation_z: f64,
}

impl AnimationState {
    pub fn new(rotation_x: f64, rotation_z: f64) -> Self {
        Self {
            rotation_x,
            rotation_z,
        }
    }

    pub fn is_saturated(&self) -> bool {
        self.rotation_x >= TILT_LIMIT_DEG || self.rotation_z >= TILT_LIMIT_DEG
    }
}

/// What a tick did to the group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No city: the group spun around Y
    Spinning,
    /// A pending reset was consumed and the tilt returned to zero
    Reset,
    /// The tilt grew by one wind step
    Tilting,
    /// The tilt is at its limit and held
    Saturated,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    state: AnimationState,
    last_outcome: Option<TickOutcome>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing tilt, e.g. when restoring a session
    pub fn with_state(state: AnimationState) -> Self {
        Self {
            state,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Advance the animation by one frame and write the result into `group`
    pub fn tick<C: WeatherContext + ?Sized>(
        &mut self,
        context: &mut C,
        group: &mut RotationState,
    ) -> TickOutcome {
        let outcome = if context.selected_city().is_empty() {
            group.y += SPIN_STEP;
            TickOutcome::Spinning
        } else {
            let outcome = if context.reset_requested() {
                self.state = AnimationState::default();
                context.clear_reset();
                TickOutcome::Reset
            } else if self.state.rotation_x < TILT_LIMIT_DEG
                && self.state.rotation_z < TILT_LIMIT_DEG
            {
                // The limit is checked before the step, so the last step may overshoot
                let step = TILT_STEP * context.wind_speed();
                self.state.rotation_x += step;
                self.state.rotation_z += step;
                TickOutcome::Tilting
            } else {
                TickOutcome::Saturated
            };

            // The group rotation is f32; the tilt itself stays in f64
            group.x = self.state.rotation_x.to_radians() as f32;
            group.z = self.state.rotation_z.to_radians() as f32;
            outcome
        };

        if self.last_outcome != Some(outcome) {
            debug!(
                "animation {:?} (tilt x={:.3} z={:.3})",
                outcome, self.state.rotation_x, self.state.rotation_z
            );
            self.last_outcome = Some(outcome);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppContext;
    use rstest::rstest;

    fn city_context(wind_speed: f64) -> AppContext {
        let mut context = AppContext::new();
        context.select_city("Marseille");
        context.clear_reset();
        context.set_wind_speed(wind_speed);
        context
    }

    #[test]
    fn test_spins_without_city() {
        let mut controller = AnimationController::new();
        let mut context = AppContext::new();
        let mut group = RotationState::new(0.2, 0.0, -0.1);

        for i in 1..=100 {
            let before = group.y;
            assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Spinning);
            assert!(group.y > before);
            assert!((group.y - 0.01 * i as f32).abs() < 1e-4);
        }
        assert_eq!(group.x, 0.2);
        assert_eq!(group.z, -0.1);
    }

    #[test]
    fn test_spin_ignores_reset_flag() {
        let mut controller = AnimationController::with_state(AnimationState::new(5.0, 5.0));
        let mut context = AppContext::new();
        context.request_reset();
        let mut group = RotationState::zero();

        controller.tick(&mut context, &mut group);
        assert!(context.reset_requested());
        assert_eq!(controller.state(), AnimationState::new(5.0, 5.0));
    }

    #[test]
    fn test_five_ticks_at_wind_two() {
        let mut controller = AnimationController::new();
        let mut context = city_context(2.0);
        let mut group = RotationState::zero();

        for _ in 0..5 {
            assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Tilting);
        }
        let state = controller.state();
        assert!((state.rotation_x - 0.1).abs() < 1e-5);
        assert!((state.rotation_z - 0.1).abs() < 1e-5);
        assert!((group.x - 0.1f32.to_radians()).abs() < 1e-7);
        assert!((group.z - 0.1f32.to_radians()).abs() < 1e-7);
    }

    #[test]
    fn test_wind_one_tilts_for_1701_ticks() {
        let mut controller = AnimationController::new();
        let mut context = city_context(1.0);
        let mut group = RotationState::zero();

        let mut ticks = 0;
        while controller.tick(&mut context, &mut group) == TickOutcome::Tilting {
            ticks += 1;
            assert!(ticks < 2_000, "tilt never saturated");
        }

        // 1700 steps of 0.01 land just under 17, so one more step is taken
        assert_eq!(ticks, 1701);
        let state = controller.state();
        assert!((state.rotation_x - 17.01).abs() < 1e-9);
        assert!((state.rotation_z - 17.01).abs() < 1e-9);
        assert!((group.x - 17.01f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_last_step_overshoots_then_holds() {
        let mut controller = AnimationController::with_state(AnimationState::new(16.995, 16.995));
        let mut context = city_context(1.0);
        let mut group = RotationState::zero();

        assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Tilting);
        let state = controller.state();
        assert!((state.rotation_x - 17.005).abs() < 1e-4);
        assert!((state.rotation_z - 17.005).abs() < 1e-4);

        assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Saturated);
        assert_eq!(controller.state(), state);
    }

    #[rstest]
    #[case(0.5)]
    #[case(1.0)]
    #[case(7.25)]
    #[case(40.0)]
    fn test_saturation_is_idempotent(#[case] wind_speed: f64) {
        let mut controller = AnimationController::new();
        let mut context = city_context(wind_speed);
        let mut group = RotationState::zero();

        let mut ticks = 0;
        while controller.tick(&mut context, &mut group) == TickOutcome::Tilting {
            ticks += 1;
            assert!(ticks < 10_000, "tilt never saturated");
        }

        let saturated = controller.state();
        assert!(saturated.is_saturated());
        assert!(saturated.rotation_x < TILT_LIMIT_DEG + TILT_STEP * wind_speed + 1e-3);
        let held_group = group;
        for _ in 0..50 {
            assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Saturated);
        }
        assert_eq!(controller.state(), saturated);
        assert_eq!(group, held_group);
    }

    #[test]
    fn test_reset_zeroes_tilt_and_clears_flag() {
        let mut controller = AnimationController::with_state(AnimationState::new(12.0, 12.0));
        let mut context = city_context(3.0);
        let mut group = RotationState::new(0.0, 1.5, 0.0);
        context.request_reset();

        assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Reset);
        assert_eq!(controller.state(), AnimationState::default());
        assert!(!context.reset_requested());
        assert_eq!(group.x, 0.0);
        assert_eq!(group.z, 0.0);
        assert_eq!(group.y, 1.5);

        // Accumulation resumes on the following tick
        assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Tilting);
        assert!((controller.state().rotation_x - 0.03).abs() < 1e-5);
    }

    #[test]
    fn test_reset_from_saturation() {
        let mut controller = AnimationController::with_state(AnimationState::new(17.2, 17.2));
        let mut context = city_context(1.0);
        let mut group = RotationState::zero();

        assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Saturated);
        context.request_reset();
        assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Reset);
        assert_eq!(controller.tick(&mut context, &mut group), TickOutcome::Tilting);
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut controller = AnimationController::new();
        let mut context = city_context(1.0);
        let dyn_context: &mut dyn WeatherContext = &mut context;
        let mut group = RotationState::zero();

        assert_eq!(controller.tick(dyn_context, &mut group), TickOutcome::Tilting);
    }
}
