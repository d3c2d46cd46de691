/// Application context read by the animation controller
use log::{debug, warn};

/// Read-only view of the surrounding application's weather state, plus the
/// single write the controller is allowed to make: acknowledging a reset.
pub trait WeatherContext {
    /// Currently selected city, empty when none is selected
    fn selected_city(&self) -> &str;

    /// Wind speed factor driving the tilt rate
    fn wind_speed(&self) -> f64;

    /// True when the application asked for the tilt to restart from zero
    fn reset_requested(&self) -> bool;

    /// Called by the controller once a reset has been applied
    fn clear_reset(&mut self);
}

/// Context owned by the application: written by the weather feed, the
/// keyboard handler or a JS host, read by the controller every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppContext {
    city: String,
    wind_speed: f64,
    reset_requested: bool,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a city. Switching to a different city restarts the tilt.
    pub fn select_city(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            self.clear_city();
            return;
        }
        if self.city != city {
            debug!("city selected: {:?} -> {:?}", self.city, city);
            self.city = city.to_string();
            self.reset_requested = true;
        }
    }

    pub fn clear_city(&mut self) {
        if !self.city.is_empty() {
            debug!("city cleared: {:?}", self.city);
        }
        self.city.clear();
    }

    /// Set the wind speed; negative or non-finite values are stored as 0
    pub fn set_wind_speed(&mut self, wind_speed: f64) {
        if wind_speed.is_finite() && wind_speed >= 0.0 {
            self.wind_speed = wind_speed;
        } else {
            warn!("ignoring invalid wind speed {}, using 0", wind_speed);
            self.wind_speed = 0.0;
        }
    }

    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }
}

impl WeatherContext for AppContext {
    fn selected_city(&self) -> &str {
        &self.city
    }

    fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    fn clear_reset(&mut self) {
        self.reset_requested = false;
    }
}
