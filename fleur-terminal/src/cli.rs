// cli.rs - Command-line interface configuration
use clap::Parser;
use fleur_core::{AppContext, SceneConfig};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "fleur")]
#[command(about = "Weather-driven 3D flower in the terminal", long_about = None)]
pub struct Cli {
    /// City selected at startup; the flower spins while none is selected
    #[arg(long)]
    pub city: Option<String>,

    /// Wind speed factor driving the tilt rate
    #[arg(long = "wind-speed", default_value_t = 1.0, allow_negative_numbers = true)]
    pub wind_speed: f64,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Weather feed script applied frame by frame
    #[arg(long)]
    pub feed: Option<PathBuf>,

    /// Stem height of the flower
    #[arg(long = "flower-size", default_value_t = 50.0, value_parser = parse_flower_size)]
    pub flower_size: f32,

    /// Hide the XYZ axes helper
    #[arg(long = "no-axes", default_value = "false")]
    pub no_axes: bool,
}

/// Stem height must be a positive, finite number of scene units
fn parse_flower_size(value: &str) -> Result<f32, String> {
    let size: f32 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(format!("flower size must be positive and finite, got {}", value))
    }
}

impl Cli {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            flower_size: self.flower_size,
            show_axes: !self.no_axes,
            ..SceneConfig::default()
        }
    }

    pub fn initial_context(&self) -> AppContext {
        let mut context = AppContext::new();
        context.set_wind_speed(self.wind_speed);
        if let Some(city) = &self.city {
            context.select_city(city);
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleur_core::WeatherContext;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["fleur"]).unwrap();
        assert_eq!(cli.fps, 30);
        assert_eq!(cli.wind_speed, 1.0);
        assert!(cli.city.is_none());
        assert!(cli.scene_config().show_axes);
        assert_eq!(cli.scene_config().flower_size, 50.0);
        assert_eq!(cli.initial_context().selected_city(), "");
    }

    #[test]
    fn test_city_and_wind() {
        let cli = Cli::try_parse_from(["fleur", "--city", "Toulouse", "--wind-speed", "3.5", "--no-axes"])
            .unwrap();
        let context = cli.initial_context();
        assert_eq!(context.selected_city(), "Toulouse");
        assert_eq!(context.wind_speed(), 3.5);
        assert!(context.reset_requested());
        assert!(!cli.scene_config().show_axes);
    }

    #[test]
    fn test_negative_wind_is_zeroed() {
        let cli = Cli::try_parse_from(["fleur", "--wind-speed", "-4"]).unwrap();
        assert_eq!(cli.initial_context().wind_speed(), 0.0);
    }

    #[rstest]
    #[case("0")]
    #[case("241")]
    #[case("fast")]
    fn test_rejects_bad_fps(#[case] fps: &str) {
        assert!(Cli::try_parse_from(["fleur", "--fps", fps]).is_err());
    }

    #[rstest]
    #[case("0")]
    #[case("-5")]
    #[case("nan")]
    #[case("inf")]
    #[case("tall")]
    fn test_rejects_bad_flower_size(#[case] size: &str) {
        assert!(Cli::try_parse_from(["fleur", "--flower-size", size]).is_err());
    }

    #[test]
    fn test_accepts_small_flower_size() {
        let cli = Cli::try_parse_from(["fleur", "--flower-size", "0.5"]).unwrap();
        assert_eq!(cli.scene_config().flower_size, 0.5);
    }
}
