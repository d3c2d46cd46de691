/// Fleur - weather-driven flower in the terminal
///
/// The flower spins while no city is selected, and tilts with the wind once
/// one is. Controls:
///   - Arrows / WASD: Orbit the camera
///   - +/-: Zoom, H: Home camera, O: Toggle projection
///   - C: Next city, X: Clear city, [ / ]: Wind speed, R: Reset tilt
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use fleur_core::{FlowerSession, WeatherFeed};
use fleur_terminal::{viewport_aspect, Cli, TerminalApp};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut session = FlowerSession::new(&cli.scene_config(), viewport_aspect(80, 24))
        .with_context(cli.initial_context());

    if let Some(path) = &cli.feed {
        let feed = WeatherFeed::load(path)
            .with_context(|| format!("failed to load weather feed {}", path.display()))?;
        log::info!("loaded {} feed events from {}", feed.events().len(), path.display());
        session = session.with_feed(feed);
    }

    println!("Starting Fleur (press Q to quit)...");

    // Run the terminal app
    let mut app = TerminalApp::new(session, cli.fps).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    println!("Thank you for using Fleur!");
    Ok(())
}
