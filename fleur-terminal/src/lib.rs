/// Terminal front-end: draws the flower session with an ASCII rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self},
};
use fleur_core::{FlowerSession, FrameReport, WeatherContext};
use log::{debug, info, warn};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod renderer;

pub use cli::Cli;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Orbit angle per key press (radians)
const ORBIT_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 1.1;
const WIND_STEP: f64 = 0.5;

/// Cities cycled through with the `c` key
pub const CITIES: &[&str] = &["Paris", "Lyon", "Marseille", "Lille", "Brest", "Nice"];

pub fn viewport_aspect(width: u16, height: u16) -> f32 {
    width.max(1) as f32 * CELL_ASPECT / height.max(1) as f32
}

/// Holds the terminal in raw mode on the alternate screen. Dropping it
/// restores the terminal, including on early returns and panics.
struct ScreenGuard<W: Write> {
    writer: W,
    raw_mode: bool,
}

impl<W: Write> ScreenGuard<W> {
    fn enter(writer: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Self::attach(writer, true)
    }

    /// Switch to the alternate screen; `raw_mode` says whether to leave raw mode on drop
    fn attach(writer: W, raw_mode: bool) -> io::Result<Self> {
        let mut guard = Self { writer, raw_mode };
        execute!(guard.writer, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for ScreenGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(err) = terminal::disable_raw_mode() {
                warn!("failed to leave raw mode: {}", err);
            }
        }
        if let Err(err) = execute!(self.writer, ResetColor, terminal::LeaveAlternateScreen, cursor::Show) {
            warn!("failed to restore the screen: {}", err);
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    session: FlowerSession,
    renderer: AsciiRenderer,
    running: bool,
    target_frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    city_index: Option<usize>,
    last_report: Option<FrameReport>,
}

impl TerminalApp {
    pub fn new(session: FlowerSession, fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(session, width, height, fps))
    }

    /// Build an app for a given viewport without touching the terminal
    pub fn with_size(mut session: FlowerSession, width: u16, height: u16, fps: u32) -> Self {
        session.set_aspect(viewport_aspect(width, height));
        let city_index = CITIES
            .iter()
            .position(|city| *city == session.context.selected_city());

        Self {
            session,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            target_frame_time: Duration::from_millis(1000 / fps.max(1) as u64),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            city_index,
            last_report: None,
        }
    }

    pub fn session(&self) -> &FlowerSession {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        let _screen = ScreenGuard::enter(stdout())?;
        self.main_loop()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        info!(
            "starting frame loop at {:.0} fps",
            1.0 / self.target_frame_time.as_secs_f32()
        );

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.last_report = Some(self.session.step());

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("frame loop stopped after {} frames", self.session.frame());
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code);
            }
            Event::Resize(width, height) => {
                debug!("terminal resized to {}x{}", width, height);
                self.renderer.resize(width as usize, height as usize);
                self.session.set_aspect(viewport_aspect(width, height));
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let session = &mut self.session;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('a') | KeyCode::Left => session.controls.rotate_left(ORBIT_STEP),
            KeyCode::Char('d') | KeyCode::Right => session.controls.rotate_left(-ORBIT_STEP),
            KeyCode::Char('w') | KeyCode::Up => session.controls.rotate_up(ORBIT_STEP),
            KeyCode::Char('s') | KeyCode::Down => session.controls.rotate_up(-ORBIT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => session.controls.dolly_in(ZOOM_STEP),
            KeyCode::Char('-') => session.controls.dolly_out(ZOOM_STEP),
            KeyCode::Char('h') => session.controls.reset(&mut session.camera),
            KeyCode::Char('o') => {
                session.camera.mode = session.camera.mode.toggled();
            }
            KeyCode::Char('c') => {
                let next = self.city_index.map_or(0, |i| (i + 1) % CITIES.len());
                self.city_index = Some(next);
                session.context.select_city(CITIES[next]);
            }
            KeyCode::Char('x') => {
                self.city_index = None;
                session.context.clear_city();
            }
            KeyCode::Char('[') => {
                let wind = (session.context.wind_speed() - WIND_STEP).max(0.0);
                session.context.set_wind_speed(wind);
            }
            KeyCode::Char(']') => {
                let wind = session.context.wind_speed() + WIND_STEP;
                session.context.set_wind_speed(wind);
            }
            KeyCode::Char('r') => session.context.request_reset(),
            _ => {}
        }
    }

    /// One-line status overlay
    pub fn status_line(&self) -> String {
        let context = &self.session.context;
        let city = match context.selected_city() {
            "" => "-",
            city => city,
        };
        let (tilt, outcome) = match &self.last_report {
            Some(report) => (report.tilt.rotation_x, format!("{:?}", report.outcome)),
            None => (0.0, "-".to_string()),
        };
        format!(
            "Fleur | FPS: {:.1} | City: {} | Wind: {:.1} | Tilt: {:.2} deg ({}) | Arrows=Orbit +/-=Zoom C=City X=Clear [/]=Wind R=Reset Q=Quit",
            self.fps,
            city,
            context.wind_speed(),
            tilt,
            outcome
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer
            .render_scene(&self.session.scene, &self.session.camera);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let width = self.renderer.width();
        let status: String = self.status_line().chars().take(width).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
