/// Terminal frontend: event wiring and overlays around the ASCII renderer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use stlview_core::{
    Camera, Catalog, Controller, LoadPhase, PinchHandler, ProjectionMode, RotationState, Tint,
    Transform,
};

pub mod dialogs;
pub mod renderer;

pub use renderer::{AsciiRenderer, Backdrop};

/// Tint presets cycled with the `c` key.
const TINT_PRESETS: &[(&str, Tint)] = &[
    ("white", Tint::new(1.0, 1.0, 1.0)),
    ("red", Tint::new(0.9, 0.25, 0.25)),
    ("green", Tint::new(0.3, 0.85, 0.4)),
    ("blue", Tint::new(0.35, 0.55, 0.95)),
    ("gold", Tint::new(0.9, 0.75, 0.3)),
];

/// How much one scroll tick scales a pinched node.
const PINCH_STEP: f32 = 1.05;
/// How much `+`/`-` scale the whole model.
const ZOOM_STEP: f32 = 1.1;

const STATUS_TTL: Duration = Duration::from_secs(3);

/// Startup message shown in the status line once the alternate screen is up,
/// so launch never blocks on stdout.
fn startup_status(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        format!(
            "no .stl files in {}; press o to import",
            catalog.dir().display()
        )
    } else {
        format!("{} models in {}", catalog.len(), catalog.dir().display())
    }
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    controller: Controller,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    info_visible: bool,
    tint_index: usize,
    status: Option<(String, Instant)>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(controller: Controller) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let status = Some((startup_status(controller.catalog()), Instant::now()));

        Ok(Self {
            controller,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            info_visible: false,
            tint_index: 0,
            status,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let ev = event::read()?;
                self.handle_event(ev);
            }

            // Commit any finished background loads.
            self.controller.pump();

            self.render()?;

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            self.frame_count += 1;
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, ev: Event) {
        match ev {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                let location = (column as f32, row as f32);
                match kind {
                    MouseEventKind::ScrollUp => self.on_pinch(location, PINCH_STEP),
                    MouseEventKind::ScrollDown => self.on_pinch(location, 1.0 / PINCH_STEP),
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                self.camera = Camera::new(width as u32, height as u32);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,

            // Model rotation (camera orbit analog)
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(0.1, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-0.1, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -0.1, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, 0.1, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, 0.1),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -0.1),

            // Uniform model scale
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(ZOOM_STEP),
            KeyCode::Char('-') => self.zoom(1.0 / ZOOM_STEP),

            // Catalog navigation
            KeyCode::Char('n') => self.controller.next(),
            KeyCode::Char('p') => self.controller.previous(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.controller.select_index(index);
            }

            KeyCode::Char('v') => {
                self.camera.mode = match self.camera.mode {
                    ProjectionMode::Perspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
            }

            KeyCode::Char('c') => self.cycle_tint(),
            KeyCode::Char('b') => self.toggle_backdrop(),
            KeyCode::Char('i') => self.info_visible = !self.info_visible,
            KeyCode::Char('o') => self.import_via_dialog(),
            KeyCode::Char('x') => self.share_via_dialog(),
            _ => {}
        }
    }

    fn zoom(&mut self, factor: f32) {
        if let Some(scene) = self.controller.scene_mut() {
            let scale = scene.root_scale() * factor;
            scene.set_root_scale(scale);
        }
    }

    fn cycle_tint(&mut self) {
        self.tint_index = (self.tint_index + 1) % TINT_PRESETS.len();
        let (name, tint) = TINT_PRESETS[self.tint_index];
        self.controller.set_tint(tint);
        self.set_status(format!("tint: {name}"));
    }

    fn toggle_backdrop(&mut self) {
        self.controller.toggle_ar();
        let backdrop = if self.controller.state().ar_active {
            Backdrop::Passthrough
        } else {
            Backdrop::Solid
        };
        self.renderer.set_backdrop(backdrop);
    }

    fn import_via_dialog(&mut self) {
        let Some(source) = dialogs::pick_import_source() else {
            return;
        };
        self.controller.import(&source);
        self.set_status(format!(
            "imported {} ({} models)",
            source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            self.controller.catalog().len()
        ));
    }

    fn share_via_dialog(&mut self) {
        let Some(source) = self.controller.share_path().map(PathBuf::from) else {
            self.set_status("nothing to share".to_string());
            return;
        };
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(dest) = dialogs::pick_share_destination(&name) else {
            return;
        };
        match dialogs::export_copy(&source, &dest) {
            Ok(_) => self.set_status(format!("shared to {}", dest.display())),
            Err(err) => {
                log::error!("share failed for {}: {err}", source.display());
                self.set_status("share failed (see log)".to_string());
            }
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = Some((message, Instant::now()));
    }

    /// Shared base transform: the user's rotation, composed with a fit
    /// factor so models of any physical size fill the default camera.
    fn base_matrix(&self) -> Matrix4<f32> {
        let rotation = Transform::rotation_matrix(&self.rotation);
        let Some(scene) = self.controller.scene() else {
            return rotation;
        };
        let extent = scene.bounding_box().extents().norm();
        if extent <= f32::EPSILON {
            return rotation;
        }
        rotation * Transform::uniform_scale_matrix(3.0 / extent)
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        if let Some(scene) = self.controller.scene() {
            self.renderer
                .render_scene(scene, &self.base_matrix(), &self.camera);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        self.draw_header(&mut stdout)?;
        if self.info_visible {
            self.draw_info(&mut stdout)?;
        }
        self.draw_status(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn draw_header<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let state = self.controller.state();
        let title = match state.selected {
            Some(index) => {
                let name = self
                    .controller
                    .catalog()
                    .get(index)
                    .map(|f| f.name().to_string())
                    .unwrap_or_default();
                format!("{} [{}/{}]", name, index + 1, self.controller.catalog().len())
            }
            None => "no models (press o to import)".to_string(),
        };
        let phase = match state.phase {
            LoadPhase::Loading => " loading...",
            _ => "",
        };

        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "STLVIEW | {title}{phase} | FPS: {:.1} | n/p=model o=import x=share c=tint b=ar i=info q=quit",
                self.fps
            )),
            ResetColor
        )
    }

    fn draw_info<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(metrics) = self.controller.metrics() else {
            return Ok(());
        };
        for (i, line) in metrics.summary_lines().iter().enumerate() {
            queue!(
                out,
                cursor::MoveTo(2, 2 + i as u16),
                SetForegroundColor(Color::Cyan),
                Print(line),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn draw_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some((message, since)) = &self.status else {
            return Ok(());
        };
        if since.elapsed() > STATUS_TTL {
            return Ok(());
        }
        let row = self.renderer.height().saturating_sub(1) as u16;
        queue!(
            out,
            cursor::MoveTo(0, row),
            SetForegroundColor(Color::Green),
            Print(message),
            ResetColor
        )
    }
}

impl PinchHandler for TerminalApp {
    /// Resolve the pinch location to a node and scale it by the incremental
    /// delta. Misses are ignored.
    fn on_pinch(&mut self, location: (f32, f32), scale_delta: f32) {
        let base = self.base_matrix();
        let (width, height) = (self.renderer.width() as u32, self.renderer.height() as u32);
        let Some(scene) = self.controller.scene() else {
            return;
        };
        let picked = self.camera.pick_node(scene, &base, width, height, location);
        if let Some(index) = picked {
            if let Some(scene) = self.controller.scene_mut() {
                scene.scale_node(index, scale_delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn startup_status_counts_models() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.stl"), b"solid a\nendsolid a\n").unwrap();
        fs::write(dir.path().join("b.stl"), b"solid b\nendsolid b\n").unwrap();
        let catalog = Catalog::open(dir.path()).unwrap();

        let message = startup_status(&catalog);
        assert!(message.starts_with("2 models"), "{message}");
    }

    #[test]
    fn startup_status_hints_import_when_empty() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(dir.path()).unwrap();

        assert!(startup_status(&catalog).contains("press o to import"));
    }
}
