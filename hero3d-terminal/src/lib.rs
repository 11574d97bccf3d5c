//! Terminal-based rasterizer for the hero scene

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use hero3d_core::{FrameLoop, Scene, Viewport};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are about twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

/// Orbit drag, in pixels, for one arrow-key press
const KEY_ORBIT_STEP: f32 = 10.0;

/// Pixels per cell used to turn mouse drags into orbit input
const CELL_PIXELS_X: f32 = 4.0;
const CELL_PIXELS_Y: f32 = CELL_PIXELS_X * CELL_ASPECT;

/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    frames: FrameLoop<Scene>,
    renderer: AsciiRenderer,
    running: bool,
    started: Instant,
    target_frame_time: Duration,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
    drag_from: Option<(u16, u16)>,
}

impl TerminalApp {
    pub fn new(scene: Scene, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene,
            frames: FrameLoop::new(),
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(STATUS_ROWS) as usize),
            running: true,
            started: Instant::now(),
            target_frame_time: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            drag_from: None,
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

        self.scene.attach(&mut self.frames);
        log::info!("scene mounted, {} floaters", self.scene.floaters().len());

        let result = self.main_loop();

        self.scene.detach(&mut self.frames);

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            let now = self.started.elapsed().as_secs_f64();
            self.frames.tick(now, &mut self.scene);

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
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
                log::trace!("{:.1} fps", self.fps);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {width}x{height}");
                self.renderer
                    .resize(width as usize, height.saturating_sub(STATUS_ROWS) as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.scene.orbit_rotate(0.0, KEY_ORBIT_STEP);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.scene.orbit_rotate(0.0, -KEY_ORBIT_STEP);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.scene.orbit_rotate(KEY_ORBIT_STEP, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.scene.orbit_rotate(-KEY_ORBIT_STEP, 0.0);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let here = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag_from = Some(here),
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((column, row)) = self.drag_from.replace(here) {
                    let dx = (here.0 as f32 - column as f32) * CELL_PIXELS_X;
                    let dy = (here.1 as f32 - row as f32) * CELL_PIXELS_Y;
                    self.scene.orbit_rotate(dx, dy);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_from = None,
            MouseEventKind::ScrollUp => self.scene.orbit_zoom(1.0),
            MouseEventKind::ScrollDown => self.scene.orbit_zoom(-1.0),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let viewport = Viewport::new(self.renderer.width() as u32, self.renderer.height() as u32)
            .with_pixel_aspect(CELL_ASPECT);
        let list = self.scene.draw_list(&viewport);
        self.renderer.render(&list);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Cyan),
            Print(format!(
                "LIVE PREVIEW | t={:.1}s | FPS: {:.1} | Drag/WASD/Arrows=Orbit Q=Quit",
                self.scene.elapsed(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
