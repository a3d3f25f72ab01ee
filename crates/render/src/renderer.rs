use lumen_kernel::World;

use crate::screen::Screen;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer used before init")]
    NotInitialized,
    #[error("sub-renderer '{name}' failed: {reason}")]
    SubRenderer { name: String, reason: String },
    #[error("overlay failed: {0}")]
    Overlay(String),
}

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_size((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Everything a renderer may read for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub world: &'a World,
    /// Transient screens queued this cycle.
    pub screens: &'a [Screen],
    pub viewport: Viewport,
}

/// Text lines produced for one frame by the debug backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

/// A pass that draws on top of the main scene (screens, HUD).
pub trait SubRenderer {
    fn name(&self) -> &str;

    fn render(&mut self, ctx: &RenderContext<'_>, frame: &mut Frame) -> Result<(), RenderError>;
}

/// The rendering collaborator driven by the game loop.
pub trait Renderer {
    /// Prepare resources for `world`. Called once, after construction and
    /// viewport binding.
    fn init(&mut self, world: &World) -> Result<(), RenderError>;

    fn bind_viewport(&mut self, viewport: Viewport);

    /// Sub-renderers run after the scene, in the order added.
    fn add_renderer(&mut self, renderer: Box<dyn SubRenderer>);

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<(), RenderError>;
}

/// Renderer that draws to text instead of a GPU surface.
///
/// Produces a human-readable frame of the camera and world state. Used by
/// the CLI and by tests of the render interface.
#[derive(Default)]
pub struct DebugTextRenderer {
    viewport: Viewport,
    sub_renderers: Vec<Box<dyn SubRenderer>>,
    initialized_for: Option<String>,
    last_frame: Frame,
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> &Frame {
        &self.last_frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Renderer for DebugTextRenderer {
    fn init(&mut self, world: &World) -> Result<(), RenderError> {
        tracing::debug!(world = world.label(), "debug renderer initialized");
        self.initialized_for = Some(world.label().to_string());
        Ok(())
    }

    fn bind_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn add_renderer(&mut self, renderer: Box<dyn SubRenderer>) {
        tracing::debug!(name = renderer.name(), "sub-renderer added");
        self.sub_renderers.push(renderer);
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<(), RenderError> {
        if self.initialized_for.is_none() {
            return Err(RenderError::NotInitialized);
        }
        let world = ctx.world;
        let cam = &world.camera;
        let mut frame = Frame::default();
        frame.push(format!(
            "=== {} ({}, tick={}) {}x{} ===",
            world.label(),
            world.state(),
            world.tick(),
            ctx.viewport.width,
            ctx.viewport.height
        ));
        frame.push(format!(
            "Camera: pos=({:.2}, {:.2}, {:.2}) fwd=({:.2}, {:.2}, {:.2}) aspect={:.3}",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.forward().x,
            cam.forward().y,
            cam.forward().z,
            cam.aspect
        ));
        frame.push(format!("Entities: {}", world.entity_count()));
        for (id, data) in world.entities() {
            let p = data.transform.position;
            frame.push(format!(
                "  [{}] pos=({:.2}, {:.2}, {:.2})",
                id.short(),
                p.x,
                p.y,
                p.z
            ));
        }

        for sub in &mut self.sub_renderers {
            sub.render(ctx, &mut frame)?;
        }

        self.last_frame = frame;
        self.frames += 1;
        Ok(())
    }
}
