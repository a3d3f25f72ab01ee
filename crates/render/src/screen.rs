use crate::renderer::{Frame, RenderContext, RenderError, SubRenderer};

/// A transient full-screen message (loading text, "paused", a death
/// screen). Queued during a cycle and cleared after it is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: String,
    pub text: String,
}

impl Screen {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Screens queued for the current cycle.
#[derive(Debug, Clone, Default)]
pub struct ScreenQueue {
    screens: Vec<Screen>,
}

impl ScreenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, screen: Screen) {
        self.screens.push(screen);
    }

    pub fn as_slice(&self) -> &[Screen] {
        &self.screens
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn clear(&mut self) {
        self.screens.clear();
    }
}

/// Draws the cycle's queued screens on top of the scene.
#[derive(Debug, Default)]
pub struct ScreenRenderer;

impl ScreenRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl SubRenderer for ScreenRenderer {
    fn name(&self) -> &str {
        "screens"
    }

    fn render(&mut self, ctx: &RenderContext<'_>, frame: &mut Frame) -> Result<(), RenderError> {
        for screen in ctx.screens {
            frame.push(format!("[{}] {}", screen.title, screen.text));
        }
        Ok(())
    }
}
