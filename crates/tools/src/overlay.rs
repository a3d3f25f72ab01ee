use lumen_input::{InputEvent, KeyCode};
use lumen_render::{Overlay, RenderContext, RenderError};

use crate::inspector::WorldInspector;

/// Text overlay showing the inspector summary of the active world.
/// Releasing F1 toggles it; F1 never reaches the game.
#[derive(Debug)]
pub struct InspectorOverlay {
    visible: bool,
    frames: u64,
    last_text: Option<String>,
    shut_down: bool,
}

impl InspectorOverlay {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            frames: 0,
            last_text: None,
            shut_down: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Text drawn by the most recent visible render.
    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Default for InspectorOverlay {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Overlay for InspectorOverlay {
    fn process_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyReleased(KeyCode::F1) => {
                self.visible = !self.visible;
                tracing::debug!(visible = self.visible, "inspector overlay toggled");
                true
            }
            InputEvent::KeyPressed(KeyCode::F1) => true,
            _ => false,
        }
    }

    fn new_frame(&mut self) {
        self.frames += 1;
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<(), RenderError> {
        if !self.visible {
            return Ok(());
        }
        let summary = WorldInspector::summary(ctx.world);
        let text = format!("{summary}\n{}", summary.player);
        tracing::trace!(overlay = %text, "inspector overlay");
        self.last_text = Some(text);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}
