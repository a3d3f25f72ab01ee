use lumen_input::InputEvent;

use crate::renderer::{RenderContext, RenderError};

/// UI drawn over the rendered scene (debug panels, menus).
///
/// The overlay sees window events before the game does and may consume
/// them; consumed events never reach the world.
pub trait Overlay {
    /// Return true to consume the event.
    fn process_event(&mut self, event: &InputEvent) -> bool;

    /// Called once per cycle after events are processed.
    fn new_frame(&mut self);

    fn render(&mut self, ctx: &RenderContext<'_>) -> Result<(), RenderError>;

    fn shutdown(&mut self) {}
}
