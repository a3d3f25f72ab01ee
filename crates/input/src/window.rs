//! Window collaborator contract and a headless implementation.
//!
//! The headless window has no surface. It serves scripted events, reports a
//! fixed size, counts presented frames and writes a small text file when a
//! screenshot is requested. [`HeadlessHandle`] shares its state so the
//! driver (tests, the CLI) can keep observing it after the window has been
//! boxed into the game.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::event::InputEvent;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("window has not been created")]
    NotCreated,
    #[error("failed to write screenshot {path}: {source}")]
    Screenshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Windowing and input polling, as the game loop drives it.
pub trait Window {
    fn create(&mut self, title: &str) -> Result<(), WindowError>;

    /// Drain every event received since the previous poll.
    fn process_events(&mut self) -> Vec<InputEvent>;

    /// Drawable size in pixels.
    fn size(&self) -> (u32, u32);

    fn lock_mouse(&mut self);

    fn unlock_mouse(&mut self);

    fn swap_buffers(&mut self);

    fn print_screen_to_file(&mut self, path: &Path) -> Result<(), WindowError>;

    fn close(&mut self);
}

#[derive(Debug, Default)]
struct HeadlessState {
    title: Option<String>,
    width: u32,
    height: u32,
    pending: VecDeque<InputEvent>,
    polls: u64,
    close_after: Option<u64>,
    mouse_locked: bool,
    frames: u64,
    screenshots: Vec<PathBuf>,
    closed: bool,
}

/// Window without a surface.
#[derive(Debug)]
pub struct HeadlessWindow {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                width,
                height,
                ..HeadlessState::default()
            })),
        }
    }

    /// Emit `CloseRequested` on the given poll (1-based), ending the loop
    /// after that many cycles.
    pub fn close_after(self, polls: u64) -> Self {
        self.state.borrow_mut().close_after = Some(polls);
        self
    }

    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            state: Rc::clone(&self.state),
        }
    }
}

impl Window for HeadlessWindow {
    fn create(&mut self, title: &str) -> Result<(), WindowError> {
        let mut state = self.state.borrow_mut();
        tracing::info!(title, width = state.width, height = state.height, "headless window created");
        state.title = Some(title.to_string());
        state.closed = false;
        Ok(())
    }

    fn process_events(&mut self) -> Vec<InputEvent> {
        let mut state = self.state.borrow_mut();
        state.polls += 1;
        let mut events: Vec<InputEvent> = state.pending.drain(..).collect();
        if state.close_after == Some(state.polls) {
            events.push(InputEvent::CloseRequested);
        }
        events
    }

    fn size(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.width, state.height)
    }

    fn lock_mouse(&mut self) {
        self.state.borrow_mut().mouse_locked = true;
    }

    fn unlock_mouse(&mut self) {
        self.state.borrow_mut().mouse_locked = false;
    }

    fn swap_buffers(&mut self) {
        self.state.borrow_mut().frames += 1;
    }

    fn print_screen_to_file(&mut self, path: &Path) -> Result<(), WindowError> {
        let mut state = self.state.borrow_mut();
        if state.title.is_none() {
            return Err(WindowError::NotCreated);
        }
        let contents = format!(
            "headless frame {} {}x{}\n",
            state.frames, state.width, state.height
        );
        std::fs::write(path, contents).map_err(|source| WindowError::Screenshot {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "screenshot written");
        state.screenshots.push(path.to_path_buf());
        Ok(())
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed = true;
        tracing::info!("headless window closed");
    }
}

/// Shared view of a [`HeadlessWindow`] for whoever drives it.
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHandle {
    /// Queue an event for the next poll.
    pub fn push_event(&self, event: InputEvent) {
        self.state.borrow_mut().pending.push_back(event);
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
        state.pending.push_back(InputEvent::Resized { width, height });
    }

    pub fn title(&self) -> Option<String> {
        self.state.borrow().title.clone()
    }

    pub fn polls(&self) -> u64 {
        self.state.borrow().polls
    }

    pub fn frames_presented(&self) -> u64 {
        self.state.borrow().frames
    }

    pub fn mouse_locked(&self) -> bool {
        self.state.borrow().mouse_locked
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state.borrow().screenshots.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyCode;

    #[test]
    fn events_are_drained_per_poll() {
        let mut window = HeadlessWindow::new(640, 480);
        let handle = window.handle();
        handle.push_event(InputEvent::KeyPressed(KeyCode::W));
        handle.push_event(InputEvent::KeyReleased(KeyCode::W));

        assert_eq!(window.process_events().len(), 2);
        assert!(window.process_events().is_empty());
        assert_eq!(handle.polls(), 2);
    }

    #[test]
    fn close_after_emits_close_on_that_poll() {
        let mut window = HeadlessWindow::new(640, 480).close_after(2);
        assert!(window.process_events().is_empty());
        assert_eq!(window.process_events(), vec![InputEvent::CloseRequested]);
        assert!(window.process_events().is_empty());
    }

    #[test]
    fn resize_updates_size_and_queues_event() {
        let window = HeadlessWindow::new(640, 480);
        let handle = window.handle();
        handle.resize(800, 600);
        assert_eq!(window.size(), (800, 600));
    }

    #[test]
    fn mouse_lock_and_frames() {
        let mut window = HeadlessWindow::new(1, 1);
        let handle = window.handle();
        window.lock_mouse();
        assert!(handle.mouse_locked());
        window.unlock_mouse();
        assert!(!handle.mouse_locked());
        window.swap_buffers();
        window.swap_buffers();
        assert_eq!(handle.frames_presented(), 2);
    }

    #[test]
    fn screenshot_requires_created_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut window = HeadlessWindow::new(320, 200);
        let path = dir.path().join("shot.bmp");
        assert!(matches!(
            window.print_screen_to_file(&path),
            Err(WindowError::NotCreated)
        ));

        window.create("test").unwrap();
        window.swap_buffers();
        window.print_screen_to_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("320x200"));
        assert_eq!(window.handle().screenshots(), vec![path]);
    }

    #[test]
    fn close_marks_handle() {
        let mut window = HeadlessWindow::new(1, 1);
        let handle = window.handle();
        window.create("t").unwrap();
        assert_eq!(handle.title().as_deref(), Some("t"));
        window.close();
        assert!(handle.is_closed());
    }
}
