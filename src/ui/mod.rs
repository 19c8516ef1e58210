//! Rendering layer.
//!
//! Pure views over [`App`]: rendering never mutates state. The flow is
//! observed through its accessors and redrawn whenever the run loop marks
//! the app dirty.

pub mod helpers;
pub mod login;
pub mod session;
pub mod theme;

use ratatui::Frame;

use crate::app::{App, Screen};

/// Render the current screen.
pub fn render(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::SignIn => login::render_sign_in(frame, app),
        Screen::Session => session::render_session(frame, app),
    }
}
