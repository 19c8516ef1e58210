//! Color theme constants for the console UI.
//!
//! Defines the minimal dark color palette used throughout the UI.

use ratatui::style::Color;

/// Primary border color - dark gray for minimal aesthetic
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color - white for highlights and the focused element
pub const COLOR_ACCENT: Color = Color::White;

/// Header text color - white for the title
pub const COLOR_HEADER: Color = Color::White;

/// Dim text for labels and less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Inline validation errors and the failure banner
pub const COLOR_ERROR: Color = Color::Red;

/// Success state - green
pub const COLOR_SUCCESS: Color = Color::Rgb(4, 181, 117); // green #04B575

/// Disabled buttons - gray
pub const COLOR_DISABLED: Color = Color::Gray;
