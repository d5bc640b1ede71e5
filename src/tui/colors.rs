//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Filter;

// Indigo primary and pink secondary, each with light and dark variants.

/// Toolbar and selection background.
pub const PRIMARY: Color = Color::Rgb(63, 81, 181);
pub const PRIMARY_LIGHT: Color = Color::Rgb(117, 125, 232);
pub const PRIMARY_DARK: Color = Color::Rgb(0, 41, 132);
/// Destructive actions: trash view, empty-trash alert.
pub const SECONDARY: Color = Color::Rgb(233, 30, 99);
pub const SECONDARY_LIGHT: Color = Color::Rgb(255, 96, 144);
pub const SECONDARY_DARK: Color = Color::Rgb(176, 0, 58);

/// Toolbar color for the current view.
pub fn filter_color(filter: Filter) -> Color {
    match filter {
        Filter::All => PRIMARY,
        Filter::Active => PRIMARY_LIGHT,
        Filter::Checked => PRIMARY_DARK,
        Filter::Removed => SECONDARY_DARK,
    }
}
