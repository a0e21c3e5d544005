//! Widgets and colors for the discover window

pub mod search_bar;
pub mod theme;
