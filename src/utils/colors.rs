/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

use crate::models::category::Category;

/// Color used for a category label in listings:
/// start → green, step-away → yellow, return-to-seat → blue,
/// end → red, holiday → magenta.
pub fn color_for_category(category: Category) -> &'static str {
    match category {
        Category::Start => GREEN,
        Category::StepAway => YELLOW,
        Category::ReturnToSeat => BLUE,
        Category::End => RED,
        Category::Holiday(_) => MAGENTA,
    }
}

/// Paint a category label, e.g. "<green>start<reset>".
pub fn colorize_category(category: Category) -> String {
    format!("{}{}{}", color_for_category(category), category, RESET)
}
