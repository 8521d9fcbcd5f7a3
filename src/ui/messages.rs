//! One-line user messages. Diagnostics go through `tracing` instead.

use ansi_term::{Colour, Style};
use std::fmt::Display;

fn line(style: Style, icon: &str, msg: impl Display) -> String {
    format!("{} {}", style.paint(icon), msg)
}

pub fn info(msg: impl Display) {
    println!("{}", line(Colour::Blue.bold(), "ℹ️", msg));
}

pub fn success(msg: impl Display) {
    println!("{}", line(Colour::Green.bold(), "✅", msg));
}

pub fn warning(msg: impl Display) {
    println!("{}", line(Colour::Yellow.bold(), "⚠️", msg));
}

/// Goes to stderr, unlike the others.
pub fn error(msg: impl Display) {
    eprintln!("{}", line(Colour::Red.bold(), "❌", msg));
}
