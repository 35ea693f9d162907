use ratatui::style::{Color, Modifier, Style};

/// Catppuccin Frappe colours used by the goal screen
pub struct Palette;

impl Palette {
    pub const BASE: Color = Color::Rgb(48, 52, 70);
    pub const TEXT: Color = Color::Rgb(198, 208, 245);
    pub const SUBTEXT: Color = Color::Rgb(165, 173, 203);
    pub const SURFACE: Color = Color::Rgb(87, 96, 134);
    pub const HIGHLIGHT_BG: Color = Color::Rgb(65, 72, 104);

    pub const BLUE: Color = Color::Rgb(140, 170, 238);
    pub const LAVENDER: Color = Color::Rgb(186, 187, 241);
    pub const GREEN: Color = Color::Rgb(166, 209, 137);
    pub const PEACH: Color = Color::Rgb(239, 159, 118);
    pub const RED: Color = Color::Rgb(231, 130, 132);
}

pub fn border() -> Style {
    Style::default().fg(Palette::SURFACE)
}

pub fn selected() -> Style {
    Style::default().bg(Palette::HIGHLIGHT_BG).fg(Palette::BLUE)
}

pub fn row(completed: bool, depth: usize) -> Style {
    match (completed, depth) {
        (true, _) => Style::default().fg(Palette::GREEN).add_modifier(Modifier::CROSSED_OUT),
        (false, 0) => Style::default().fg(Palette::TEXT),
        (false, _) => Style::default().fg(Palette::SUBTEXT),
    }
}

pub fn breadcrumb(active: bool) -> Style {
    if active {
        Style::default().fg(Palette::PEACH).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Palette::LAVENDER)
    }
}

pub fn error() -> Style {
    Style::default().fg(Palette::RED)
}

pub fn popup() -> Style {
    Style::default().fg(Palette::TEXT).bg(Palette::BASE)
}
