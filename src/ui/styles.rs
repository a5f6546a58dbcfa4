use ratatui::style::{Color, Modifier, Style};

// ── Background colors ──
pub const BG: Color = Color::Rgb(14, 14, 16);
pub const PANEL: Color = Color::Rgb(24, 24, 28);
pub const BORDER: Color = Color::Rgb(58, 58, 66);

// ── Text colors ──
pub const TEXT: Color = Color::Rgb(198, 198, 204);
pub const DIM: Color = Color::Rgb(106, 106, 114);
pub const MUTED: Color = Color::Rgb(140, 140, 148);
pub const BRIGHT: Color = Color::Rgb(236, 236, 240);

// ── Accent colors ──
pub const BLUE: Color = Color::Rgb(100, 160, 250);
pub const CYAN: Color = Color::Rgb(70, 200, 230);
pub const GREEN: Color = Color::Rgb(90, 220, 130);
pub const YELLOW: Color = Color::Rgb(240, 200, 60);
pub const RED: Color = Color::Rgb(245, 110, 110);

// ── Composed styles ──

pub fn default_style() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn selected_style() -> Style {
    Style::default().fg(BRIGHT).bg(Color::Rgb(30, 44, 60))
}

pub fn branch_style() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

pub fn section_header_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::BOLD)
}

pub fn dim_style() -> Style {
    Style::default().fg(DIM)
}

pub fn status_added() -> Style {
    Style::default().fg(GREEN).add_modifier(Modifier::BOLD)
}

pub fn status_deleted() -> Style {
    Style::default().fg(RED).add_modifier(Modifier::BOLD)
}

pub fn status_modified() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn status_untracked() -> Style {
    Style::default().fg(BLUE).add_modifier(Modifier::BOLD)
}

pub fn status_conflict() -> Style {
    Style::default().fg(RED).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

// ── Modal styles ──

pub fn modal_style() -> Style {
    Style::default().fg(TEXT).bg(PANEL)
}

pub fn modal_border_style() -> Style {
    Style::default().fg(BORDER)
}

pub fn modal_title_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::BOLD)
}

pub fn cursor_style() -> Style {
    Style::default().fg(BLUE)
}
