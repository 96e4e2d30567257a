use anyhow::Result;
use ratatui::style::Color;
use ratatui::widgets::BorderType;
use serde::{Deserialize, Serialize};

use crate::config::config_dir;

pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 { return Color::Reset; }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(0);
    Color::Rgb(r, g, b)
}

fn default_border_style() -> String { "rounded".to_owned() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    // Widget faces
    pub bg_widget: String, pub bg_row: String,
    pub border: String,
    // Text
    pub text_title: String, pub text_muted: String,
    /// Department badge on list rows.
    pub text_dept: String,
    /// Live countdown digits.
    pub timer_fg: String,
    pub done_fg: String,
    /// Border style: "rounded" | "double" | "thick" | "plain"
    #[serde(default = "default_border_style")]
    pub border_style: String,
}

impl ThemeConfig {
    // ── Color accessors ───────────────────────────────────────────────────────
    pub fn bg(&self)      -> Color { hex_to_color(&self.bg_widget) }
    pub fn row_bg(&self)  -> Color { hex_to_color(&self.bg_row) }
    pub fn border(&self)  -> Color { hex_to_color(&self.border) }
    pub fn fg(&self)      -> Color { hex_to_color(&self.text_title) }
    pub fn fg_dim(&self)  -> Color { hex_to_color(&self.text_muted) }
    pub fn dept(&self)    -> Color { hex_to_color(&self.text_dept) }
    pub fn timer(&self)   -> Color { hex_to_color(&self.timer_fg) }
    pub fn done(&self)    -> Color { hex_to_color(&self.done_fg) }

    pub fn border_type(&self) -> BorderType {
        match self.border_style.as_str() {
            "double" => BorderType::Double,
            "thick"  => BorderType::Thick,
            "plain"  => BorderType::Plain,
            _        => BorderType::Rounded,
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────
    pub fn load() -> Result<Self> {
        let path = config_dir().join("theme.toml");
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(&path)?)?)
        } else {
            let t = ThemeConfig::default();
            t.save()?;
            Ok(t)
        }
    }

    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl Default for ThemeConfig {
    fn default() -> Self { Self {
        name: "deadline-red".into(),
        bg_widget: "#6c1606".into(), bg_row: "#4a0f04".into(),
        border: "#9a2a12".into(),
        text_title: "#ffffff".into(), text_muted: "#d9a89c".into(),
        text_dept: "#ffd7a8".into(), timer_fg: "#faf807".into(), done_fg: "#9be29b".into(),
        border_style: "rounded".into(),
    }}
}
