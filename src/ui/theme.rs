use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::store::schema::ThemeMode;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub surface: String,
    pub fg: String,
    pub text_dim: String,
    pub primary: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub liked: String,
    pub error: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("lunchpick")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path)
                && let Ok(theme) = toml::from_str::<Theme>(&content)
            {
                return Some(theme);
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        if let Some(file) = ThemeAssets::get(&filename)
            && let Ok(content) = std::str::from_utf8(file.data.as_ref())
            && let Ok(theme) = toml::from_str::<Theme>(content)
        {
            return Some(theme);
        }

        None
    }

    /// Bundled theme for a persisted theme setting; the dark palette is
    /// the fallback of last resort.
    pub fn for_mode(mode: ThemeMode) -> Self {
        Self::load(mode.asset_name()).unwrap_or_else(|| Self {
            name: "dark".to_string(),
            colors: ThemeColors::default(),
        })
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::Dark)
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#111827".to_string(),
            surface: "#1f2937".to_string(),
            fg: "#f1f5f9".to_string(),
            text_dim: "#94a3b8".to_string(),
            primary: "#6dd5ed".to_string(),
            accent: "#fbbf24".to_string(),
            border: "#334155".to_string(),
            border_focused: "#67e8f9".to_string(),
            header_bg: "#1f2937".to_string(),
            header_fg: "#f1f5f9".to_string(),
            liked: "#fecdd3".to_string(),
            error: "#f87171".to_string(),
            success: "#34d399".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn surface(&self) -> Color { Self::parse_color(&self.surface) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn primary(&self) -> Color { Self::parse_color(&self.primary) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn liked(&self) -> Color { Self::parse_color(&self.liked) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_handles_hex_and_garbage() {
        assert_eq!(ThemeColors::parse_color("#112233"), Color::Rgb(17, 34, 51));
        assert_eq!(ThemeColors::parse_color("112233"), Color::Rgb(17, 34, 51));
        assert_eq!(ThemeColors::parse_color("#zzz"), Color::White);
        assert_eq!(ThemeColors::parse_color(""), Color::White);
    }

    #[test]
    fn bundled_themes_cover_both_modes() {
        let themes = Theme::available_themes();
        assert!(themes.iter().any(|t| t == "light"));
        assert!(themes.iter().any(|t| t == "dark"));
    }

    #[test]
    fn for_mode_loads_the_matching_palette() {
        assert_eq!(Theme::for_mode(ThemeMode::Light).name, "light");
        assert_eq!(Theme::for_mode(ThemeMode::Dark).name, "dark");
    }
}
