//! Visual themes for generated forms

use tracing::debug;

use shared_types::{BorderTokens, ColorTokens, SpacingTokens, TypographyTokens, VisualConfig};

pub const THEMES: &[&str] = &["default", "modern", "compact"];

fn tokens(s: &str) -> String {
    s.to_string()
}

/// Theme tokens by name; unknown names get the default theme
pub fn visual_config(theme: &str) -> VisualConfig {
    let wanted = theme.trim().to_lowercase();
    match wanted.as_str() {
        "modern" => modern(),
        "compact" => compact(),
        "default" | "" => default_theme(),
        other => {
            debug!(theme = other, "Unknown theme, using default");
            default_theme()
        }
    }
}

fn default_theme() -> VisualConfig {
    VisualConfig {
        theme: tokens("default"),
        colors: ColorTokens {
            primary: tokens("#1f4e79"),
            secondary: tokens("#5b6b7b"),
            background: tokens("#ffffff"),
            surface: tokens("#f5f7fa"),
            text: tokens("#1a1a1a"),
            error: tokens("#c62828"),
            border: tokens("#d0d7de"),
        },
        typography: TypographyTokens {
            font_family: tokens("Georgia, 'Times New Roman', serif"),
            font_size: tokens("16px"),
            heading_size: tokens("22px"),
            line_height: tokens("1.5"),
        },
        spacing: SpacingTokens {
            section_gap: tokens("32px"),
            field_gap: tokens("16px"),
            padding: tokens("24px"),
        },
        borders: BorderTokens {
            radius: tokens("4px"),
            width: tokens("1px"),
            style: tokens("solid"),
        },
    }
}

fn modern() -> VisualConfig {
    VisualConfig {
        theme: tokens("modern"),
        colors: ColorTokens {
            primary: tokens("#4f46e5"),
            secondary: tokens("#64748b"),
            background: tokens("#f8fafc"),
            surface: tokens("#ffffff"),
            text: tokens("#0f172a"),
            error: tokens("#dc2626"),
            border: tokens("#e2e8f0"),
        },
        typography: TypographyTokens {
            font_family: tokens("Inter, system-ui, sans-serif"),
            font_size: tokens("15px"),
            heading_size: tokens("24px"),
            line_height: tokens("1.6"),
        },
        spacing: SpacingTokens {
            section_gap: tokens("40px"),
            field_gap: tokens("20px"),
            padding: tokens("32px"),
        },
        borders: BorderTokens {
            radius: tokens("12px"),
            width: tokens("1px"),
            style: tokens("solid"),
        },
    }
}

fn compact() -> VisualConfig {
    VisualConfig {
        theme: tokens("compact"),
        typography: TypographyTokens {
            font_family: tokens("system-ui, sans-serif"),
            font_size: tokens("13px"),
            heading_size: tokens("16px"),
            line_height: tokens("1.3"),
        },
        spacing: SpacingTokens {
            section_gap: tokens("12px"),
            field_gap: tokens("6px"),
            padding: tokens("8px"),
        },
        borders: BorderTokens {
            radius: tokens("2px"),
            width: tokens("1px"),
            style: tokens("solid"),
        },
        ..default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_themes() {
        for name in THEMES {
            assert_eq!(visual_config(name).theme, *name);
        }
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(visual_config("neon"), visual_config("default"));
    }

    #[test]
    fn test_compact_keeps_default_palette() {
        assert_eq!(visual_config("compact").colors, visual_config("default").colors);
    }
}
