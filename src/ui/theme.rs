use ratatui::style::{Color, Modifier, Style};

pub const THEME_NAMES: [&str; 3] = ["dark", "light", "monochrome"];

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Header bar
    pub header_style: Style,
    pub header_accent_style: Style,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub app_info_style: Style,
    pub app_error_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_inline_code_style: Style,
    pub md_codeblock_style: Style,
    pub md_quote_style: Style,
    pub md_link_style: Style,
    pub md_rule_style: Style,

    // Input area
    pub pending_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub status_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            header_style: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0x1f, 0x3a, 0x5f))
                .add_modifier(Modifier::BOLD),
            header_accent_style: Style::default()
                .fg(Color::Rgb(0x9e, 0xc9, 0xff))
                .bg(Color::Rgb(0x1f, 0x3a, 0x5f)),
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            app_info_style: Style::default().fg(Color::DarkGray),
            app_error_style: Style::default().fg(Color::LightRed),

            md_heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            md_inline_code_style: Style::default().fg(Color::Yellow),
            md_codeblock_style: Style::default().fg(Color::Gray),
            md_quote_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            md_link_style: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::UNDERLINED),
            md_rule_style: Style::default().fg(Color::DarkGray),

            pending_indicator_style: Style::default().fg(Color::White),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            status_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            header_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(0xd6, 0xe6, 0xf5))
                .add_modifier(Modifier::BOLD),
            header_accent_style: Style::default()
                .fg(Color::Rgb(0x1f, 0x3a, 0x5f))
                .bg(Color::Rgb(0xd6, 0xe6, 0xf5)),
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            app_info_style: Style::default().fg(Color::Gray),
            app_error_style: Style::default().fg(Color::Red),

            md_heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            md_inline_code_style: Style::default().fg(Color::Magenta),
            md_codeblock_style: Style::default().fg(Color::DarkGray),
            md_quote_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            md_link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            md_rule_style: Style::default().fg(Color::Gray),

            pending_indicator_style: Style::default().fg(Color::Black),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            status_style: Style::default().fg(Color::DarkGray),
        }
    }

    /// No colors, only modifiers. Used for `say` output and dumb terminals.
    pub fn monochrome() -> Self {
        Theme {
            background_color: Color::Reset,
            header_style: Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
            header_accent_style: Style::default().add_modifier(Modifier::REVERSED),
            user_prefix_style: Style::default().add_modifier(Modifier::BOLD),
            user_text_style: Style::default(),
            assistant_text_style: Style::default(),
            app_info_style: Style::default().add_modifier(Modifier::DIM),
            app_error_style: Style::default().add_modifier(Modifier::BOLD),

            md_heading_style: Style::default().add_modifier(Modifier::BOLD),
            md_inline_code_style: Style::default().add_modifier(Modifier::DIM),
            md_codeblock_style: Style::default().add_modifier(Modifier::DIM),
            md_quote_style: Style::default().add_modifier(Modifier::ITALIC),
            md_link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            md_rule_style: Style::default().add_modifier(Modifier::DIM),

            pending_indicator_style: Style::default(),
            input_border_style: Style::default(),
            input_title_style: Style::default(),
            input_text_style: Style::default(),
            status_style: Style::default().add_modifier(Modifier::DIM),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "monochrome" | "mono" => Self::monochrome(),
            // Fallback
            _ => Self::dark_default(),
        }
    }

    pub fn is_known(name: &str) -> bool {
        THEME_NAMES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_dark() {
        assert_eq!(
            Theme::from_name("solarized").background_color,
            Theme::dark_default().background_color
        );
    }

    #[test]
    fn known_theme_names_are_case_insensitive() {
        assert!(Theme::is_known("Light"));
        assert!(Theme::is_known("monochrome"));
        assert!(!Theme::is_known("dracula"));
    }
}
