//! Color theme system for diffpilot.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! diffpilot renders, plus the name of the syntect theme used for code. Three
//! built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors only, so it works on any terminal. Selected by
//!   `--ansi` together with `--dark-mode on`.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; requires truecolor.
//!   Default for `--dark-mode on`.
//! - `light`: for light terminal backgrounds; used for `--dark-mode off`.

use std::str::FromStr;

use diffpilot_core::config::TagStyle;
use ratatui::style::{Color, Modifier, Style};

/// All color values used across diffpilot's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Diff view
    /// Added lines (`+`).
    pub diff_added: Color,
    /// Removed lines (`-`).
    pub diff_removed: Color,
    /// Unchanged context lines.
    pub diff_context: Color,
    /// Hunk header lines (`@@ ... @@`).
    pub diff_hunk_header: Color,
    /// Header metadata kept in binary and mode-only diffs.
    pub diff_metadata: Color,
    /// Per-file header line inside the diff panel.
    pub file_header: Color,

    // File list
    /// File status: newly added.
    pub file_added: Color,
    /// File status: deleted.
    pub file_removed: Color,
    /// File status: modified.
    pub file_modified: Color,
    /// Group heading above the first file of each group.
    pub group_title: Color,
    /// Default tag badge color when the configuration gives no style.
    pub tag_default: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Window title segment of the status bar.
    pub status_title: Color,
    /// Last pipeline error.
    pub status_error: Color,

    /// syntect theme used to highlight code lines.
    pub syntax_theme: &'static str,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,
            diff_hunk_header: Color::Cyan,
            diff_metadata: Color::DarkGray,
            file_header: Color::White,

            file_added: Color::Green,
            file_removed: Color::Red,
            file_modified: Color::Yellow,
            group_title: Color::Magenta,
            tag_default: Color::Blue,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_title: Color::Cyan,
            status_error: Color::LightRed,

            syntax_theme: "base16-ocean.dark",
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let mauve = Color::Rgb(203, 166, 247);    // #cba6f7
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            diff_added: green,
            diff_removed: red,
            diff_context: text,
            diff_hunk_header: teal,
            diff_metadata: overlay1,
            file_header: text,

            file_added: green,
            file_removed: red,
            file_modified: yellow,
            group_title: mauve,
            tag_default: blue,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_title: lavender,
            status_error: red,

            syntax_theme: "base16-ocean.dark",
        }
    }

    /// Returns a theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            border_active: Color::Blue,
            border_inactive: Color::Gray,

            diff_added: Color::Rgb(26, 127, 55),
            diff_removed: Color::Rgb(207, 34, 46),
            diff_context: Color::Reset,
            diff_hunk_header: Color::Rgb(9, 105, 218),
            diff_metadata: Color::Gray,
            file_header: Color::Black,

            file_added: Color::Rgb(26, 127, 55),
            file_removed: Color::Rgb(207, 34, 46),
            file_modified: Color::Rgb(154, 103, 0),
            group_title: Color::Rgb(130, 80, 223),
            tag_default: Color::Blue,

            status_bar_bg: Color::Gray,
            status_bar_fg: Color::Black,
            status_title: Color::Blue,
            status_error: Color::Red,

            syntax_theme: "InspiredGitHub",
        }
    }

    /// Picks the palette for the `dark_mode` setting.
    ///
    /// `ansi` swaps the truecolor dark palette for the ANSI 16 one; the light
    /// palette is used as is.
    pub fn select(dark_mode: bool, ansi: bool) -> Self {
        match (dark_mode, ansi) {
            (true, true) => Self::dark(),
            (true, false) => Self::catppuccin_mocha(),
            (false, _) => Self::light(),
        }
    }

    /// Badge style for a tag, using its configured colors when they parse.
    ///
    /// Accepts anything `ratatui::style::Color` parses: names such as `"red"`
    /// and `"#rrggbb"` hex. Unparseable values fall back to the theme default.
    pub fn tag_style(&self, style: Option<&TagStyle>) -> Style {
        let parse = |value: &Option<String>| {
            value.as_deref().and_then(|v| Color::from_str(v).ok())
        };
        let fg = style.and_then(|s| parse(&s.color));
        let bg = style.and_then(|s| parse(&s.background));

        let mut out = Style::default().add_modifier(Modifier::BOLD);
        out = out.fg(fg.unwrap_or(if bg.is_some() { Color::Reset } else { self.tag_default }));
        if let Some(bg) = bg {
            out = out.bg(bg);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_style_parses_hex_and_names() {
        let theme = Theme::dark();
        let style = TagStyle {
            color: Some("#ffffff".to_owned()),
            background: Some("blue".to_owned()),
        };
        let out = theme.tag_style(Some(&style));
        assert_eq!(out.fg, Some(Color::Rgb(255, 255, 255)));
        assert_eq!(out.bg, Some(Color::Blue));
    }

    #[test]
    fn ansi_flag_selects_sixteen_color_dark_palette() {
        assert_eq!(Theme::select(true, true).border_active, Color::Cyan);
        assert_eq!(Theme::select(true, false).border_active, Color::Rgb(180, 190, 254));
        assert_eq!(Theme::select(false, true).syntax_theme, "InspiredGitHub");
    }

    #[test]
    fn unknown_tag_uses_default_color() {
        let theme = Theme::dark();
        assert_eq!(theme.tag_style(None).fg, Some(theme.tag_default));
        let bogus = TagStyle { color: Some("not-a-color".to_owned()), background: None };
        assert_eq!(theme.tag_style(Some(&bogus)).fg, Some(theme.tag_default));
    }
}
