//! Visual configuration for the text box.
//!
//! [`Theme`] is a fully populated struct; every field has a default. Partial
//! configuration (for example from a settings file) is expressed as
//! [`ThemeOverrides`] and resolved once with [`Theme::with_overrides`].
//!
//! # Example
//!
//! ```
//! use quill_core::Color;
//! use quill_ui::theme::{Theme, ThemeOverrides};
//!
//! let theme = Theme::builder()
//!     .font_size(18)
//!     .text_color(Color::from_rgb_u8(250, 240, 220))
//!     .build();
//!
//! let tweaked = theme.with_overrides(&ThemeOverrides {
//!     line_spacing: Some(4),
//!     ..ThemeOverrides::default()
//! });
//! assert_eq!(tweaked.font_size, 18);
//! assert_eq!(tweaked.line_spacing, 4);
//! ```

use quill_core::{Color, Insets};
use quill_text::{FontKey, TextStyle};

/// Scrollbar drawn in the right padding gutter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarStyle {
    pub width: i32,
    /// Gap between the track and the text viewport.
    pub margin: i32,
    pub radius: i32,
    pub min_thumb: i32,
    /// Draw a full-length thumb when the content fits.
    pub show_when_no_overflow: bool,
    pub track_color: Color,
    pub thumb_color: Color,
}

impl Default for ScrollbarStyle {
    fn default() -> Self {
        Self {
            width: 6,
            margin: 8,
            radius: 3,
            min_thumb: 24,
            show_when_no_overflow: true,
            track_color: Color::from_rgba_u8(255, 255, 255, 32),
            thumb_color: Color::from_rgba_u8(255, 255, 255, 192),
        }
    }
}

impl ScrollbarStyle {
    /// Horizontal space reserved next to the viewport.
    pub fn gutter(&self) -> i32 {
        (self.width + self.margin).max(0)
    }
}

/// Vertical placement of the waiting indicator glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorAlign {
    /// Share the baseline of the text line.
    #[default]
    Baseline,
    /// Sit on the bottom of the line box.
    Bottom,
}

/// The pulsing "press to continue" marker.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitIndicatorStyle {
    pub enabled: bool,
    pub glyph: char,
    /// Falls back to the theme text color.
    pub color: Option<Color>,
    /// Seconds per pulse.
    pub period: f32,
    pub alpha_min: u8,
    pub alpha_max: u8,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Glyph size relative to the text font size.
    pub scale: f32,
    /// Falls back to the theme font family.
    pub font_family: Option<String>,
    pub align: IndicatorAlign,
}

impl Default for WaitIndicatorStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            glyph: '▼',
            color: None,
            period: 1.2,
            alpha_min: 40,
            alpha_max: 255,
            offset_x: 6,
            offset_y: 2,
            scale: 1.0,
            font_family: None,
            align: IndicatorAlign::Baseline,
        }
    }
}

/// The choice panel drawn below the dialogue.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceStyle {
    /// Margin between the viewport edge and the panel.
    pub inset: i32,
    /// Padding around each row's text.
    pub padding: Insets,
    /// Distance the panel slides up during its intro.
    pub slide_px: i32,
    pub intro_duration: f32,
    /// Downscale factor for the backdrop blur; values outside `(0, 1)` disable it.
    pub blur_scale: f32,
    pub blur_passes: u32,
    pub tint: Option<Color>,
    pub underline_thickness: i32,
    /// Added to the box border radius.
    pub radius_delta: i32,
}

impl Default for ChoiceStyle {
    fn default() -> Self {
        Self {
            inset: 12,
            padding: Insets::new(8, 10, 8, 10),
            slide_px: 8,
            intro_duration: 0.18,
            blur_scale: 0.25,
            blur_passes: 1,
            tint: Some(Color::from_rgba_u8(0, 0, 0, 96)),
            underline_thickness: 2,
            radius_delta: -4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// `None` selects the default sans-serif family.
    pub font_family: Option<String>,
    pub font_size: u32,
    pub text_color: Color,
    /// Color for echoed player choices.
    pub player_choice_color: Color,
    pub box_background: Color,
    pub box_border: Color,
    pub border_radius: i32,
    pub padding: Insets,
    /// Gap between wrapped lines of one entry.
    pub line_spacing: i32,
    /// Gap between entries.
    pub entry_gap: i32,
    pub scrollbar: ScrollbarStyle,
    pub wait_indicator: WaitIndicatorStyle,
    pub choice: ChoiceStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 22,
            text_color: Color::from_rgb_u8(237, 237, 237),
            player_choice_color: Color::from_rgb_u8(150, 200, 255),
            box_background: Color::from_rgb_u8(20, 22, 27),
            box_border: Color::from_rgb_u8(60, 64, 72),
            border_radius: 16,
            padding: Insets::new(24, 28, 24, 28),
            line_spacing: 8,
            entry_gap: 8,
            scrollbar: ScrollbarStyle::default(),
            wait_indicator: WaitIndicatorStyle::default(),
            choice: ChoiceStyle::default(),
        }
    }
}

impl Theme {
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    pub fn font_key(&self) -> FontKey {
        FontKey::new(self.font_family.as_deref(), self.font_size)
    }

    /// Layout style for dialogue text.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font: self.font_key(),
            color: self.text_color,
            line_spacing: self.line_spacing,
        }
    }

    /// Space between the last dialogue line and the choice panel.
    pub fn choice_gap_above(&self) -> i32 {
        self.entry_gap.max(self.line_spacing)
    }

    pub fn choice_radius(&self) -> i32 {
        (self.border_radius + self.choice.radius_delta).max(4)
    }

    pub fn indicator_color(&self) -> Color {
        self.wait_indicator.color.unwrap_or(self.text_color)
    }

    /// Resolve a partial configuration on top of this theme.
    pub fn with_overrides(&self, overrides: &ThemeOverrides) -> Theme {
        let mut theme = self.clone();
        if let Some(family) = &overrides.font_family {
            theme.font_family = Some(family.clone());
        }
        if let Some(size) = overrides.font_size {
            theme.font_size = size.max(1);
        }
        if let Some(color) = overrides.text_color {
            theme.text_color = color;
        }
        if let Some(color) = overrides.player_choice_color {
            theme.player_choice_color = color;
        }
        if let Some(color) = overrides.box_background {
            theme.box_background = color;
        }
        if let Some(color) = overrides.box_border {
            theme.box_border = color;
        }
        if let Some(radius) = overrides.border_radius {
            theme.border_radius = radius;
        }
        if let Some(padding) = overrides.padding {
            theme.padding = padding;
        }
        if let Some(spacing) = overrides.line_spacing {
            theme.line_spacing = spacing;
        }
        if let Some(gap) = overrides.entry_gap {
            theme.entry_gap = gap;
        }
        if let Some(scrollbar) = &overrides.scrollbar {
            theme.scrollbar = scrollbar.clone();
        }
        if let Some(indicator) = &overrides.wait_indicator {
            theme.wait_indicator = indicator.clone();
        }
        if let Some(choice) = &overrides.choice {
            theme.choice = choice.clone();
        }
        theme
    }
}

/// Optional values layered over a [`Theme`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeOverrides {
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub text_color: Option<Color>,
    pub player_choice_color: Option<Color>,
    pub box_background: Option<Color>,
    pub box_border: Option<Color>,
    pub border_radius: Option<i32>,
    pub padding: Option<Insets>,
    pub line_spacing: Option<i32>,
    pub entry_gap: Option<i32>,
    pub scrollbar: Option<ScrollbarStyle>,
    pub wait_indicator: Option<WaitIndicatorStyle>,
    pub choice: Option<ChoiceStyle>,
}

/// Builder for creating custom themes.
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
        }
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.theme.font_family = Some(family.into());
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.theme.font_size = size.max(1);
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.theme.text_color = color;
        self
    }

    pub fn player_choice_color(mut self, color: Color) -> Self {
        self.theme.player_choice_color = color;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.theme.box_background = color;
        self
    }

    pub fn border(mut self, color: Color) -> Self {
        self.theme.box_border = color;
        self
    }

    pub fn border_radius(mut self, radius: i32) -> Self {
        self.theme.border_radius = radius;
        self
    }

    pub fn padding(mut self, padding: Insets) -> Self {
        self.theme.padding = padding;
        self
    }

    pub fn line_spacing(mut self, spacing: i32) -> Self {
        self.theme.line_spacing = spacing;
        self
    }

    pub fn entry_gap(mut self, gap: i32) -> Self {
        self.theme.entry_gap = gap;
        self
    }

    pub fn scrollbar(mut self, scrollbar: ScrollbarStyle) -> Self {
        self.theme.scrollbar = scrollbar;
        self
    }

    pub fn wait_indicator(mut self, indicator: WaitIndicatorStyle) -> Self {
        self.theme.wait_indicator = indicator;
        self
    }

    pub fn choice(mut self, choice: ChoiceStyle) -> Self {
        self.theme.choice = choice;
        self
    }

    pub fn build(self) -> Theme {
        self.theme
    }
}

impl Default for ThemeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert_eq!(theme.font_size, 22);
        assert_eq!(theme.text_color, Color::from_rgb_u8(237, 237, 237));
        assert_eq!(theme.padding, Insets::new(24, 28, 24, 28));
        assert_eq!(theme.scrollbar.gutter(), 14);
    }

    #[test]
    fn test_theme_builder() {
        let theme = Theme::builder()
            .font_family("Serif Display")
            .font_size(0)
            .entry_gap(12)
            .build();
        assert_eq!(theme.font_family.as_deref(), Some("Serif Display"));
        assert_eq!(theme.font_size, 1);
        assert_eq!(theme.entry_gap, 12);
    }

    #[test]
    fn test_overrides_only_touch_set_fields() {
        let base = Theme::default();
        let theme = base.with_overrides(&ThemeOverrides {
            font_size: Some(30),
            padding: Some(Insets::uniform(4)),
            ..Default::default()
        });
        assert_eq!(theme.font_size, 30);
        assert_eq!(theme.padding, Insets::uniform(4));
        assert_eq!(theme.line_spacing, base.line_spacing);
        assert_eq!(theme.choice, base.choice);
    }

    #[test]
    fn test_derived_values() {
        let theme = Theme::builder().entry_gap(3).line_spacing(5).border_radius(6).build();
        assert_eq!(theme.choice_gap_above(), 5);
        assert_eq!(theme.choice_radius(), 4);
        assert_eq!(theme.indicator_color(), theme.text_color);
        assert_eq!(theme.text_style().font.size, 22);
    }
}
