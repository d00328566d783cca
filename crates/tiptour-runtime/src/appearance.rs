#![forbid(unsafe_code)]

//! Visual configuration for a tour session.
//!
//! [`AppearanceConfig`] is fixed for the lifetime of a [`TourController`]:
//! every step is laid out and presented with the same values. Layout-related
//! fields are projected into an [`AnchorStyle`] with
//! [`AppearanceConfig::anchor_style`]; the rest is passed through to the
//! presenter untouched.
//!
//! [`TourController`]: crate::controller::TourController

use std::time::Duration;

use tiptour_core::color::Rgba;
use tiptour_core::geometry::Size;
use tiptour_layout::anchor::AnchorStyle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which navigation buttons the bubble shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ButtonMode {
    /// No buttons; the tour advances only through overlay taps or the host.
    None,
    /// Next (or Complete on the last step) only.
    NextOnly,
    /// Previous and Next. Previous is hidden on the first step.
    #[default]
    NextAndPrevious,
}

/// Font selection. `family: None` means the presenter's system font.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FontSpec {
    pub family: Option<String>,
    pub size: f64,
}

impl FontSpec {
    /// System font at `size`.
    #[must_use]
    pub const fn system(size: f64) -> Self {
        Self { family: None, size }
    }

    /// Named font family at `size`.
    #[must_use]
    pub fn named(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: Some(family.into()),
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::system(14.0)
    }
}

/// Button titles. Override these for localization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ButtonLabels {
    pub next: String,
    pub previous: String,
    /// Replaces `next` on the last step.
    pub complete: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            next: "Next".into(),
            previous: "Previous".into(),
            complete: "Complete".into(),
        }
    }
}

/// Styling shared by the navigation buttons.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ButtonAppearance {
    pub font: FontSpec,
    pub text_color: Rgba,
    pub background_color: Rgba,
    pub border_color: Rgba,
    pub border_width: f64,
    pub corner_radius: f64,
}

impl Default for ButtonAppearance {
    fn default() -> Self {
        Self {
            font: FontSpec::system(12.0),
            text_color: Rgba::WHITE,
            background_color: Rgba::BLACK,
            border_color: Rgba::BLACK,
            border_width: 1.0,
            corner_radius: 12.5,
        }
    }
}

/// Appearance and behaviour settings for one tour session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AppearanceConfig {
    pub font: FontSpec,
    pub text_color: Rgba,
    pub background_color: Rgba,
    /// Shared by the bubble and the overlay cutout.
    pub corner_radius: f64,
    /// Arrow base (`width`) and depth (`height`).
    pub arrow_size: Size,
    pub button: ButtonAppearance,
    pub button_mode: ButtonMode,
    pub labels: ButtonLabels,
    pub overlay_color: Rgba,
    /// Multiplied into `overlay_color`'s alpha, clamped to `[0, 1]`.
    pub overlay_opacity: f64,
    /// When set, tapping the overlay advances the tour.
    pub tap_to_dismiss: bool,
    pub cutout_enabled: bool,
    pub cutout_inset: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub padding: f64,
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub fade_in: Duration,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            text_color: Rgba::BLACK,
            background_color: Rgba::WHITE,
            corner_radius: 8.0,
            arrow_size: Size::new(16.0, 8.0),
            button: ButtonAppearance::default(),
            button_mode: ButtonMode::default(),
            labels: ButtonLabels::default(),
            overlay_color: Rgba::BLACK,
            overlay_opacity: 0.5,
            tap_to_dismiss: false,
            cutout_enabled: true,
            cutout_inset: 4.0,
            min_width: 160.0,
            max_width: 200.0,
            padding: 8.0,
            fade_in: Duration::from_millis(500),
        }
    }
}

impl AppearanceConfig {
    /// Create the default appearance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn text_color(mut self, color: Rgba) -> Self {
        self.text_color = color;
        self
    }

    #[must_use]
    pub fn background_color(mut self, color: Rgba) -> Self {
        self.background_color = color;
        self
    }

    #[must_use]
    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    #[must_use]
    pub fn arrow_size(mut self, size: Size) -> Self {
        self.arrow_size = size;
        self
    }

    #[must_use]
    pub fn button(mut self, button: ButtonAppearance) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub fn button_mode(mut self, mode: ButtonMode) -> Self {
        self.button_mode = mode;
        self
    }

    #[must_use]
    pub fn labels(mut self, labels: ButtonLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the overlay colour and opacity.
    #[must_use]
    pub fn overlay(mut self, color: Rgba, opacity: f64) -> Self {
        self.overlay_color = color;
        self.overlay_opacity = opacity;
        self
    }

    #[must_use]
    pub fn tap_to_dismiss(mut self, enabled: bool) -> Self {
        self.tap_to_dismiss = enabled;
        self
    }

    #[must_use]
    pub fn cutout(mut self, enabled: bool, inset: f64) -> Self {
        self.cutout_enabled = enabled;
        self.cutout_inset = inset;
        self
    }

    /// Set the bubble width bounds.
    #[must_use]
    pub fn width_bounds(mut self, min_width: f64, max_width: f64) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn fade_in(mut self, duration: Duration) -> Self {
        self.fade_in = duration;
        self
    }

    /// Overlay colour with `overlay_opacity` applied.
    #[must_use]
    pub fn effective_overlay_color(&self) -> Rgba {
        self.overlay_color.with_opacity(self.overlay_opacity)
    }

    /// Layout parameters for [`tiptour_layout::compute_anchor`].
    #[must_use]
    pub fn anchor_style(&self) -> AnchorStyle {
        AnchorStyle::default()
            .arrow(self.arrow_size)
            .width_bounds(self.min_width, self.max_width)
            .padding(self.padding)
            .cutout_inset(self.cutout_inset)
            .corner_radius(self.corner_radius)
            .cutout_enabled(self.cutout_enabled)
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let a = AppearanceConfig::default();
        assert_eq!(a.font.size, 14.0);
        assert_eq!(a.button.font.size, 12.0);
        assert_eq!(a.button.corner_radius, 12.5);
        assert_eq!(a.button.border_width, 1.0);
        assert_eq!(a.corner_radius, 8.0);
        assert_eq!(a.arrow_size, Size::new(16.0, 8.0));
        assert_eq!(a.button_mode, ButtonMode::NextAndPrevious);
        assert_eq!(a.overlay_opacity, 0.5);
        assert!(!a.tap_to_dismiss);
        assert!(a.cutout_enabled);
        assert_eq!(a.cutout_inset, 4.0);
        assert_eq!((a.min_width, a.max_width), (160.0, 200.0));
        assert_eq!(a.padding, 8.0);
        assert_eq!(a.fade_in, Duration::from_millis(500));
        assert_eq!(a.labels.next, "Next");
        assert_eq!(a.labels.previous, "Previous");
        assert_eq!(a.labels.complete, "Complete");
    }

    #[test]
    fn anchor_style_projects_layout_fields() {
        let a = AppearanceConfig::new()
            .arrow_size(Size::new(20.0, 10.0))
            .width_bounds(100.0, 300.0)
            .padding(12.0)
            .cutout(false, 2.0)
            .corner_radius(6.0);
        let style = a.anchor_style();
        assert_eq!(style.arrow, Size::new(20.0, 10.0));
        assert_eq!((style.min_width, style.max_width), (100.0, 300.0));
        assert_eq!(style.padding, 12.0);
        assert_eq!(style.cutout_inset, 2.0);
        assert_eq!(style.corner_radius, 6.0);
        assert!(!style.cutout_enabled);
    }

    #[test]
    fn effective_overlay_applies_opacity() {
        let a = AppearanceConfig::new().overlay(Rgba::rgb(10, 20, 30), 0.25);
        let c = a.effective_overlay_color();
        assert_eq!((c.r(), c.g(), c.b()), (10, 20, 30));
        assert_eq!(c.a(), 64);
    }
}
