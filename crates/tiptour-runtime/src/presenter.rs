#![forbid(unsafe_code)]

//! The rendering boundary.
//!
//! The controller never draws. For each step it measures the message through
//! [`Presenter::measure`], computes placement, and hands a fully resolved
//! [`StepPresentation`] to [`Presenter::render`]. The returned handle is
//! owned by the controller and given back through [`Presenter::teardown`]
//! before anything else is presented, so at most one step is on screen.
//!
//! User input travels the other way: the host converts button presses and
//! overlay taps into [`Interaction`] values and forwards them to
//! [`TourController::handle`].
//!
//! [`TourController::handle`]: crate::controller::TourController::handle

use std::time::Duration;

use tiptour_core::color::Rgba;
use tiptour_core::geometry::{Rect, Size};
use tiptour_layout::anchor::{AnchorGeometry, Side};

use crate::appearance::{AppearanceConfig, ButtonLabels, ButtonMode};
use crate::target::TooltipItem;

/// Height of a navigation button.
pub const BUTTON_HEIGHT: f64 = 25.0;
/// Width of a navigation button.
pub const BUTTON_WIDTH: f64 = 70.0;
/// Space between the message and the button row, and below the row.
pub const BUTTON_SPACING: f64 = 8.0;

/// User input forwarded from the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Next or Complete button.
    Next,
    /// Previous button.
    Previous,
    /// Tap anywhere on the dimming overlay.
    OverlayTap,
}

/// Which buttons a step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub show_previous: bool,
    pub show_next: bool,
    /// The Next button reads "Complete" (last step).
    pub next_is_complete: bool,
}

impl ButtonState {
    /// Visibility for step `index` of `count` under `mode`.
    ///
    /// | mode | previous | next |
    /// |------|----------|------|
    /// | `None` | hidden | hidden |
    /// | `NextOnly` | hidden | shown |
    /// | `NextAndPrevious` | hidden on the first step | shown |
    #[must_use]
    pub fn for_step(mode: ButtonMode, index: usize, count: usize) -> Self {
        let is_first = index == 0;
        let is_last = index + 1 >= count;
        match mode {
            ButtonMode::None => Self::default(),
            ButtonMode::NextOnly => Self {
                show_previous: false,
                show_next: true,
                next_is_complete: is_last,
            },
            ButtonMode::NextAndPrevious => Self {
                show_previous: !is_first,
                show_next: true,
                next_is_complete: is_last,
            },
        }
    }

    /// `true` if any button is visible.
    #[inline]
    #[must_use]
    pub fn any_visible(&self) -> bool {
        self.show_previous || self.show_next
    }

    /// Height the button row adds below the message.
    #[must_use]
    pub fn footer_height(&self) -> f64 {
        if self.any_visible() {
            BUTTON_SPACING + BUTTON_HEIGHT
        } else {
            0.0
        }
    }

    /// Title for the Next button, `None` when hidden.
    #[must_use]
    pub fn next_label<'a>(&self, labels: &'a ButtonLabels) -> Option<&'a str> {
        if !self.show_next {
            return None;
        }
        Some(if self.next_is_complete {
            labels.complete.as_str()
        } else {
            labels.next.as_str()
        })
    }

    /// Title for the Previous button, `None` when hidden.
    #[must_use]
    pub fn previous_label<'a>(&self, labels: &'a ButtonLabels) -> Option<&'a str> {
        self.show_previous.then_some(labels.previous.as_str())
    }
}

/// Everything a presenter needs to draw one step.
#[derive(Debug, Clone)]
pub struct StepPresentation<'a> {
    /// Position in the sequence.
    pub index: usize,
    /// Sequence length.
    pub count: usize,
    pub item: &'a TooltipItem,
    /// Root container bounds.
    pub container: Rect,
    /// Resolved target bounds.
    pub target: Rect,
    pub geometry: AnchorGeometry,
    /// Overlay colour with opacity applied. Covers the container except the
    /// cutout, or all of it when `geometry.cutout` is `None`.
    pub overlay_color: Rgba,
    pub buttons: ButtonState,
    pub next_label: Option<&'a str>,
    pub previous_label: Option<&'a str>,
    /// Overlay taps should be reported as [`Interaction::OverlayTap`].
    pub tap_to_advance: bool,
    /// Fade-in the presenter should run. The controller does not wait for it.
    pub fade_in: Duration,
    pub appearance: &'a AppearanceConfig,
}

impl StepPresentation<'_> {
    #[inline]
    pub fn message(&self) -> &str {
        self.item.message()
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.geometry.side
    }

    #[inline]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }
}

/// Draws and removes tour steps.
pub trait Presenter {
    /// Token for whatever `render` created; returned to `teardown`.
    type Handle;

    /// Natural size of the bubble content for `message` when wrapped to
    /// `max_width`, including the button row described by `buttons`.
    fn measure(&self, message: &str, buttons: ButtonState, max_width: f64) -> Size;

    /// Present one step: overlay, cutout, bubble, arrow, message and buttons.
    fn render(&mut self, step: &StepPresentation<'_>) -> Self::Handle;

    /// Remove everything created by the `render` call that returned `handle`.
    fn teardown(&mut self, handle: Self::Handle);
}
