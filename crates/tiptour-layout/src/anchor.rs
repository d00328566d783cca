#![forbid(unsafe_code)]

//! Anchored bubble placement.
//!
//! Given a target rectangle, a preferred [`Side`], the container bounds and
//! the measured bubble content, [`compute_anchor`] produces the bubble
//! rectangle, the arrow position along the bubble's facing edge and the
//! overlay cutout around the target.
//!
//! # Invariants
//!
//! 1. The bubble sits on the requested side, separated from the target by
//!    `padding` plus the arrow depth, whenever that position fits inside the
//!    container inset by `padding`.
//! 2. On the cross axis the bubble is centred on the target, then slid so it
//!    stays inside the padded container.
//! 3. The padded container wins over the gap. A bubble that would leave it on
//!    the main axis slides back in, so the gap shrinks and the bubble may
//!    cover the target. The arrow stays attached to the bubble.
//! 4. The arrow offset stays within `[arrow.width / 2 + padding,
//!    edge - arrow.width / 2 - padding]` so it never overlaps the rounded
//!    corners. If the edge is too short for that, the arrow is centred.
//! 5. The function is pure and total: zero-sized or non-finite inputs never
//!    panic.
//!
//! # Degenerate containers
//!
//! A bubble wider than the padded container shrinks its width to fit, on
//! every side. A bubble taller than the padded container keeps its height
//! and pins to the top of the span.
//!
//! # Example
//!
//! ```
//! use tiptour_core::geometry::{Rect, Size};
//! use tiptour_layout::anchor::{compute_anchor, AnchorRequest, AnchorStyle, Side};
//!
//! let request = AnchorRequest::new(
//!     Rect::new(100.0, 50.0, 40.0, 20.0),
//!     Side::Bottom,
//!     Rect::from_size(375.0, 800.0),
//! )
//! .content(Size::new(180.0, 60.0));
//!
//! let geometry = compute_anchor(&request, &AnchorStyle::default());
//! assert_eq!(geometry.bubble.y, 70.0 + 8.0 + 8.0);
//! assert_eq!(geometry.bubble.mid_x(), 120.0);
//! ```

use tiptour_core::geometry::{Point, Rect, Sides, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side of the target the bubble is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Side {
    /// Above the target; the arrow points down.
    Top,
    /// Below the target; the arrow points up.
    #[default]
    Bottom,
    /// Left of the target; the arrow points right.
    Left,
    /// Right of the target; the arrow points left.
    Right,
}

impl Side {
    /// All sides, in declaration order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// `true` for `Top` and `Bottom`, where the cross axis is horizontal.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    /// The side facing this one.
    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Sizing parameters for anchor layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorStyle {
    /// Arrow triangle size: `width` is the base, `height` the depth.
    pub arrow: Size,
    /// Minimum bubble width.
    pub min_width: f64,
    /// Maximum bubble width.
    pub max_width: f64,
    /// Gap to the target and inset from the container edges.
    pub padding: f64,
    /// How far the cutout extends beyond the target on every side.
    pub cutout_inset: f64,
    /// Corner radius shared by the bubble and the cutout.
    pub corner_radius: f64,
    /// When `false` the overlay dims everything and no cutout is produced.
    pub cutout_enabled: bool,
}

impl Default for AnchorStyle {
    fn default() -> Self {
        Self {
            arrow: Size::new(16.0, 8.0),
            min_width: 160.0,
            max_width: 200.0,
            padding: 8.0,
            cutout_inset: 4.0,
            corner_radius: 8.0,
            cutout_enabled: true,
        }
    }
}

impl AnchorStyle {
    /// Set the arrow size.
    #[must_use]
    pub fn arrow(mut self, arrow: Size) -> Self {
        self.arrow = arrow;
        self
    }

    /// Set the bubble width bounds.
    #[must_use]
    pub fn width_bounds(mut self, min_width: f64, max_width: f64) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    /// Set the padding.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the cutout inset.
    #[must_use]
    pub fn cutout_inset(mut self, inset: f64) -> Self {
        self.cutout_inset = inset;
        self
    }

    /// Set the corner radius.
    #[must_use]
    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Enable or disable the cutout.
    #[must_use]
    pub fn cutout_enabled(mut self, enabled: bool) -> Self {
        self.cutout_enabled = enabled;
        self
    }

    fn width_range(&self) -> (f64, f64) {
        let min = finite_or(self.min_width, 0.0).max(0.0);
        let max = finite_or(self.max_width, min).max(min);
        (min, max)
    }
}

/// Inputs for one placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRequest {
    /// Target bounds in the shared coordinate space.
    pub target: Rect,
    /// Preferred side.
    pub side: Side,
    /// Bounds the bubble must stay within.
    pub container: Rect,
    /// Measured bubble content size before width clamping.
    pub content: Size,
}

impl AnchorRequest {
    /// Create a request with zero content size (the bubble takes `min_width`).
    #[must_use]
    pub fn new(target: Rect, side: Side, container: Rect) -> Self {
        Self {
            target,
            side,
            container,
            content: Size::ZERO,
        }
    }

    /// Set the measured content size.
    #[must_use]
    pub fn content(mut self, content: Size) -> Self {
        self.content = content;
        self
    }
}

/// Transparent hole in the dimming overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutout {
    pub rect: Rect,
    pub corner_radius: f64,
}

/// Computed placement for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorGeometry {
    /// Side the bubble was placed on.
    pub side: Side,
    /// Bubble body, excluding the arrow.
    pub bubble: Rect,
    /// Distance from the bubble's leading edge (left for `Top`/`Bottom`, top
    /// for `Left`/`Right`) to the arrow's centre line.
    pub arrow_offset: f64,
    /// Bounding box of the arrow triangle, between bubble and target.
    pub arrow: Rect,
    /// Overlay cutout, `None` when cutouts are disabled.
    pub cutout: Option<Cutout>,
}

impl AnchorGeometry {
    /// Union of bubble and arrow.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.bubble.union(&self.arrow)
    }

    /// The arrow's apex, the point closest to the target.
    #[must_use]
    pub fn arrow_tip(&self) -> Point {
        let a = self.arrow;
        match self.side {
            Side::Top => Point::new(a.mid_x(), a.bottom()),
            Side::Bottom => Point::new(a.mid_x(), a.y),
            Side::Left => Point::new(a.right(), a.mid_y()),
            Side::Right => Point::new(a.x, a.mid_y()),
        }
    }
}

/// Compute bubble, arrow and cutout placement.
#[must_use]
pub fn compute_anchor(request: &AnchorRequest, style: &AnchorStyle) -> AnchorGeometry {
    let _span = tiptour_core::trace_span!("compute_anchor", side = ?request.side).entered();

    let target = request.target;
    let padding = finite_or(style.padding, 0.0).max(0.0);
    let arrow_base = finite_or(style.arrow.width, 0.0).max(0.0);
    let arrow_depth = finite_or(style.arrow.height, 0.0).max(0.0);
    let gap = padding + arrow_depth;
    let bounds = request.container.inner(Sides::all(padding));

    let (min_width, max_width) = style.width_range();
    let mut width = request.content.width.max(min_width).min(max_width);
    let height = finite_or(request.content.height, 0.0).max(0.0);

    if width > bounds.width {
        tiptour_core::trace!(
            width,
            available = bounds.width,
            "container narrower than bubble, shrinking"
        );
        width = bounds.width.max(0.0);
    }

    let bubble = match request.side {
        Side::Top | Side::Bottom => {
            let x = slide(target.mid_x() - width / 2.0, width, bounds.x, bounds.right());
            let preferred = if request.side == Side::Top {
                target.y - gap - height
            } else {
                target.bottom() + gap
            };
            let y = slide(preferred, height, bounds.y, bounds.bottom());
            Rect::new(x, y, width, height)
        }
        Side::Left | Side::Right => {
            let y = slide(target.mid_y() - height / 2.0, height, bounds.y, bounds.bottom());
            let preferred = if request.side == Side::Left {
                target.x - gap - width
            } else {
                target.right() + gap
            };
            let x = slide(preferred, width, bounds.x, bounds.right());
            Rect::new(x, y, width, height)
        }
    };

    let half = arrow_base / 2.0;
    let (edge_len, target_mid) = if request.side.is_vertical() {
        (bubble.width, target.mid_x() - bubble.x)
    } else {
        (bubble.height, target.mid_y() - bubble.y)
    };
    let arrow_offset = clamp_arrow(target_mid, half + padding, edge_len - half - padding, edge_len);

    let arrow = match request.side {
        Side::Top => Rect::new(
            bubble.x + arrow_offset - half,
            bubble.bottom(),
            arrow_base,
            arrow_depth,
        ),
        Side::Bottom => Rect::new(
            bubble.x + arrow_offset - half,
            bubble.y - arrow_depth,
            arrow_base,
            arrow_depth,
        ),
        Side::Left => Rect::new(
            bubble.right(),
            bubble.y + arrow_offset - half,
            arrow_depth,
            arrow_base,
        ),
        Side::Right => Rect::new(
            bubble.x - arrow_depth,
            bubble.y + arrow_offset - half,
            arrow_depth,
            arrow_base,
        ),
    };

    let cutout = style.cutout_enabled.then(|| {
        let inset = finite_or(style.cutout_inset, 0.0);
        Cutout {
            rect: target.outset(inset, inset),
            corner_radius: finite_or(style.corner_radius, 0.0).max(0.0),
        }
    });

    AnchorGeometry {
        side: request.side,
        bubble,
        arrow_offset,
        arrow,
        cutout,
    }
}

/// Slide a span of `len` starting at `start` into `[lo, hi]`.
///
/// Pins to `lo` when the span does not fit. NaN `start` resolves to `lo`.
fn slide(start: f64, len: f64, lo: f64, hi: f64) -> f64 {
    if len > hi - lo {
        tiptour_core::trace!(len, lo, hi, "span does not fit, pinning to leading edge");
        return lo;
    }
    start.max(lo).min(hi - len)
}

fn clamp_arrow(mid: f64, lo: f64, hi: f64, edge_len: f64) -> f64 {
    if lo <= hi {
        mid.max(lo).min(hi)
    } else {
        edge_len / 2.0
    }
}

#[inline]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
