#![forbid(unsafe_code)]

//! Deterministic tour simulator for testing.
//!
//! [`TourSimulator`] runs a [`TourController`] against a
//! [`RecordingPresenter`], which measures text with
//! [`MonospaceMetrics`] and keeps a copy of every step it was asked to draw.
//! Events are captured in order so tests can assert on the full lifecycle.
//!
//! # Example
//!
//! ```
//! use tiptour_core::geometry::Rect;
//! use tiptour_layout::anchor::Side;
//! use tiptour_runtime::simulator::TourSimulator;
//! use tiptour_runtime::target::{StaticResolver, TooltipItem};
//!
//! let resolver = StaticResolver::new(Rect::from_size(375.0, 800.0))
//!     .with_target("search", Rect::new(100.0, 50.0, 40.0, 20.0));
//! let mut sim = TourSimulator::new(resolver);
//! sim.controller_mut()
//!     .append(TooltipItem::new("search", "Find anything", Side::Bottom));
//!
//! sim.start();
//! assert_eq!(sim.visible().map(|s| s.index), Some(0));
//! sim.press_next();
//! assert_eq!(sim.event_names(), ["started", "shown", "dismissed", "completed"]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tiptour_core::color::Rgba;
use tiptour_core::geometry::{Rect, Size};
use tiptour_layout::anchor::{AnchorGeometry, Side};
use tiptour_layout::metrics::MonospaceMetrics;

use crate::controller::{TourController, TourEvent, TourPhase};
use crate::presenter::{
    BUTTON_SPACING, BUTTON_WIDTH, ButtonState, Interaction, Presenter, StepPresentation,
};
use crate::target::GeometryResolver;

/// Owned copy of a [`StepPresentation`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStep {
    pub index: usize,
    pub count: usize,
    pub message: String,
    pub side: Side,
    pub container: Rect,
    pub target: Rect,
    pub geometry: AnchorGeometry,
    pub overlay_color: Rgba,
    pub buttons: ButtonState,
    pub next_label: Option<String>,
    pub previous_label: Option<String>,
    pub tap_to_advance: bool,
    pub fade_in: Duration,
}

impl RenderedStep {
    fn capture(step: &StepPresentation<'_>) -> Self {
        Self {
            index: step.index,
            count: step.count,
            message: step.message().to_owned(),
            side: step.side(),
            container: step.container,
            target: step.target,
            geometry: step.geometry,
            overlay_color: step.overlay_color,
            buttons: step.buttons,
            next_label: step.next_label.map(str::to_owned),
            previous_label: step.previous_label.map(str::to_owned),
            tap_to_advance: step.tap_to_advance,
            fade_in: step.fade_in,
        }
    }
}

/// Handle issued by [`RecordingPresenter::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(u64);

/// Record of a presenter call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterRecord {
    /// Step `index` rendered under `handle`.
    Render { handle: RenderHandle, index: usize },
    /// `handle` torn down.
    Teardown { handle: RenderHandle },
}

/// Headless presenter that remembers what it drew.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    metrics: MonospaceMetrics,
    rendered: Vec<RenderedStep>,
    log: Vec<PresenterRecord>,
    visible: Option<(RenderHandle, usize)>,
    next_handle: u64,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom text metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MonospaceMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Every step rendered so far, in order.
    pub fn rendered(&self) -> &[RenderedStep] {
        &self.rendered
    }

    /// The step currently on screen.
    pub fn visible(&self) -> Option<&RenderedStep> {
        self.visible.and_then(|(_, slot)| self.rendered.get(slot))
    }

    /// Render and teardown calls in order.
    pub fn log(&self) -> &[PresenterRecord] {
        &self.log
    }
}

impl Presenter for RecordingPresenter {
    type Handle = RenderHandle;

    fn measure(&self, message: &str, buttons: ButtonState, max_width: f64) -> Size {
        let text = self.metrics.measure(message, max_width, buttons.footer_height());
        let button_count = usize::from(buttons.show_previous) + usize::from(buttons.show_next);
        let row = if button_count == 0 {
            0.0
        } else {
            button_count as f64 * BUTTON_WIDTH
                + (button_count - 1) as f64 * BUTTON_SPACING
                + self.metrics.insets.horizontal_sum()
        };
        Size::new(text.width.max(row), text.height)
    }

    fn render(&mut self, step: &StepPresentation<'_>) -> RenderHandle {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        self.rendered.push(RenderedStep::capture(step));
        self.visible = Some((handle, self.rendered.len() - 1));
        self.log.push(PresenterRecord::Render {
            handle,
            index: step.index,
        });
        handle
    }

    fn teardown(&mut self, handle: RenderHandle) {
        if self.visible.is_some_and(|(h, _)| h == handle) {
            self.visible = None;
        }
        self.log.push(PresenterRecord::Teardown { handle });
    }
}

/// Drives a [`TourController`] headlessly and records its events.
pub struct TourSimulator<R: GeometryResolver> {
    tour: TourController<R, RecordingPresenter>,
    events: Rc<RefCell<Vec<TourEvent>>>,
}

impl<R: GeometryResolver> TourSimulator<R> {
    /// Simulator with default appearance and a fresh [`RecordingPresenter`].
    pub fn new(resolver: R) -> Self {
        Self::from_controller(TourController::new(resolver, RecordingPresenter::new()))
    }

    /// Wrap a configured controller.
    pub fn from_controller(mut tour: TourController<R, RecordingPresenter>) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        tour.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Self { tour, events }
    }

    pub fn start(&mut self) {
        self.tour.start();
    }

    /// Press Next (or Complete).
    pub fn press_next(&mut self) {
        self.tour.handle(Interaction::Next);
    }

    /// Press Previous.
    pub fn press_previous(&mut self) {
        self.tour.handle(Interaction::Previous);
    }

    /// Tap the overlay.
    pub fn tap(&mut self) {
        self.tour.handle(Interaction::OverlayTap);
    }

    pub fn dismiss(&mut self) {
        self.tour.dismiss_current();
    }

    /// Press Next until the tour finishes or `max_presses` is reached.
    /// Returns the number of presses.
    pub fn run_to_completion(&mut self, max_presses: usize) -> usize {
        let mut presses = 0;
        while presses < max_presses && matches!(self.tour.phase(), TourPhase::Showing(_)) {
            self.press_next();
            presses += 1;
        }
        presses
    }

    /// All events so far.
    pub fn events(&self) -> Vec<TourEvent> {
        self.events.borrow().clone()
    }

    /// Event names so far, e.g. `["started", "shown", ...]`.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(TourEvent::name).collect()
    }

    /// Indices of `Shown` events, in order.
    pub fn shown_indices(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                TourEvent::Shown { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn is_completed(&self) -> bool {
        self.tour.phase() == TourPhase::Finished
    }

    pub fn visible(&self) -> Option<&RenderedStep> {
        self.tour.presenter().visible()
    }

    pub fn presenter(&self) -> &RecordingPresenter {
        self.tour.presenter()
    }

    pub fn controller(&self) -> &TourController<R, RecordingPresenter> {
        &self.tour
    }

    pub fn controller_mut(&mut self) -> &mut TourController<R, RecordingPresenter> {
        &mut self.tour
    }

    /// Unwrap the controller. Event recording stops being observable.
    pub fn into_controller(self) -> TourController<R, RecordingPresenter> {
        self.tour
    }
}
