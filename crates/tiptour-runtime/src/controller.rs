#![forbid(unsafe_code)]

//! Tour sequencing.
//!
//! [`TourController`] walks an ordered list of [`TooltipItem`]s one at a
//! time. For each step it resolves the target, measures the message, computes
//! placement, and asks the [`Presenter`] to draw. Steps whose target (or root
//! container) cannot be resolved are skipped silently.
//!
//! # State machine
//!
//! ```text
//!            start()                advance()/tap at last step
//!   Idle ───────────────► Showing(i) ─────────────────────────► Finished
//!     │                    │  ▲  │
//!     │  empty or already  │  │  └── advance()/retreat()/tap: Showing(j)
//!     │  completed         │  │
//!     └────────────────────┼──┼────────────────────────────────► Finished
//!                          │  │
//!           dismiss_current() keeps Showing(i) but nothing is presented
//! ```
//!
//! `Finished` is terminal: a controller runs a tour at most once.
//!
//! # Invariants
//!
//! 1. `current_index <= len` at all times.
//! 2. At most one step is presented; the previous step is torn down before
//!    the next one is rendered.
//! 3. `Dismissed` is only emitted for a step that emitted `Shown`.
//! 4. `Completed` is emitted exactly once per controller.
//!
//! # Example
//!
//! ```ignore
//! let mut tour = TourController::new(resolver, presenter).with_key("onboarding");
//! tour.append(TooltipItem::new("profile", "Your profile lives here", Side::Bottom));
//! tour.subscribe(|event| println!("{event:?}"));
//! tour.start();
//! // later, from the presenter's button callback:
//! tour.handle(Interaction::Next);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span, info, warn};

use tiptour_core::geometry::Rect;
use tiptour_layout::anchor::{AnchorRequest, compute_anchor};

use crate::appearance::AppearanceConfig;
use crate::completion::{CompletionStore, StoreResult};
use crate::presenter::{ButtonState, Interaction, Presenter, StepPresentation};
use crate::target::{GeometryResolver, ResolveError, TooltipItem};

/// Lifecycle notifications.
#[derive(Debug, Clone)]
pub enum TourEvent {
    /// The tour began; emitted before the first `Shown`.
    Started,
    /// Step `index` is on screen.
    Shown { index: usize, item: TooltipItem },
    /// Step `index` was removed from screen.
    Dismissed { index: usize, item: TooltipItem },
    /// The tour is over (all steps passed, empty, or completed previously).
    Completed,
}

impl TourEvent {
    /// Short name for logs and assertions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TourEvent::Started => "started",
            TourEvent::Shown { .. } => "shown",
            TourEvent::Dismissed { .. } => "dismissed",
            TourEvent::Completed => "completed",
        }
    }

    /// Step index for `Shown` and `Dismissed`.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            TourEvent::Shown { index, .. } | TourEvent::Dismissed { index, .. } => Some(*index),
            TourEvent::Started | TourEvent::Completed => None,
        }
    }
}

/// Coarse tour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourPhase {
    /// Not started.
    #[default]
    Idle,
    /// Running; the value is the current step index.
    Showing(usize),
    /// Done. Terminal.
    Finished,
}

/// Registration token returned by [`TourController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TourEvent)>;

struct Presented<H> {
    index: usize,
    handle: H,
}

/// Sequential tooltip tour driver.
///
/// Generic over the host's [`GeometryResolver`] and [`Presenter`]. The
/// controller owns both; reach them through [`resolver_mut`] and
/// [`presenter_mut`] when the host needs to update layout or inspect what
/// was drawn.
///
/// [`resolver_mut`]: TourController::resolver_mut
/// [`presenter_mut`]: TourController::presenter_mut
pub struct TourController<R: GeometryResolver, P: Presenter> {
    resolver: R,
    presenter: P,
    appearance: AppearanceConfig,
    key: Option<String>,
    store: Option<Arc<dyn CompletionStore>>,
    items: Vec<TooltipItem>,
    current_index: usize,
    active: bool,
    phase: TourPhase,
    presented: Option<Presented<P::Handle>>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl<R: GeometryResolver, P: Presenter> TourController<R, P> {
    /// Create an idle controller with default appearance and no persistence.
    pub fn new(resolver: R, presenter: P) -> Self {
        Self {
            resolver,
            presenter,
            appearance: AppearanceConfig::default(),
            key: None,
            store: None,
            items: Vec::new(),
            current_index: 0,
            active: false,
            phase: TourPhase::Idle,
            presented: None,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Set the appearance used for every step.
    #[must_use]
    pub fn with_appearance(mut self, appearance: AppearanceConfig) -> Self {
        self.appearance = appearance;
        self
    }

    /// Set the persistence key. Only effective together with a store.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the completion store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CompletionStore>) -> Self {
        self.store = Some(store);
        self
    }

    // ── Sequence ──────────────────────────────────────────────────────

    /// Append one step.
    pub fn append(&mut self, item: TooltipItem) {
        self.items.push(item);
    }

    /// Append several steps in order.
    pub fn append_all(&mut self, items: impl IntoIterator<Item = TooltipItem>) {
        self.items.extend(items);
    }

    // ── Listeners ─────────────────────────────────────────────────────

    /// Register an event listener. Listeners run in registration order.
    pub fn subscribe(&mut self, listener: impl FnMut(&TourEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: TourEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────

    /// Begin the tour.
    ///
    /// Emits only `Completed` if the sequence is empty or the store reports
    /// the key as completed. Ignored unless the controller is idle.
    pub fn start(&mut self) {
        if self.phase != TourPhase::Idle {
            debug!(phase = ?self.phase, "start ignored, tour already started");
            return;
        }

        if self.items.is_empty() {
            info!("tour has no steps, completing immediately");
            self.phase = TourPhase::Finished;
            self.emit(TourEvent::Completed);
            return;
        }

        if self.previously_completed() {
            info!(key = ?self.key, "tour already completed, not showing");
            self.phase = TourPhase::Finished;
            self.emit(TourEvent::Completed);
            return;
        }

        info!(steps = self.items.len(), key = ?self.key, "tour started");
        self.current_index = 0;
        self.active = true;
        self.phase = TourPhase::Showing(0);
        self.emit(TourEvent::Started);
        self.show_step();
    }

    /// Remove the presented step, if any.
    ///
    /// Listeners see `Dismissed` while the step is still on screen; the
    /// presenter tears it down afterwards. Idempotent. The tour stays on the current index; [`advance`] or
    /// [`retreat`] continue from there.
    ///
    /// [`advance`]: TourController::advance
    /// [`retreat`]: TourController::retreat
    pub fn dismiss_current(&mut self) {
        let Some(Presented { index, handle }) = self.presented.take() else {
            return;
        };
        debug!(index, "step dismissed");
        if let Some(item) = self.items.get(index).cloned() {
            self.emit(TourEvent::Dismissed { index, item });
        }
        self.presenter.teardown(handle);
    }

    /// Move to the next step, or finish after the last one.
    pub fn advance(&mut self) {
        if !self.is_showing() {
            debug!(phase = ?self.phase, "advance ignored");
            return;
        }
        self.dismiss_current();
        self.current_index += 1;
        self.show_step();
    }

    /// Move to the previous step. At the first step, re-shows it.
    pub fn retreat(&mut self) {
        if !self.is_showing() {
            debug!(phase = ?self.phase, "retreat ignored");
            return;
        }
        self.dismiss_current();
        self.current_index = self.current_index.saturating_sub(1);
        self.show_step();
    }

    /// Apply user input from the presenter.
    pub fn handle(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::Next => self.advance(),
            Interaction::Previous => self.retreat(),
            Interaction::OverlayTap => {
                if self.appearance.tap_to_dismiss {
                    self.advance();
                } else {
                    debug!("overlay tap ignored, tap-to-dismiss disabled");
                }
            }
        }
    }

    /// Clear the stored completion flag for this tour's key.
    ///
    /// A finished controller does not restart; build a new one to run the
    /// tour again.
    pub fn reset_completion(&self) -> StoreResult<()> {
        match (&self.key, &self.store) {
            (Some(key), Some(store)) => store.reset(key),
            _ => Ok(()),
        }
    }

    /// Show `current_index`, skipping forward over unresolvable steps.
    fn show_step(&mut self) {
        loop {
            let index = self.current_index;
            if index >= self.items.len() {
                self.finish();
                return;
            }
            self.phase = TourPhase::Showing(index);

            let _span = debug_span!("tiptour.step", index).entered();
            match self.present(index) {
                Ok(()) => {
                    let item = self.items[index].clone();
                    debug!("step shown");
                    self.emit(TourEvent::Shown { index, item });
                    return;
                }
                Err(error) => {
                    debug!(%error, "skipping step");
                    self.current_index += 1;
                }
            }
        }
    }

    /// Resolve, lay out, and render step `index`.
    fn present(&mut self, index: usize) -> Result<(), ResolveError> {
        let item = &self.items[index];
        let container = finite(self.resolver.root_bounds()?, "root container")?;
        let target = finite(self.resolver.resolve(item.target())?, "target")?;

        let count = self.items.len();
        let appearance = &self.appearance;
        let buttons = ButtonState::for_step(appearance.button_mode, index, count);
        let style = appearance.anchor_style();
        let available = container.width - 2.0 * style.padding;
        let content = self
            .presenter
            .measure(item.message(), buttons, appearance.max_width.min(available).max(0.0));
        let request = AnchorRequest::new(target, item.side(), container).content(content);
        let geometry = compute_anchor(&request, &style);

        let step = StepPresentation {
            index,
            count,
            item,
            container,
            target,
            geometry,
            overlay_color: appearance.effective_overlay_color(),
            buttons,
            next_label: buttons.next_label(&appearance.labels),
            previous_label: buttons.previous_label(&appearance.labels),
            tap_to_advance: appearance.tap_to_dismiss,
            fade_in: appearance.fade_in,
            appearance,
        };
        let handle = self.presenter.render(&step);
        self.presented = Some(Presented { index, handle });
        Ok(())
    }

    fn finish(&mut self) {
        self.dismiss_current();
        self.current_index = self.items.len();
        self.active = false;
        self.phase = TourPhase::Finished;

        if let (Some(key), Some(store)) = (&self.key, &self.store) {
            if let Err(error) = store.mark_completed(key) {
                warn!(key = %key, store = store.name(), %error, "failed to record tour completion");
            }
        }

        info!(steps = self.items.len(), "tour completed");
        self.emit(TourEvent::Completed);
    }

    fn previously_completed(&self) -> bool {
        let (Some(key), Some(store)) = (&self.key, &self.store) else {
            return false;
        };
        match store.is_completed(key) {
            Ok(done) => done,
            Err(error) => {
                warn!(key = %key, store = store.name(), %error, "failed to read completion flag, assuming not completed");
                false
            }
        }
    }

    fn is_showing(&self) -> bool {
        matches!(self.phase, TourPhase::Showing(_))
    }

    // ── Accessors ─────────────────────────────────────────────────────

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    /// `true` between a successful `start()` and the end of the sequence.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The item at `current_index`, if any.
    pub fn current_item(&self) -> Option<&TooltipItem> {
        self.items.get(self.current_index)
    }

    /// `true` while a step is on screen.
    pub fn is_presenting(&self) -> bool {
        self.presented.is_some()
    }

    pub fn items(&self) -> &[TooltipItem] {
        &self.items
    }

    pub fn appearance(&self) -> &AppearanceConfig {
        &self.appearance
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

impl<R: GeometryResolver, P: Presenter> Drop for TourController<R, P> {
    fn drop(&mut self) {
        if let Some(Presented { handle, .. }) = self.presented.take() {
            self.presenter.teardown(handle);
        }
    }
}

impl<R: GeometryResolver, P: Presenter> fmt::Debug for TourController<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourController")
            .field("steps", &self.items.len())
            .field("current_index", &self.current_index)
            .field("active", &self.active)
            .field("phase", &self.phase)
            .field("presenting", &self.presented.as_ref().map(|p| p.index))
            .field("key", &self.key)
            .field("store", &self.store.as_ref().map(|s| s.name()))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn finite(rect: Rect, what: &str) -> Result<Rect, ResolveError> {
    if rect.is_finite() {
        Ok(rect)
    } else {
        Err(ResolveError::Unresolvable(format!("{what} bounds are not finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::MemoryCompletionStore;
    use crate::target::{StaticResolver, TargetRef};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tiptour_core::geometry::Size;
    use tiptour_layout::anchor::Side;

    /// Presenter that records render/teardown pairs.
    #[derive(Default)]
    struct CountingPresenter {
        rendered: Vec<usize>,
        torn_down: Vec<usize>,
        live: usize,
    }

    impl Presenter for CountingPresenter {
        type Handle = usize;

        fn measure(&self, _message: &str, buttons: ButtonState, _max_width: f64) -> Size {
            Size::new(100.0, 40.0 + buttons.footer_height())
        }

        fn render(&mut self, step: &StepPresentation<'_>) -> usize {
            assert_eq!(self.live, 0, "previous step not torn down");
            self.live += 1;
            self.rendered.push(step.index);
            step.index
        }

        fn teardown(&mut self, handle: usize) {
            self.live -= 1;
            self.torn_down.push(handle);
        }
    }

    const ROOT: Rect = Rect::from_size(375.0, 800.0);

    fn resolver(handles: &[&str]) -> StaticResolver {
        handles.iter().enumerate().fold(StaticResolver::new(ROOT), |r, (i, h)| {
            r.with_target(*h, Rect::new(20.0 + 40.0 * i as f64, 100.0, 30.0, 30.0))
        })
    }

    fn item(handle: &str) -> TooltipItem {
        TooltipItem::new(handle, format!("about {handle}"), Side::Bottom)
    }

    fn recorder<R: GeometryResolver, P: Presenter>(
        tour: &mut TourController<R, P>,
    ) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        tour.subscribe(move |event| {
            let entry = match event.index() {
                Some(i) => format!("{}({i})", event.name()),
                None => event.name().to_string(),
            };
            sink.borrow_mut().push(entry);
        });
        log
    }

    #[test]
    fn new_controller_is_idle() {
        let tour = TourController::new(resolver(&[]), CountingPresenter::default());
        assert_eq!(tour.phase(), TourPhase::Idle);
        assert_eq!(tour.current_index(), 0);
        assert!(!tour.is_active());
        assert!(!tour.is_presenting());
        assert!(tour.current_item().is_none());
    }

    #[test]
    fn full_walk_emits_in_order() {
        let mut tour = TourController::new(resolver(&["a", "b", "c"]), CountingPresenter::default());
        tour.append_all([item("a"), item("b"), item("c")]);
        let log = recorder(&mut tour);

        tour.start();
        assert!(tour.is_active());
        assert_eq!(tour.phase(), TourPhase::Showing(0));
        tour.advance();
        tour.advance();
        tour.advance();

        assert_eq!(
            *log.borrow(),
            [
                "started",
                "shown(0)",
                "dismissed(0)",
                "shown(1)",
                "dismissed(1)",
                "shown(2)",
                "dismissed(2)",
                "completed"
            ]
        );
        assert_eq!(tour.phase(), TourPhase::Finished);
        assert_eq!(tour.current_index(), 3);
        assert!(!tour.is_active());
        assert!(!tour.is_presenting());
    }

    #[test]
    fn empty_sequence_only_completes() {
        let mut tour = TourController::new(resolver(&[]), CountingPresenter::default());
        let log = recorder(&mut tour);
        tour.start();
        assert_eq!(*log.borrow(), ["completed"]);
        assert_eq!(tour.phase(), TourPhase::Finished);
        assert!(!tour.is_active());
    }

    #[test]
    fn previously_completed_key_only_completes() {
        let store = Arc::new(MemoryCompletionStore::with_completed(["intro"]));
        let mut tour = TourController::new(resolver(&["a"]), CountingPresenter::default())
            .with_key("intro")
            .with_store(store);
        tour.append(item("a"));
        let log = recorder(&mut tour);
        tour.start();
        assert_eq!(*log.borrow(), ["completed"]);
        assert!(tour.presenter().rendered.is_empty());
    }

    #[test]
    fn finishing_marks_store() {
        let store = Arc::new(MemoryCompletionStore::new());
        let mut tour = TourController::new(resolver(&["a"]), CountingPresenter::default())
            .with_key("intro")
            .with_store(store.clone());
        tour.append(item("a"));
        tour.start();
        assert!(!store.is_completed("intro").unwrap());
        tour.advance();
        assert!(store.is_completed("intro").unwrap());

        tour.reset_completion().unwrap();
        assert!(!store.is_completed("intro").unwrap());
    }

    #[test]
    fn retreat_at_first_step_reshows_it() {
        let mut tour = TourController::new(resolver(&["a", "b"]), CountingPresenter::default());
        tour.append_all([item("a"), item("b")]);
        let log = recorder(&mut tour);
        tour.start();
        tour.retreat();
        assert_eq!(*log.borrow(), ["started", "shown(0)", "dismissed(0)", "shown(0)"]);
        assert_eq!(tour.current_index(), 0);
    }

    #[test]
    fn retreat_goes_back_one() {
        let mut tour = TourController::new(resolver(&["a", "b", "c"]), CountingPresenter::default());
        tour.append_all([item("a"), item("b"), item("c")]);
        tour.start();
        tour.advance();
        tour.advance();
        tour.retreat();
        assert_eq!(tour.phase(), TourPhase::Showing(1));
        assert_eq!(tour.presenter().rendered, [0, 1, 2, 1]);
    }

    #[test]
    fn unresolvable_step_is_skipped_silently() {
        let mut tour = TourController::new(resolver(&["a", "c"]), CountingPresenter::default());
        tour.append_all([item("a"), item("missing"), item("c")]);
        let log = recorder(&mut tour);
        tour.start();
        tour.advance();
        assert_eq!(
            *log.borrow(),
            ["started", "shown(0)", "dismissed(0)", "shown(2)"]
        );
        assert_eq!(tour.current_index(), 2);
    }

    #[test]
    fn all_unresolvable_completes_after_started() {
        let mut tour = TourController::new(resolver(&[]), CountingPresenter::default());
        tour.append_all([item("x"), item("y")]);
        let log = recorder(&mut tour);
        tour.start();
        assert_eq!(*log.borrow(), ["started", "completed"]);
        assert_eq!(tour.current_index(), 2);
    }

    #[test]
    fn missing_root_skips_everything() {
        let mut tour = TourController::new(StaticResolver::without_root(), CountingPresenter::default());
        tour.append(TooltipItem::new(
            TargetRef::lookup(|| Some(Rect::new(0.0, 0.0, 10.0, 10.0))),
            "hi",
            Side::Top,
        ));
        let log = recorder(&mut tour);
        tour.start();
        assert_eq!(*log.borrow(), ["started", "completed"]);
    }

    #[test]
    fn non_finite_target_is_skipped() {
        let mut tour = TourController::new(StaticResolver::new(ROOT), CountingPresenter::default());
        tour.append(TooltipItem::new(
            TargetRef::lookup(|| Some(Rect::new(f64::NAN, 0.0, 10.0, 10.0))),
            "hi",
            Side::Top,
        ));
        tour.start();
        assert_eq!(tour.phase(), TourPhase::Finished);
        assert!(tour.presenter().rendered.is_empty());
    }

    #[test]
    fn dismiss_current_is_idempotent() {
        let mut tour = TourController::new(resolver(&["a", "b"]), CountingPresenter::default());
        tour.append_all([item("a"), item("b")]);
        let log = recorder(&mut tour);
        tour.start();
        tour.dismiss_current();
        tour.dismiss_current();
        assert_eq!(*log.borrow(), ["started", "shown(0)", "dismissed(0)"]);
        assert!(!tour.is_presenting());
        assert_eq!(tour.presenter().torn_down, [0]);

        // Advancing afterwards continues without a second dismissal.
        tour.advance();
        assert_eq!(log.borrow().last().map(String::as_str), Some("shown(1)"));
    }

    /// Presenter that writes into a journal shared with a listener.
    struct JournalPresenter {
        journal: Rc<RefCell<Vec<String>>>,
        measured_widths: RefCell<Vec<f64>>,
    }

    impl Presenter for JournalPresenter {
        type Handle = usize;

        fn measure(&self, _message: &str, _buttons: ButtonState, max_width: f64) -> Size {
            self.measured_widths.borrow_mut().push(max_width);
            Size::new(max_width.min(100.0), 40.0)
        }

        fn render(&mut self, step: &StepPresentation<'_>) -> usize {
            self.journal.borrow_mut().push(format!("render({})", step.index));
            step.index
        }

        fn teardown(&mut self, handle: usize) {
            self.journal.borrow_mut().push(format!("teardown({handle})"));
        }
    }

    fn journaled_tour(
        handles: &[&str],
    ) -> (TourController<StaticResolver, JournalPresenter>, Rc<RefCell<Vec<String>>>) {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let presenter = JournalPresenter {
            journal: Rc::clone(&journal),
            measured_widths: RefCell::new(Vec::new()),
        };
        let mut tour = TourController::new(resolver(handles), presenter);
        tour.append_all(handles.iter().map(|h| item(h)));
        let sink = Rc::clone(&journal);
        tour.subscribe(move |event| {
            let entry = match event.index() {
                Some(i) => format!("{}({i})", event.name()),
                None => event.name().to_string(),
            };
            sink.borrow_mut().push(entry);
        });
        (tour, journal)
    }

    #[test]
    fn dismissed_is_emitted_before_teardown() {
        let (mut tour, journal) = journaled_tour(&["a", "b"]);
        tour.start();
        tour.advance();
        tour.dismiss_current();
        assert_eq!(
            *journal.borrow(),
            [
                "started",
                "render(0)",
                "shown(0)",
                "dismissed(0)",
                "teardown(0)",
                "render(1)",
                "shown(1)",
                "dismissed(1)",
                "teardown(1)",
            ]
        );
    }

    #[test]
    fn finishing_dismisses_before_teardown_and_completes_last() {
        let (mut tour, journal) = journaled_tour(&["a"]);
        tour.start();
        tour.advance();
        let log = journal.borrow();
        assert_eq!(log[log.len() - 3..], ["dismissed(0)", "teardown(0)", "completed"]);
    }

    #[test]
    fn measure_width_limited_by_narrow_container() {
        let presenter = JournalPresenter {
            journal: Rc::new(RefCell::new(Vec::new())),
            measured_widths: RefCell::new(Vec::new()),
        };
        let resolver = StaticResolver::new(Rect::from_size(120.0, 400.0))
            .with_target("a", Rect::new(40.0, 40.0, 20.0, 20.0));
        let mut tour = TourController::new(resolver, presenter);
        tour.append(item("a"));
        tour.start();
        assert_eq!(*tour.presenter().measured_widths.borrow(), [120.0 - 16.0]);

        let (mut wide, _journal) = journaled_tour(&["a"]);
        wide.start();
        assert_eq!(*wide.presenter().measured_widths.borrow(), [200.0]);
    }

    #[test]
    fn navigation_ignored_outside_showing() {
        let mut tour = TourController::new(resolver(&["a"]), CountingPresenter::default());
        tour.append(item("a"));
        let log = recorder(&mut tour);
        tour.advance();
        tour.retreat();
        assert!(log.borrow().is_empty());

        tour.start();
        tour.advance();
        tour.advance();
        tour.retreat();
        tour.start();
        assert_eq!(*log.borrow(), ["started", "shown(0)", "dismissed(0)", "completed"]);
    }

    #[test]
    fn overlay_tap_respects_setting() {
        let mut tour = TourController::new(resolver(&["a", "b"]), CountingPresenter::default());
        tour.append_all([item("a"), item("b")]);
        tour.start();
        tour.handle(Interaction::OverlayTap);
        assert_eq!(tour.current_index(), 0);

        let mut tour = TourController::new(resolver(&["a", "b"]), CountingPresenter::default())
            .with_appearance(AppearanceConfig::new().tap_to_dismiss(true));
        tour.append_all([item("a"), item("b")]);
        tour.start();
        tour.handle(Interaction::OverlayTap);
        assert_eq!(tour.current_index(), 1);
        tour.handle(Interaction::Previous);
        assert_eq!(tour.current_index(), 0);
        tour.handle(Interaction::Next);
        tour.handle(Interaction::Next);
        assert_eq!(tour.phase(), TourPhase::Finished);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut tour = TourController::new(resolver(&["a", "b"]), CountingPresenter::default());
        tour.append_all([item("a"), item("b")]);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = tour.subscribe(move |_| *sink.borrow_mut() += 1);
        tour.start();
        assert_eq!(*count.borrow(), 2);
        assert!(tour.unsubscribe(id));
        assert!(!tour.unsubscribe(id));
        tour.advance();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn items_appended_mid_tour_are_reached() {
        let mut tour = TourController::new(resolver(&["a", "b"]), CountingPresenter::default());
        tour.append(item("a"));
        tour.start();
        tour.append(item("b"));
        tour.advance();
        assert_eq!(tour.phase(), TourPhase::Showing(1));
    }

    #[test]
    fn drop_tears_down_presented_step() {
        let torn = Rc::new(RefCell::new(false));

        struct FlagPresenter(Rc<RefCell<bool>>);
        impl Presenter for FlagPresenter {
            type Handle = ();
            fn measure(&self, _: &str, _: ButtonState, _: f64) -> Size {
                Size::new(10.0, 10.0)
            }
            fn render(&mut self, _: &StepPresentation<'_>) {}
            fn teardown(&mut self, _: ()) {
                *self.0.borrow_mut() = true;
            }
        }

        {
            let mut tour = TourController::new(resolver(&["a"]), FlagPresenter(Rc::clone(&torn)));
            tour.append(item("a"));
            tour.start();
        }
        assert!(*torn.borrow());
    }

    #[test]
    fn debug_summarises_state() {
        let mut tour = TourController::new(resolver(&["a"]), CountingPresenter::default());
        tour.append(item("a"));
        tour.start();
        let text = format!("{tour:?}");
        assert!(text.contains("steps: 1"));
        assert!(text.contains("Showing(0)"));
    }
}
