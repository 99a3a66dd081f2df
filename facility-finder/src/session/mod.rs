//! Search-as-you-type session.
//!
//! Turns a stream of text edits into at most one rendered geocode result
//! list per quiet period, and keeps late answers from overwriting newer ones.
//!
//! # State Machine
//!
//! ```text
//! Idle --[text >= min chars]--> Debouncing
//! Debouncing --[text changed]--> Debouncing (timer re-armed)
//! Debouncing --[quiet period elapsed]--> Querying
//! Querying --[current-generation answer]--> Showing
//! any --[text < min chars | select | outside interaction]--> Idle
//! Idle --[focus with retained results]--> Showing
//! ```
//!
//! # Generations
//!
//! Every query captures a generation ticket. Clearing the text, selecting a
//! candidate and starting a newer query all bump the generation. Network
//! requests are never aborted; an answer whose ticket is no longer current
//! is dropped when it arrives.
//!
//! # Events
//!
//! Rendering happens elsewhere: the session reports what should be on
//! screen through [`SessionEvent`]s on an unbounded channel.

mod config;

pub use config::SessionConfig;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::geo::Coordinate;
use crate::geocode::{CandidateSource, GeocodeCandidate};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing pending, no list shown
    Idle,
    /// Waiting for typing to pause
    Debouncing,
    /// A query is in flight
    Querying,
    /// The latest answer has been delivered
    Showing,
}

/// Instructions for the view.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Display these candidates (possibly none)
    Show(Vec<GeocodeCandidate>),
    /// Hide the result list
    Hide,
    /// Move the map to this candidate
    Recenter(GeocodeCandidate),
}

/// Plain-data view of the session, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub text: String,
    pub results: Vec<GeocodeCandidate>,
    pub highlighted: Option<usize>,
    pub list_visible: bool,
    pub center: Coordinate,
}

struct Inner {
    state: SessionState,
    text: String,
    results: Vec<GeocodeCandidate>,
    highlighted: Option<usize>,
    /// Last `Show`/`Hide` sent to the view; typing alone does not change it
    visible: bool,
    center: Coordinate,
    generation: u64,
    /// Identifies the armed timer; a timer that wakes with a stale id does nothing
    timer_id: u64,
    timer: Option<JoinHandle<()>>,
}

impl Inner {
    fn cancel_timer(&mut self) {
        self.timer_id += 1;
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }

    fn list_visible(&self) -> bool {
        self.visible && !self.results.is_empty()
    }
}

struct Shared<S> {
    source: S,
    config: SessionConfig,
    inner: Mutex<Inner>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<S: CandidateSource> Shared<S> {
    fn emit(&self, event: SessionEvent) {
        // A dropped receiver just means nobody is rendering.
        let _ = self.events.send(event);
    }

    /// Debounce timer expiry: start the query for the current text.
    fn fire(self: &Arc<Self>, timer_id: u64) {
        let (text, ticket) = {
            let mut inner = self.inner.lock();
            if inner.timer_id != timer_id {
                return;
            }
            inner.timer = None;
            inner.generation += 1;
            inner.state = SessionState::Querying;
            (inner.text.trim().to_string(), inner.generation)
        };

        debug!(query = %text, generation = ticket, "Debounced query started");
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let results = shared.source.resolve_and_rank(&text).await;
            shared.deliver(ticket, results);
        });
    }

    fn deliver(&self, ticket: u64, mut results: Vec<GeocodeCandidate>) {
        let mut inner = self.inner.lock();
        if ticket != inner.generation {
            debug!(
                generation = ticket,
                current = inner.generation,
                "Discarding stale geocode results"
            );
            return;
        }

        results.truncate(self.config.max_results);
        inner.results = results.clone();
        inner.highlighted = None;
        inner.visible = true;
        inner.state = SessionState::Showing;
        drop(inner);

        self.emit(SessionEvent::Show(results));
    }

    fn select(&self, candidate: GeocodeCandidate) {
        {
            let mut inner = self.inner.lock();
            inner.cancel_timer();
            inner.generation += 1;
            inner.center = candidate.coordinate;
            inner.text = candidate.display_name.clone();
            inner.highlighted = None;
            inner.visible = false;
            inner.state = SessionState::Idle;
        }
        debug!(place = %candidate.display_name, "Candidate selected");
        self.emit(SessionEvent::Hide);
        self.emit(SessionEvent::Recenter(candidate));
    }
}

/// A debounced place-search session over a [`CandidateSource`].
///
/// Cheap to clone; clones share the same session. Methods that arm timers
/// must be called from within a Tokio runtime.
pub struct SearchSession<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for SearchSession<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: CandidateSource> SearchSession<S> {
    /// Create a session centered on `center`, returning the event stream.
    pub fn new(
        source: S,
        config: SessionConfig,
        center: Coordinate,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Shared {
            source,
            config,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                text: String::new(),
                results: Vec::new(),
                highlighted: None,
                visible: false,
                center,
                generation: 0,
                timer_id: 0,
                timer: None,
            }),
            events: tx,
        };
        (
            Self {
                shared: Arc::new(shared),
            },
            rx,
        )
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    /// The search box content changed.
    pub fn on_text_changed(&self, text: &str) {
        let min_chars = self.shared.config.min_query_chars;
        let mut inner = self.shared.inner.lock();
        inner.cancel_timer();
        inner.text = text.to_string();

        if text.trim().chars().count() < min_chars {
            inner.results.clear();
            inner.highlighted = None;
            inner.visible = false;
            inner.generation += 1;
            inner.state = SessionState::Idle;
            drop(inner);
            self.shared.emit(SessionEvent::Hide);
            return;
        }

        let timer_id = inner.timer_id;
        let shared = Arc::clone(&self.shared);
        let debounce = self.shared.config.debounce;
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            shared.fire(timer_id);
        }));
        inner.state = SessionState::Debouncing;
    }

    /// The user picked `candidate`.
    pub fn on_select(&self, candidate: GeocodeCandidate) {
        self.shared.select(candidate);
    }

    /// Select the shown result at `index`, if there is one.
    pub fn select_index(&self, index: usize) -> Option<GeocodeCandidate> {
        let candidate = {
            let inner = self.shared.inner.lock();
            if !inner.list_visible() {
                return None;
            }
            inner.results.get(index).cloned()
        }?;
        self.shared.select(candidate.clone());
        Some(candidate)
    }

    /// Enter pressed.
    ///
    /// With a visible list, selects the highlighted result (or the first).
    /// Otherwise resolves the current text immediately and selects the top
    /// candidate. Returns the selection, if any.
    pub async fn on_commit(&self) -> Option<GeocodeCandidate> {
        let text = {
            let mut inner = self.shared.inner.lock();
            if inner.list_visible() {
                let index = inner.highlighted.unwrap_or(0);
                let chosen = inner.results.get(index).or(inner.results.first()).cloned();
                drop(inner);
                if let Some(candidate) = &chosen {
                    self.shared.select(candidate.clone());
                }
                return chosen;
            }

            let text = inner.text.trim().to_string();
            if text.is_empty() {
                return None;
            }
            inner.cancel_timer();
            text
        };

        debug!(query = %text, "Immediate query on commit");
        let top = self
            .shared
            .source
            .resolve_and_rank(&text)
            .await
            .into_iter()
            .next()?;
        self.shared.select(top.clone());
        Some(top)
    }

    /// A click or tap landed outside the search box. Text and results stay.
    pub fn on_outside_interaction(&self) {
        let was_visible = {
            let mut inner = self.shared.inner.lock();
            let was_visible = inner.list_visible();
            inner.visible = false;
            if inner.state == SessionState::Showing {
                inner.state = SessionState::Idle;
            }
            was_visible
        };
        if was_visible {
            self.shared.emit(SessionEvent::Hide);
        }
    }

    /// Escape pressed; same as an outside interaction.
    pub fn on_escape(&self) {
        self.on_outside_interaction();
    }

    /// The search box regained focus: re-show retained results.
    pub fn on_focus(&self) {
        let results = {
            let mut inner = self.shared.inner.lock();
            if inner.visible || inner.results.is_empty() {
                return;
            }
            inner.visible = true;
            if inner.state == SessionState::Idle {
                inner.state = SessionState::Showing;
            }
            inner.results.clone()
        };
        self.shared.emit(SessionEvent::Show(results));
    }

    /// Move the highlight down, stopping at the last result.
    pub fn highlight_next(&self) -> Option<usize> {
        let mut inner = self.shared.inner.lock();
        if !inner.list_visible() {
            return None;
        }
        let last = inner.results.len() - 1;
        let next = inner.highlighted.map_or(0, |i| (i + 1).min(last));
        inner.highlighted = Some(next);
        Some(next)
    }

    /// Move the highlight up, stopping at the first result.
    pub fn highlight_previous(&self) -> Option<usize> {
        let mut inner = self.shared.inner.lock();
        if !inner.list_visible() {
            return None;
        }
        let previous = inner.highlighted.map_or(0, |i| i.saturating_sub(1));
        inner.highlighted = Some(previous);
        Some(previous)
    }

    pub fn state(&self) -> SessionState {
        self.shared.inner.lock().state
    }

    /// Current map center.
    pub fn center(&self) -> Coordinate {
        self.shared.inner.lock().center
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.shared.inner.lock();
        SessionSnapshot {
            state: inner.state,
            text: inner.text.clone(),
            results: inner.results.clone(),
            highlighted: inner.highlighted,
            list_visible: inner.list_visible(),
            center: inner.center,
        }
    }
}
