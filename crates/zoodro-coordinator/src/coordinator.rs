//! The vendor fetch coordinator actor and its handle.
//!
//! [`Coordinator::spawn`] starts one task that owns the [`FetchTracker`].
//! View changes, immediate fetch requests and fetch completions all arrive
//! at that task over channels and are handled one at a time, so the token
//! comparison always runs in the same serialized context as the state it
//! guards. Fetches themselves run as detached tasks; a superseded fetch is
//! left to finish and its response is discarded on arrival.
//!
//! Every view change bumps a generation counter. A settled view carries the
//! generation it was scheduled under and is dropped if a newer change has
//! arrived since, even when the debounce timer already fired.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use zoodro_client::{ClientError, VendorBatch};
use zoodro_core::{AppConfig, MapView, VendorRecord};

use crate::debounce::Debouncer;
use crate::error::CoordinatorError;
use crate::source::VendorSource;
use crate::tracker::{FetchOutcome, FetchTracker, RequestToken};

const OUTCOME_CHANNEL_CAPACITY: usize = 64;

/// Tuning for a [`Coordinator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorSettings {
    /// Quiet period after the last view change before a fetch is issued.
    pub debounce: Duration,
    /// Views are clamped into `[min_zoom, max_zoom]` before bounds are computed.
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            min_zoom: 0.0,
            max_zoom: 22.0,
        }
    }
}

impl CoordinatorSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }
}

enum Command {
    ViewChanged(MapView),
    Fetch {
        view: MapView,
        reply: oneshot::Sender<FetchOutcome>,
    },
    Flush {
        reply: oneshot::Sender<Option<PendingFetch>>,
    },
}

struct Completion {
    token: RequestToken,
    result: Result<VendorBatch, ClientError>,
}

/// A fetch issued through [`Coordinator::request_vendors_for_view`].
#[derive(Debug)]
pub struct PendingFetch {
    reply: oneshot::Receiver<FetchOutcome>,
}

impl PendingFetch {
    /// Waits for the fetch to be accepted, discarded or to fail.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Closed`] if the coordinator shut down
    /// before the fetch resolved.
    pub async fn outcome(self) -> Result<FetchOutcome, CoordinatorError> {
        self.reply.await.map_err(|_| CoordinatorError::Closed)
    }
}

/// Handle to a running vendor fetch coordinator.
///
/// Created when a map view mounts; [`shutdown`](Coordinator::shutdown) (or
/// dropping the handle) tears the actor down.
pub struct Coordinator {
    commands: mpsc::UnboundedSender<Command>,
    vendors: watch::Receiver<Arc<[VendorRecord]>>,
    outcomes: broadcast::Sender<FetchOutcome>,
    task: JoinHandle<()>,
}

impl Coordinator {
    /// Starts the coordinator task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<S: VendorSource>(source: S, settings: CoordinatorSettings) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (vendors_tx, vendors_rx) = watch::channel(Arc::from(Vec::new()));
        let (outcomes_tx, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);

        let actor = Actor::new(
            source,
            settings,
            settled_tx,
            completions_tx,
            vendors_tx,
            outcomes_tx.clone(),
        );
        let task = tokio::spawn(actor.run(commands_rx, settled_rx, completions_rx));

        Self {
            commands: commands_tx,
            vendors: vendors_rx,
            outcomes: outcomes_tx,
            task,
        }
    }

    /// Reports a map view change. Fetching waits for the debounce window to
    /// pass without further changes, and is skipped if the settled view is
    /// identical to the last one fetched.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Closed`] if the coordinator has stopped.
    pub fn view_changed(&self, view: MapView) -> Result<(), CoordinatorError> {
        self.commands
            .send(Command::ViewChanged(view))
            .map_err(|_| CoordinatorError::Closed)
    }

    /// Issues a fetch for `view` immediately, bypassing the debounce window.
    ///
    /// The request is registered before this returns, so two calls made in
    /// sequence are ordered: the second supersedes the first.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Closed`] if the coordinator has stopped.
    pub fn request_vendors_for_view(&self, view: MapView) -> Result<PendingFetch, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Fetch { view, reply })
            .map_err(|_| CoordinatorError::Closed)?;
        Ok(PendingFetch { reply: rx })
    }

    /// Fetches the latest reported view now instead of waiting out the
    /// debounce window, and waits for the result.
    ///
    /// Returns `None` when there is nothing left to fetch: no view change
    /// was reported, or the latest one has already been fetched and
    /// resolved. If its fetch is still in flight, waits for that one.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Closed`] if the coordinator has stopped.
    pub async fn flush(&self) -> Result<Option<FetchOutcome>, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Flush { reply })
            .map_err(|_| CoordinatorError::Closed)?;
        match rx.await.map_err(|_| CoordinatorError::Closed)? {
            Some(pending) => pending.outcome().await.map(Some),
            None => Ok(None),
        }
    }

    /// The "vendor list changed" notification. Only accepted responses
    /// update it.
    #[must_use]
    pub fn vendors(&self) -> watch::Receiver<Arc<[VendorRecord]>> {
        self.vendors.clone()
    }

    #[must_use]
    pub fn current_vendors(&self) -> Arc<[VendorRecord]> {
        Arc::clone(&self.vendors.borrow())
    }

    /// Every fetch outcome, including failures and discarded responses.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FetchOutcome> {
        self.outcomes.subscribe()
    }

    /// Stops the coordinator and waits for its task to finish. Fetches still
    /// in flight are abandoned.
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "vendor coordinator task ended abnormally");
        }
    }
}

/// A view that survived the debounce window, tagged with the generation
/// it was scheduled under.
type Settled = (u64, MapView);

struct Actor<S> {
    source: Arc<S>,
    settings: CoordinatorSettings,
    tracker: FetchTracker,
    generation: u64,
    latest_view: Option<MapView>,
    last_requested: Option<MapView>,
    debouncer: Debouncer<Settled>,
    vendors: watch::Sender<Arc<[VendorRecord]>>,
    outcomes: broadcast::Sender<FetchOutcome>,
    completions: mpsc::UnboundedSender<Completion>,
    replies: HashMap<RequestToken, Vec<oneshot::Sender<FetchOutcome>>>,
}

impl<S: VendorSource> Actor<S> {
    fn new(
        source: S,
        settings: CoordinatorSettings,
        settled: mpsc::UnboundedSender<Settled>,
        completions: mpsc::UnboundedSender<Completion>,
        vendors: watch::Sender<Arc<[VendorRecord]>>,
        outcomes: broadcast::Sender<FetchOutcome>,
    ) -> Self {
        let debouncer = Debouncer::new(settings.debounce, move |settled_view: Settled| {
            // The receiver only goes away when the actor itself has stopped.
            let _ = settled.send(settled_view);
        });
        Self {
            source: Arc::new(source),
            settings,
            tracker: FetchTracker::new(),
            generation: 0,
            latest_view: None,
            last_requested: None,
            debouncer,
            vendors,
            outcomes,
            completions,
            replies: HashMap::new(),
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut settled: mpsc::UnboundedReceiver<Settled>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::ViewChanged(view)) => self.on_view_changed(view),
                    Some(Command::Fetch { view, reply }) => {
                        self.start_fetch(view, Some(reply));
                    }
                    Some(Command::Flush { reply }) => {
                        let _ = reply.send(self.flush());
                    }
                    None => break,
                },
                Some(view) = settled.recv() => self.on_settled(view),
                Some(done) = completions.recv() => self.finish_fetch(done),
            }
        }
        self.debouncer.cancel();
        tracing::debug!(
            abandoned = self.replies.len(),
            "vendor coordinator stopped"
        );
    }

    fn on_view_changed(&mut self, view: MapView) {
        self.generation += 1;
        self.latest_view = Some(view);
        self.debouncer.call((self.generation, view));
    }

    fn on_settled(&mut self, (generation, view): Settled) {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "dropping settled view superseded by a newer change"
            );
            return;
        }
        let view = self.clamp(view);
        if self.last_requested == Some(view) {
            tracing::debug!(
                lat = view.center.lat,
                lng = view.center.lng,
                zoom = view.zoom,
                "view unchanged since last fetch; skipping"
            );
            return;
        }
        self.start_fetch(view, None);
    }

    /// Cancels the debounce timer and settles the latest view immediately.
    fn flush(&mut self) -> Option<PendingFetch> {
        self.debouncer.cancel();
        let view = self.clamp(self.latest_view?);
        let token = if self.last_requested == Some(view) {
            self.tracker.outstanding()?
        } else {
            self.start_fetch(view, None)
        };
        let (reply, rx) = oneshot::channel();
        self.replies.entry(token).or_default().push(reply);
        Some(PendingFetch { reply: rx })
    }

    fn clamp(&self, view: MapView) -> MapView {
        view.with_zoom_clamped(self.settings.min_zoom, self.settings.max_zoom)
    }

    fn start_fetch(
        &mut self,
        view: MapView,
        reply: Option<oneshot::Sender<FetchOutcome>>,
    ) -> RequestToken {
        let view = self.clamp(view);
        self.last_requested = Some(view);
        let request = self.tracker.issue(&view);
        tracing::debug!(
            token = %request.token,
            lat = view.center.lat,
            lng = view.center.lng,
            zoom = view.zoom,
            "requesting vendors for view"
        );
        if let Some(reply) = reply {
            self.replies.entry(request.token).or_default().push(reply);
        }

        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = source.fetch_vendors(&request.bounds).await;
            // Dropped when the coordinator has already shut down.
            let _ = completions.send(Completion {
                token: request.token,
                result,
            });
        });
        request.token
    }

    fn finish_fetch(&mut self, done: Completion) {
        let outcome = self.tracker.resolve(done.token, done.result);
        match &outcome {
            FetchOutcome::Accepted { count, skipped, .. } => {
                tracing::info!(
                    token = %done.token,
                    vendors = count,
                    skipped,
                    "vendor list updated"
                );
                self.vendors.send_replace(self.tracker.vendors());
            }
            FetchOutcome::Failed { error, .. } => {
                tracing::warn!(
                    token = %done.token,
                    error = %error,
                    "vendor fetch failed; keeping previous vendor list"
                );
            }
            FetchOutcome::Discarded { .. } => {}
        }

        for reply in self.replies.remove(&done.token).unwrap_or_default() {
            let _ = reply.send(outcome.clone());
        }
        // No subscribers is fine.
        let _ = self.outcomes.send(outcome);
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
