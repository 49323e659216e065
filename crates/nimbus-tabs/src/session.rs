//! Tab session orchestration
//!
//! A session composes the classifier, redirect resolver, fetcher, and
//! enhancement pipeline into one serialized navigation stream. Navigation
//! requests supersede each other: every operation takes a generation number
//! up front, and an operation whose generation is stale at a checkpoint
//! discards its result instead of touching history or the surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use scraper::{Html, Selector};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use nimbus_fetch::{ContentFetcher, FetchResult};
use nimbus_navigation::{
    classify, Classification, NavigationEntry, NavigationHistory, RedirectResolver,
    SearchUrlBuilder,
};
use nimbus_render::{EnhancementPipeline, RenderSurface};

use crate::error::TabError;
use crate::state::LoadState;
use crate::Result;

pub struct TabSession {
    id: String,
    history: Mutex<NavigationHistory>,
    surface: Box<dyn RenderSurface>,
    fetcher: ContentFetcher,
    resolver: RedirectResolver,
    search_urls: SearchUrlBuilder,
    pipeline: EnhancementPipeline,
    state_tx: watch::Sender<LoadState>,
    /// Bumped by every operation; stale generations discard their results.
    generation: AtomicU64,
}

impl TabSession {
    pub fn new(
        surface: Box<dyn RenderSurface>,
        fetcher: ContentFetcher,
        resolver: RedirectResolver,
        search_urls: SearchUrlBuilder,
        pipeline: EnhancementPipeline,
    ) -> Self {
        let (state_tx, _) = watch::channel(LoadState::Idle);

        Self {
            id: Uuid::new_v4().to_string(),
            history: Mutex::new(NavigationHistory::new()),
            surface,
            fetcher,
            resolver,
            search_urls,
            pipeline,
            state_tx,
            generation: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn load_state(&self) -> LoadState {
        *self.state_tx.borrow()
    }

    /// Subscription point for load-state changes, so a tab bar can flip
    /// spinners and button states without polling.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state_tx.subscribe()
    }

    pub fn current_entry(&self) -> Option<NavigationEntry> {
        self.history.lock().current().cloned()
    }

    pub fn can_go_back(&self) -> bool {
        self.history.lock().can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.lock().can_go_forward()
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    /// Navigate to whatever the user typed.
    ///
    /// Search queries are turned into a search-engine URL; URLs are first
    /// unwrapped through the redirect resolver so the committed entry records
    /// the real destination. Nothing is committed until the page has both
    /// fetched and rendered, so a failed navigation never corrupts history.
    pub async fn navigate(&self, input: &str) -> Result<()> {
        let generation = self.begin();
        let requested = input.trim().to_string();

        let target = match classify(&requested) {
            Classification::SearchQuery(query) => self.search_urls.build(&query),
            Classification::Url(url) => match self.resolver.resolve(&url).await {
                Ok(resolved) => resolved,
                Err(err) => {
                    if self.superseded(generation) {
                        return Ok(());
                    }
                    self.fail();
                    return Err(TabError::Navigation(err));
                }
            },
        };
        if self.superseded(generation) {
            return Ok(());
        }

        tracing::info!(tab_id = %self.id, url = %target, "navigating");
        let Some(fetched) = self.load(generation, &target).await? else {
            return Ok(());
        };

        let title = extract_title(&fetched).unwrap_or_default();
        self.history
            .lock()
            .commit(NavigationEntry::new(requested, fetched.final_url, title));
        self.set_state(LoadState::Idle);
        Ok(())
    }

    /// Replay the previous history entry. A no-op at the oldest entry.
    pub async fn go_back(&self) -> Result<()> {
        let generation = self.begin();
        let entry = self.history.lock().back().cloned();
        match entry {
            Some(entry) => self.replay(generation, entry).await,
            None => Ok(()),
        }
    }

    /// Replay the next history entry. A no-op at the newest entry.
    pub async fn go_forward(&self) -> Result<()> {
        let generation = self.begin();
        let entry = self.history.lock().forward().cloned();
        match entry {
            Some(entry) => self.replay(generation, entry).await,
            None => Ok(()),
        }
    }

    /// Re-run the current entry without touching history. A no-op on a
    /// fresh tab.
    pub async fn reload(&self) -> Result<()> {
        let generation = self.begin();
        let entry = self.history.lock().current().cloned();
        match entry {
            Some(entry) => self.replay(generation, entry).await,
            None => Ok(()),
        }
    }

    /// Cancel whatever is in flight and return to idle. No history commit.
    pub fn stop(&self) {
        self.begin();
        self.set_state(LoadState::Idle);
        tracing::debug!(tab_id = %self.id, "stopped loading");
    }

    /// Fold in a navigation the surface performed on its own (an in-page
    /// link or scripted redirect the core never saw). The current entry is
    /// amended in place; no entry is created and no forward branch is lost.
    pub fn sync_external_navigation(&self) {
        let Some(observed) = self.surface.observed_url() else {
            return;
        };
        let mut history = self.history.lock();
        let Some(current) = history.current() else {
            return;
        };
        if current.resolved_url == observed {
            return;
        }

        tracing::debug!(tab_id = %self.id, url = %observed, "external navigation observed");
        history.amend_current(&observed, None);
    }

    /// History replay shares the Fetching → Rendering path with `navigate`
    /// but never commits.
    async fn replay(&self, generation: u64, entry: NavigationEntry) -> Result<()> {
        tracing::info!(tab_id = %self.id, url = %entry.resolved_url, "replaying history entry");
        if self.load(generation, &entry.resolved_url).await?.is_none() {
            return Ok(());
        }
        self.set_state(LoadState::Idle);
        Ok(())
    }

    /// Run Fetching → Rendering for `url`. Returns `Ok(None)` when the
    /// operation was superseded and its result discarded.
    async fn load(&self, generation: u64, url: &str) -> Result<Option<FetchResult>> {
        self.set_state(LoadState::Fetching);

        let fetched = match self.fetcher.fetch(url).await {
            Ok(fetched) => fetched,
            Err(err) => {
                if self.superseded(generation) {
                    return Ok(None);
                }
                tracing::warn!(
                    tab_id = %self.id,
                    url = %url,
                    kind = err.kind(),
                    error = %err,
                    "fetch failed"
                );
                self.fail();
                return Err(TabError::Fetch(err));
            }
        };
        if self.superseded(generation) {
            return Ok(None);
        }

        self.set_state(LoadState::Rendering);
        if let Err(err) = self.pipeline.render(self.surface.as_ref(), &fetched) {
            if self.superseded(generation) {
                return Ok(None);
            }
            tracing::warn!(tab_id = %self.id, url = %url, error = %err, "render failed");
            self.fail();
            return Err(TabError::Render(err));
        }
        if self.superseded(generation) {
            return Ok(None);
        }

        Ok(Some(fetched))
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn set_state(&self, state: LoadState) {
        let previous = *self.state_tx.borrow();
        if previous != state && !previous.can_transition_to(state) {
            tracing::warn!(
                tab_id = %self.id,
                from = %previous,
                to = %state,
                "unexpected load-state transition"
            );
        }
        self.state_tx.send_replace(state);
    }

    /// Failure drains through `Failed` back to `Idle`; the address bar
    /// reverts to the current entry because nothing was committed.
    fn fail(&self) {
        self.set_state(LoadState::Failed);
        self.set_state(LoadState::Idle);
    }
}

impl std::fmt::Debug for TabSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabSession")
            .field("id", &self.id)
            .field("load_state", &self.load_state())
            .field("history_len", &self.history_len())
            .finish()
    }
}

/// Polling fallback for surfaces without URL-change events: sample the
/// observed URL at a bounded rate and fold mismatches into history. The
/// task ends when the session is dropped.
pub fn spawn_url_sampler(
    session: &Arc<TabSession>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    let weak = Arc::downgrade(session);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let Some(session) = weak.upgrade() else {
                break;
            };
            session.sync_external_navigation();
        }
    })
}

/// Best-effort title: `<title>` first, then `og:title`. HTML only.
fn extract_title(fetched: &FetchResult) -> Option<String> {
    if !fetched.is_html() {
        return None;
    }

    let document = Html::parse_document(&fetched.body);

    if let Ok(selector) = Selector::parse("title") {
        for element in document.select(&selector) {
            let text = element.text().collect::<Vec<_>>().join(" ");
            let cleaned = normalize_whitespace(&text);
            if !cleaned.is_empty() {
                return Some(cleaned);
            }
        }
    }

    if let Ok(selector) = Selector::parse("meta[property='og:title']") {
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                let cleaned = normalize_whitespace(content);
                if !cleaned.is_empty() {
                    return Some(cleaned);
                }
            }
        }
    }

    None
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
