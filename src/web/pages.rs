//! Per-page panels for the web host.
//!
//! Every browser page that loads the shell gets its own page id and its own
//! [`SpotDetailPanel`], so an intent from one tab never supersedes or
//! repaints another tab's panel. All pages share one backend client and one
//! event log.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use chrono::Utc;

use crate::analytics::EventLog;
use crate::api::{HttpSpotApi, SpotApi};
use crate::config::PanelConfig;
use crate::config::schema::PanelSettings;
use crate::panel::SpotDetailPanel;

/// Pages kept alive at once; opening one more drops the least recently used.
pub const MAX_PAGES: usize = 256;

/// Page used by intents that don't name one (scripts, curl).
pub const DEFAULT_PAGE: &str = "default";

const MAX_PAGE_ID_LEN: usize = 64;

/// The panel behind one browser page.
pub type PagePanel<A> = SpotDetailPanel<Arc<A>>;

struct PageEntry<A> {
    panel: Arc<PagePanel<A>>,
    /// Value of `Pages::clock` at the last access.
    last_used: u64,
}

/// Registry of open pages, keyed by page id.
pub struct Pages<A> {
    api: Arc<A>,
    settings: PanelSettings,
    events: EventLog,
    opened: AtomicU64,
    clock: AtomicU64,
    pages: Mutex<HashMap<String, PageEntry<A>>>,
}

impl Pages<HttpSpotApi> {
    /// Pages talking to the configured backend, logging per `[logging]`.
    pub fn from_config(config: &PanelConfig) -> Self {
        Pages::new(HttpSpotApi::from_config(&config.api), &config.panel)
            .with_event_log(EventLog::from_config(&config.logging))
    }
}

impl<A: SpotApi> Pages<A> {
    pub fn new(api: A, settings: &PanelSettings) -> Self {
        Self {
            api: Arc::new(api),
            settings: settings.clone(),
            events: EventLog::disabled(),
            opened: AtomicU64::new(0),
            clock: AtomicU64::new(0),
            pages: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    /// Open a fresh page. Returns its id and its (placeholder) panel.
    pub fn open(&self) -> (String, Arc<PagePanel<A>>) {
        let n = self.opened.fetch_add(1, Ordering::Relaxed);
        let id = format!("{:x}-{:x}", Utc::now().timestamp_millis(), n);
        let mut pages = self.lock();
        let panel = self.insert(&mut pages, &id);
        (id, panel)
    }

    /// The panel for page `id`, created on first use so a page served before
    /// a restart keeps working.
    pub fn page(&self, id: &str) -> Result<Arc<PagePanel<A>>> {
        if id.is_empty() || id.len() > MAX_PAGE_ID_LEN {
            anyhow::bail!("invalid page id: {id:?}");
        }

        let mut pages = self.lock();
        if let Some(entry) = pages.get_mut(id) {
            entry.last_used = self.tick();
            return Ok(Arc::clone(&entry.panel));
        }
        Ok(self.insert(&mut pages, id))
    }

    /// Number of pages currently tracked.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, pages: &mut HashMap<String, PageEntry<A>>, id: &str) -> Arc<PagePanel<A>> {
        if pages.len() >= MAX_PAGES {
            evict_least_recent(pages);
        }

        let panel = Arc::new(
            SpotDetailPanel::new(Arc::clone(&self.api), &self.settings)
                .with_event_log(self.events.clone()),
        );
        pages.insert(
            id.to_string(),
            PageEntry {
                panel: Arc::clone(&panel),
                last_used: self.tick(),
            },
        );
        panel
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PageEntry<A>>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn evict_least_recent<A>(pages: &mut HashMap<String, PageEntry<A>>) {
    let oldest = pages
        .iter()
        .min_by_key(|(_, entry)| entry.last_used)
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        pages.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpReply, SpotId};
    use crate::panel::PLACEHOLDER_HTML;

    struct Available;

    impl SpotApi for Available {
        fn fetch_details(&self, _spot_id: &SpotId) -> Result<HttpReply> {
            Ok(HttpReply::new(
                200,
                r#"{"spot_status":"A","current_occupied":false,"is_deletable":true}"#,
            ))
        }

        fn delete_spot(&self, _spot_id: &SpotId) -> Result<HttpReply> {
            Ok(HttpReply::new(200, ""))
        }
    }

    fn pages() -> Pages<Available> {
        Pages::new(Available, &PanelSettings::default())
    }

    #[test]
    fn opened_pages_have_distinct_ids_and_panels() {
        let pages = pages();
        let (a, panel_a) = pages.open();
        let (b, _) = pages.open();
        assert_ne!(a, b);
        assert_eq!(pages.len(), 2);

        panel_a.show_details(&SpotId::parse("5").unwrap());
        assert!(pages.page(&a).unwrap().markup().contains("Available"));
        assert_eq!(pages.page(&b).unwrap().markup(), PLACEHOLDER_HTML);
    }

    #[test]
    fn unknown_page_is_created_on_first_use() {
        let pages = pages();
        assert!(pages.is_empty());
        let panel = pages.page("from-before-restart").unwrap();
        assert_eq!(panel.markup(), PLACEHOLDER_HTML);
        assert!(Arc::ptr_eq(&panel, &pages.page("from-before-restart").unwrap()));
    }

    #[test]
    fn invalid_page_ids_are_rejected() {
        let pages = pages();
        assert!(pages.page("").is_err());
        assert!(pages.page(&"x".repeat(65)).is_err());
        assert!(pages.is_empty());
    }

    #[test]
    fn least_recently_used_page_is_dropped_at_capacity() {
        let pages = pages();
        let (first, _) = pages.open();
        let (second, _) = pages.open();
        pages.page(&first).unwrap();
        for _ in 2..MAX_PAGES {
            pages.open();
        }
        assert_eq!(pages.len(), MAX_PAGES);

        pages.open();
        assert_eq!(pages.len(), MAX_PAGES);
        let ids: Vec<String> = pages.lock().keys().cloned().collect();
        assert!(ids.contains(&first));
        assert!(!ids.contains(&second));
    }
}
