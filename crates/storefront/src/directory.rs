//! Country directory: a grid of cards that navigate away when clicked.
//!
//! Unlike the catalog, a failed load does not raise a notification. The
//! grid shows a static error and the failure is logged.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use market_core::CountryEntry;
use tracing::{debug, error, info, instrument, warn};

use crate::backend::StorefrontBackend;
use crate::dom::{Document, Element, ElementNode, Node, RenderTarget, ids};
use crate::error::DomError;
use crate::request::RequestTracker;

pub const LOAD_FAILED_TEXT: &str = "Failed to load countries. Please refresh the page.";

/// Id of the flag image inside a country card.
#[must_use]
pub fn flag_image_id(country_id: &str) -> String {
    format!("flag-{country_id}")
}

/// Performs full-page navigation.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, url: &str);
}

/// Navigator that records every navigation instead of leaving the page.
#[derive(Debug, Default)]
pub struct NavigationLog {
    visited: Mutex<Vec<String>>,
}

impl NavigationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.visited.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// URLs navigated to, oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.lock().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.lock().last().cloned()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, url: &str) {
        info!(url, "Navigating");
        self.lock().push(url.to_string());
    }
}

impl<N: Navigator> Navigator for Arc<N> {
    fn navigate(&self, url: &str) {
        (**self).navigate(url);
    }
}

/// The country directory page controller.
///
/// Cheap to clone; clones drive the same page.
pub struct Directory<B, N> {
    inner: Arc<DirectoryInner<B, N>>,
}

impl<B, N> Clone for Directory<B, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DirectoryInner<B, N> {
    backend: B,
    navigator: N,
    document: Document,
    grid: Arc<Element>,
    placeholder_image: String,
    requests: RequestTracker,
    /// Entries whose card is currently rendered.
    cards: Mutex<Vec<CountryEntry>>,
}

impl<B: StorefrontBackend, N: Navigator> Directory<B, N> {
    /// Attach to a directory page.
    ///
    /// # Errors
    ///
    /// Returns `DomError::MissingElement` if the page lacks `#countries-grid`.
    pub fn new(
        backend: B,
        navigator: N,
        document: &Document,
        placeholder_image: impl Into<String>,
    ) -> Result<Self, DomError> {
        Ok(Self {
            inner: Arc::new(DirectoryInner {
                backend,
                navigator,
                document: document.clone(),
                grid: document.require(ids::COUNTRIES_GRID)?,
                placeholder_image: placeholder_image.into(),
                requests: RequestTracker::new(),
                cards: Mutex::new(Vec::new()),
            }),
        })
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.inner.navigator
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    fn cards(&self) -> MutexGuard<'_, Vec<CountryEntry>> {
        self.inner.cards.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entries currently shown as cards.
    #[must_use]
    pub fn entries(&self) -> Vec<CountryEntry> {
        self.cards().clone()
    }

    /// Fetch the countries and rebuild the grid.
    #[instrument(skip(self))]
    pub async fn load_countries(&self) {
        let token = self.inner.requests.issue();
        let result = self.inner.backend.fetch_countries().await;
        if !self.inner.requests.is_current(token) {
            debug!("Dropping stale countries response");
            return;
        }

        match result {
            Ok(countries) => self.render(countries),
            Err(e) => {
                error!(error = %e, "Error loading countries");
                self.cards().clear();
                self.inner.grid.set_content(
                    ElementNode::new("div")
                        .class("error")
                        .text(LOAD_FAILED_TEXT)
                        .into(),
                );
            }
        }
    }

    fn render(&self, countries: Vec<CountryEntry>) {
        let grid = &self.inner.grid;
        grid.clear();

        let mut seen = HashSet::new();
        let mut cards = self.cards();
        cards.clear();
        for country in countries {
            if !seen.insert(country.id.clone()) {
                warn!(country_id = %country.id, "Skipping duplicate country id");
                continue;
            }
            grid.append(country_card(&country));
            cards.push(country);
        }
        debug!(count = cards.len(), "Rendered countries");
    }

    /// The flag image of a card failed to load: show the placeholder.
    ///
    /// Returns whether a rendered flag was swapped. Unknown ids are ignored.
    pub fn flag_failed(&self, country_id: &str) -> bool {
        let swapped = self.inner.document.set_attribute(
            &flag_image_id(country_id),
            "src",
            &self.inner.placeholder_image,
        );
        if swapped {
            debug!(country_id, "Flag failed to load, using placeholder");
        }
        swapped
    }

    /// Click anywhere on a card: navigate to its redirect URL immediately.
    ///
    /// Returns whether a rendered card matched `country_id`.
    #[instrument(skip(self))]
    pub fn click_card(&self, country_id: &str) -> bool {
        let url = self
            .cards()
            .iter()
            .find(|entry| entry.id == country_id)
            .map(|entry| entry.redirect_url.clone());
        match url {
            Some(url) => {
                self.inner.navigator.navigate(&url);
                true
            }
            None => {
                warn!("Ignoring click on unknown country card");
                false
            }
        }
    }
}

fn country_card(country: &CountryEntry) -> Node {
    ElementNode::new("div")
        .class("country-card")
        .attr("data-country", country.id.as_str())
        .child(
            ElementNode::new("img")
                .id(flag_image_id(&country.id))
                .class("country-flag")
                .attr("src", country.flag.as_str())
                .attr("alt", format!("{} flag", country.name)),
        )
        .child(
            ElementNode::new("div")
                .class("country-name")
                .text(country.name.as_str()),
        )
        .into()
}
