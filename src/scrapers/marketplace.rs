use crate::config::Credentials;
use crate::extract::{ListingExtractor, RawListing};
use crate::models::ListingRecord;
use crate::scrapers::error::{BrowserError, CollectError};
use crate::scrapers::traits::{BrowserSession, ElementRef};
use crate::scrapers::types::CollectionParams;
use tracing::{debug, info, warn};

/// Collects rental listings from the marketplace through a [`BrowserSession`]
pub struct MarketplaceCollector<B: BrowserSession> {
    session: B,
    extractor: ListingExtractor,
    credentials: Credentials,
    params: CollectionParams,
}

impl<B: BrowserSession> MarketplaceCollector<B> {
    pub fn new(
        session: B,
        extractor: ListingExtractor,
        credentials: Credentials,
        params: CollectionParams,
    ) -> Self {
        Self {
            session,
            extractor,
            credentials,
            params,
        }
    }

    /// Run a full collection.
    ///
    /// A failed login or an unreachable marketplace page ends the run with an
    /// empty result; a listing that cannot be read is skipped.
    pub fn collect(&mut self) -> Vec<ListingRecord> {
        info!("Starting marketplace collection for '{}'", self.params.search_query);

        if let Err(e) = self.login() {
            warn!("Login failed: {}", e);
            return Vec::new();
        }
        self.params.pacing.pause(self.params.pacing.page_load);

        info!("Opening marketplace...");
        if let Err(e) = self.session.navigate(&self.params.marketplace_url) {
            warn!("Could not open marketplace: {}", e);
            return Vec::new();
        }
        self.params.pacing.pause(self.params.pacing.page_load);

        if let Err(e) = self.search() {
            warn!("Search failed, continuing on the current page: {}", e);
        }
        if let Err(e) = self.apply_rental_filter() {
            warn!("Could not apply rental filter: {}", e);
        }

        let records = self.scroll_and_collect();
        info!("Collected {} listings", records.len());
        records
    }

    /// Consume the collector and give back the session
    #[cfg(test)]
    pub fn into_session(self) -> B {
        self.session
    }

    fn login(&mut self) -> Result<(), CollectError> {
        info!("Logging in...");
        self.session.navigate(&self.params.home_url)?;
        self.params.pacing.pause(self.params.pacing.step);

        self.accept_cookies();

        let (Some(login_id), Some(password)) =
            (self.credentials.login_id(), self.credentials.password())
        else {
            return Err(CollectError::MissingCredentials);
        };
        let (login_id, password) = (login_id.to_string(), password.to_string());

        let selectors = &self.params.selectors;
        let login_field = self
            .session
            .find(&selectors.login_field)?
            .ok_or(CollectError::LoginFormMissing)?;
        let password_field = self
            .session
            .find(&selectors.password_field)?
            .ok_or(CollectError::LoginFormMissing)?;

        self.session.type_text(&login_field, &login_id)?;
        self.session.type_text(&password_field, &password)?;
        self.session.press_key("Enter")?;
        self.params.pacing.pause(self.params.pacing.page_load);

        let url = self.session.current_url()?;
        let lowered = url.to_lowercase();
        if lowered.contains("login") || lowered.contains("connexion") {
            return Err(CollectError::LoginRejected { url });
        }

        info!("Logged in");
        Ok(())
    }

    fn accept_cookies(&mut self) {
        let selector = self.params.selectors.cookie_accept.clone();
        match self.session.find(&selector) {
            Ok(Some(button)) => match self.session.click(&button) {
                Ok(()) => {
                    debug!("Accepted cookie dialog");
                    self.params.pacing.pause(self.params.pacing.step);
                }
                Err(e) => debug!("Cookie dialog click failed: {}", e),
            },
            Ok(None) => debug!("No cookie dialog"),
            Err(e) => debug!("Cookie dialog lookup failed: {}", e),
        }
    }

    fn search(&mut self) -> Result<(), BrowserError> {
        let selector = self.params.selectors.search_box.clone();
        let search_box = self
            .session
            .find(&selector)?
            .ok_or(BrowserError::ElementNotFound { selector, index: 0 })?;

        info!("Searching for '{}'", self.params.search_query);
        let query = self.params.search_query.clone();
        self.session.type_text(&search_box, &query)?;
        self.session.press_key("Enter")?;
        self.params.pacing.pause(self.params.pacing.page_load);
        Ok(())
    }

    fn apply_rental_filter(&mut self) -> Result<(), BrowserError> {
        let selectors = self.params.selectors.clone();
        let steps = [
            (&selectors.filter_button, self.params.pacing.step),
            (&selectors.rental_filter, self.params.pacing.step),
            (&selectors.apply_filter, self.params.pacing.page_load),
        ];

        for (selector, delay) in steps {
            let button = self
                .session
                .find(selector)?
                .ok_or_else(|| BrowserError::ElementNotFound {
                    selector: selector.clone(),
                    index: 0,
                })?;
            self.session.click(&button)?;
            self.params.pacing.pause(delay);
        }

        debug!("Rental filter applied");
        Ok(())
    }

    /// Scroll and read listings until enough were collected or the page stopped growing
    fn scroll_and_collect(&mut self) -> Vec<ListingRecord> {
        let max = self.params.max_announcements;
        let mut records = Vec::new();
        let mut scroll_attempts = 0;
        let mut last_height = self.session.page_height().unwrap_or(0);

        info!("Loading listings...");
        while records.len() < max && scroll_attempts < self.params.max_scroll_attempts {
            if let Err(e) = self.session.scroll_to_bottom() {
                warn!("Scroll failed: {}", e);
            }
            self.params.pacing.pause(self.params.pacing.after_scroll);

            let listing_selector = self.params.selectors.listing_link.clone();
            let listings = self.session.find_all(&listing_selector).unwrap_or_else(|e| {
                warn!("Could not list listings: {}", e);
                Vec::new()
            });
            debug!("{} listing links on page", listings.len());

            for listing in &listings {
                if records.len() >= max {
                    break;
                }

                match self.read_listing(listing) {
                    Ok(record) => {
                        records.push(record);
                        info!("Listing {}/{} extracted", records.len(), max);
                    }
                    Err(e) => {
                        warn!("Skipping listing {}: {}", listing.index, e);
                        if let Err(e) = self.session.press_key("Escape") {
                            debug!("Escape failed: {}", e);
                        }
                    }
                }

                self.params.pacing.random_pause();
            }

            let new_height = self.session.page_height().unwrap_or(last_height);
            if new_height == last_height {
                scroll_attempts += 1;
                debug!(
                    "Page did not grow ({}/{})",
                    scroll_attempts, self.params.max_scroll_attempts
                );
            }
            last_height = new_height;
        }

        records
    }

    /// Open one listing, read its fields and close the detail view
    fn read_listing(&mut self, listing: &ElementRef) -> Result<ListingRecord, BrowserError> {
        self.session.click(listing)?;
        self.params.pacing.pause(self.params.pacing.detail_open);

        let selectors = self.params.selectors.clone();
        let raw = RawListing {
            title: self.read_optional(&selectors.title),
            price_text: self.read_optional(&selectors.price),
            location_candidates: self.read_all(&selectors.location),
            description: self.read_optional(&selectors.description),
            link: self.session.current_url().unwrap_or_default(),
        };

        let record = self.extractor.extract(&raw);
        self.close_detail();
        Ok(record)
    }

    fn read_optional(&mut self, selector: &str) -> Option<String> {
        let element = match self.session.find(selector) {
            Ok(Some(element)) => element,
            Ok(None) => return None,
            Err(e) => {
                debug!("Lookup of {} failed: {}", selector, e);
                return None;
            }
        };
        match self.session.read_text(&element) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Could not read {}: {}", selector, e);
                None
            }
        }
    }

    fn read_all(&mut self, selector: &str) -> Vec<String> {
        let elements = self.session.find_all(selector).unwrap_or_default();
        elements
            .iter()
            .filter_map(|element| self.session.read_text(element).ok())
            .collect()
    }

    fn close_detail(&mut self) {
        let selector = self.params.selectors.close_button.clone();
        let closed = match self.session.find(&selector) {
            Ok(Some(button)) => self.session.click(&button).is_ok(),
            _ => false,
        };
        if !closed {
            if let Err(e) = self.session.press_key("Escape") {
                debug!("Could not close listing: {}", e);
            }
        }
        self.params.pacing.pause(self.params.pacing.step / 2);
    }
}
