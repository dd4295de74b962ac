use rand::Rng;
use std::thread;
use std::time::Duration;

/// Parameters of one marketplace collection run
#[derive(Debug, Clone)]
pub struct CollectionParams {
    pub home_url: String,
    pub marketplace_url: String,
    /// Text typed into the marketplace search box
    pub search_query: String,
    /// Upper bound on the number of records returned
    pub max_announcements: usize,
    /// Scrolls without page growth tolerated before the run stops
    pub max_scroll_attempts: u32,
    pub selectors: Selectors,
    pub pacing: Pacing,
}

impl Default for CollectionParams {
    fn default() -> Self {
        Self {
            home_url: "https://www.facebook.com/".to_string(),
            marketplace_url: "https://www.facebook.com/marketplace/".to_string(),
            search_query: "Location Antananarivo".to_string(),
            max_announcements: 20,
            max_scroll_attempts: 10,
            selectors: Selectors::default(),
            pacing: Pacing::default(),
        }
    }
}

/// XPath selectors for the marketplace pages
#[derive(Debug, Clone)]
pub struct Selectors {
    pub cookie_accept: String,
    pub login_field: String,
    pub password_field: String,
    pub search_box: String,
    pub filter_button: String,
    pub rental_filter: String,
    pub apply_filter: String,
    pub listing_link: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub description: String,
    pub close_button: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            cookie_accept: "//button[contains(string(), 'Autoriser les cookies') or contains(string(), 'Accepter')]".to_string(),
            login_field: "//input[@id='email']".to_string(),
            password_field: "//input[@id='pass']".to_string(),
            search_box: "//input[@placeholder='Rechercher sur Marketplace']".to_string(),
            filter_button: "//span[contains(text(), 'Filtres')]".to_string(),
            rental_filter: "//span[contains(text(), 'Location')]".to_string(),
            apply_filter: "//span[contains(text(), 'Appliquer')]".to_string(),
            listing_link: "//a[contains(@href, '/marketplace/item/')]".to_string(),
            title: "//h1".to_string(),
            price: "//div[contains(@class, 'x1y332')]//span[contains(text(), 'MGA')]".to_string(),
            location: "//span[contains(@class, 'x1lliihq')]".to_string(),
            description: "//div[contains(@class, 'xz9dl7a')]".to_string(),
            close_button: "//div[@aria-label='Fermer']".to_string(),
        }
    }
}

/// Delays inserted between browser steps to keep a polite request rate
#[derive(Debug, Clone)]
pub struct Pacing {
    /// After loading a page or submitting a form
    pub page_load: Duration,
    /// After a click that only changes part of the page
    pub step: Duration,
    /// After scrolling, for new listings to load
    pub after_scroll: Duration,
    /// After opening a listing's detail view
    pub detail_open: Duration,
    /// Random pause between two listings, bounds inclusive
    pub between_listings: (Duration, Duration),
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            page_load: Duration::from_secs(5),
            step: Duration::from_secs(2),
            after_scroll: Duration::from_secs(3),
            detail_open: Duration::from_secs(5),
            between_listings: (Duration::from_secs(2), Duration::from_secs(4)),
        }
    }
}

impl Pacing {
    /// No delays at all
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            page_load: Duration::ZERO,
            step: Duration::ZERO,
            after_scroll: Duration::ZERO,
            detail_open: Duration::ZERO,
            between_listings: (Duration::ZERO, Duration::ZERO),
        }
    }

    pub fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    pub fn random_pause(&self) {
        self.pause(self.random_between_listings());
    }

    /// Pick a delay in the `between_listings` range
    pub fn random_between_listings(&self) -> Duration {
        let (min, max) = self.between_listings;
        if max <= min {
            return min;
        }
        let millis = rand::thread_rng().gen_range(min.as_millis()..=max.as_millis());
        Duration::from_millis(millis as u64)
    }
}
