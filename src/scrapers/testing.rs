//! In-memory [`BrowserSession`] used by the collector tests.

use crate::scrapers::error::BrowserError;
use crate::scrapers::traits::{BrowserSession, ElementRef};
use crate::scrapers::types::Selectors;

pub struct FakeBrowser {
    selectors: Selectors,
    url: String,
    height: i64,

    pub listing_count: usize,
    pub login_succeeds: bool,
    pub has_filters: bool,
    /// Scrolls that still make the page taller
    pub growth_scrolls: usize,
    /// Index of a listing whose click fails
    pub failing_listing: Option<usize>,

    pub navigations: Vec<String>,
    pub typed: Vec<String>,
    pub scrolls: usize,
    pub listing_clicks: usize,
    pub escapes: usize,
}

impl FakeBrowser {
    pub fn new(listing_count: usize) -> Self {
        Self {
            selectors: Selectors::default(),
            url: "about:blank".to_string(),
            height: 2000,
            listing_count,
            login_succeeds: true,
            has_filters: true,
            growth_scrolls: 0,
            failing_listing: None,
            navigations: Vec::new(),
            typed: Vec::new(),
            scrolls: 0,
            listing_clicks: 0,
            escapes: 0,
        }
    }

    fn is_filter(&self, selector: &str) -> bool {
        selector == self.selectors.filter_button
            || selector == self.selectors.rental_filter
            || selector == self.selectors.apply_filter
    }
}

impl BrowserSession for FakeBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.navigations.push(url.to_string());
        self.url = url.to_string();
        Ok(())
    }

    fn find(&mut self, selector: &str) -> Result<Option<ElementRef>, BrowserError> {
        Ok(self.find_all(selector)?.into_iter().next())
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>, BrowserError> {
        let count = if selector == self.selectors.listing_link {
            self.listing_count
        } else if selector == self.selectors.location {
            2
        } else if self.is_filter(selector) && !self.has_filters {
            0
        } else {
            1
        };
        Ok((0..count).map(|i| ElementRef::new(selector, i)).collect())
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        if element.selector == self.selectors.listing_link {
            if self.failing_listing == Some(element.index) {
                return Err(BrowserError::action("click", "element is not clickable"));
            }
            self.listing_clicks += 1;
            self.url = format!(
                "https://www.facebook.com/marketplace/item/{}/",
                1000 + element.index
            );
        }
        Ok(())
    }

    fn read_text(&mut self, element: &ElementRef) -> Result<String, BrowserError> {
        let s = &self.selectors;
        let text = if element.selector == s.title {
            "Appartement F3 Andraharo".to_string()
        } else if element.selector == s.price {
            "350 000 MGA".to_string()
        } else if element.selector == s.location {
            ["Il y a 3 jours", "Andraharo, Antananarivo"][element.index].to_string()
        } else if element.selector == s.description {
            "Bel appartement MEUBLÉ de 3 chambres, 80m2, avec parking, bon état".to_string()
        } else {
            String::new()
        };
        Ok(text)
    }

    fn type_text(&mut self, _element: &ElementRef, text: &str) -> Result<(), BrowserError> {
        self.typed.push(text.to_string());
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), BrowserError> {
        match key {
            "Escape" => self.escapes += 1,
            "Enter" if !self.url.contains("marketplace") => {
                if !self.login_succeeds {
                    self.url = "https://www.facebook.com/login/?next=%2F".to_string();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.scrolls += 1;
        if self.growth_scrolls > 0 {
            self.growth_scrolls -= 1;
            self.height += 1000;
        }
        Ok(())
    }

    fn page_height(&mut self) -> Result<i64, BrowserError> {
        Ok(self.height)
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.url.clone())
    }
}
