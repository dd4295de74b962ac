use crate::scrapers::error::BrowserError;
use crate::scrapers::traits::{BrowserSession, ElementRef};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Options used to start Chrome
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub headless: bool,
    /// Chrome binary to use instead of the one headless_chrome detects
    pub binary_path: Option<PathBuf>,
    pub window_size: (u32, u32),
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            headless: true,
            binary_path: None,
            window_size: (1920, 1080),
        }
    }
}

/// [`BrowserSession`] backed by a single headless Chrome tab.
///
/// The browser process is shut down when the session is dropped, which covers
/// every exit path of a collection run.
pub struct ChromeSession {
    // Kept alive for as long as the tab is used
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch Chrome and open a tab
    pub fn launch(options: &ChromeOptions) -> Result<Self, BrowserError> {
        info!("Launching Chrome (headless: {})...", options.headless);

        if let Some(path) = &options.binary_path {
            info!("Using Chrome binary at {}", path.display());
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(options.headless)
            .path(options.binary_path.clone())
            .window_size(Some(options.window_size))
            .idle_browser_timeout(Duration::from_secs(300))
            .args(vec![
                OsStr::new("--disable-notifications"),
                OsStr::new("--disable-infobars"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let browser = Browser::new(launch_options).map_err(|e| BrowserError::Launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn elements(&self, selector: &str) -> Vec<Element<'_>> {
        match self.tab.find_elements_by_xpath(selector) {
            Ok(elements) => elements,
            Err(e) => {
                debug!("No match for {}: {}", selector, e);
                Vec::new()
            }
        }
    }

    fn resolve(&self, element: &ElementRef) -> Result<Element<'_>, BrowserError> {
        self.elements(&element.selector)
            .into_iter()
            .nth(element.index)
            .ok_or_else(|| BrowserError::ElementNotFound {
                selector: element.selector.clone(),
                index: element.index,
            })
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::action("navigate", e))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::action("navigate", e))?;
        Ok(())
    }

    fn find(&mut self, selector: &str) -> Result<Option<ElementRef>, BrowserError> {
        Ok(if self.elements(selector).is_empty() {
            None
        } else {
            Some(ElementRef::new(selector, 0))
        })
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>, BrowserError> {
        let count = self.elements(selector).len();
        Ok((0..count).map(|i| ElementRef::new(selector, i)).collect())
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        self.resolve(element)?
            .click()
            .map_err(|e| BrowserError::action("click", e))?;
        Ok(())
    }

    fn read_text(&mut self, element: &ElementRef) -> Result<String, BrowserError> {
        self.resolve(element)?
            .get_inner_text()
            .map_err(|e| BrowserError::action("read text", e))
    }

    fn type_text(&mut self, element: &ElementRef, text: &str) -> Result<(), BrowserError> {
        let target = self.resolve(element)?;
        target
            .click()
            .map_err(|e| BrowserError::action("focus", e))?;
        target
            .type_into(text)
            .map_err(|e| BrowserError::action("type", e))?;
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), BrowserError> {
        self.tab
            .press_key(key)
            .map_err(|e| BrowserError::action("press key", e))?;
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.tab
            .evaluate("window.scrollTo(0, document.body.scrollHeight);", false)
            .map_err(|e| BrowserError::action("scroll", e))?;
        Ok(())
    }

    fn page_height(&mut self) -> Result<i64, BrowserError> {
        let result = self
            .tab
            .evaluate("document.body.scrollHeight", false)
            .map_err(|e| BrowserError::action("read page height", e))?;
        Ok(result.value.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.tab.get_url())
    }
}
