use crate::scrapers::error::BrowserError;

/// Handle to an element found on the current page.
///
/// The handle stores the selector and the position among its matches, and is
/// resolved again each time it is used, so it stays valid across page updates
/// as long as the element order does not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub selector: String,
    pub index: usize,
}

impl ElementRef {
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

/// The browser capabilities the marketplace collector needs.
/// Selectors are XPath expressions.
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// First element matching `selector`, if any
    fn find(&mut self, selector: &str) -> Result<Option<ElementRef>, BrowserError>;

    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>, BrowserError>;

    fn click(&mut self, element: &ElementRef) -> Result<(), BrowserError>;

    fn read_text(&mut self, element: &ElementRef) -> Result<String, BrowserError>;

    /// Focus `element` and type `text` into it
    fn type_text(&mut self, element: &ElementRef, text: &str) -> Result<(), BrowserError>;

    /// Press a named key ("Enter", "Escape") on the focused element
    fn press_key(&mut self, key: &str) -> Result<(), BrowserError>;

    fn scroll_to_bottom(&mut self) -> Result<(), BrowserError>;

    fn page_height(&mut self) -> Result<i64, BrowserError>;

    fn current_url(&mut self) -> Result<String, BrowserError>;
}
