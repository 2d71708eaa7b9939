use crate::errors::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Tick records of one page.
    Data,
    /// The session's page-to-time manifest.
    Boundaries,
}

impl PageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageAction::Data => "data",
            PageAction::Boundaries => "boundaries",
        }
    }
}

/// Remote paginated tick feed.
///
/// Implementations return the raw response body. An empty body with a success
/// status means the feed has no more pages; transport failures map to
/// `QueryError::Transport` and non-200 statuses to `QueryError::HttpStatus`.
pub trait PageSource {
    fn fetch_page(&self, symbol: &str, page: u32, action: PageAction)
        -> Result<String, QueryError>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn fetch_page(
        &self,
        symbol: &str,
        page: u32,
        action: PageAction,
    ) -> Result<String, QueryError> {
        (**self).fetch_page(symbol, page, action)
    }
}

impl<T: PageSource + ?Sized> PageSource for Box<T> {
    fn fetch_page(
        &self,
        symbol: &str,
        page: u32,
        action: PageAction,
    ) -> Result<String, QueryError> {
        (**self).fetch_page(symbol, page, action)
    }
}
