/// YouTube: middle-click on the search button or a search suggestion opens
/// the results page in a new tab.
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

mod search_button;
mod search_suggestions;

pub use search_button::SearchButton;
pub use search_suggestions::SearchSuggestions;

const RESULTS_URL: &str = "https://www.youtube.com/results";

/// Bytes left alone by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Results page for `query`; a space is `%20`, never `+`
pub fn search_url(query: &str) -> String {
    format!(
        "{}?search_query={}",
        RESULTS_URL,
        utf8_percent_encode(query, URI_COMPONENT)
    )
}
