//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a query string value
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Link to a page of the blog listing
///
/// # Examples
/// ```ignore
/// listing_url("", 1)          // -> "/blogs"
/// listing_url("skip hire", 2) // -> "/blogs?q=skip%20hire&page=2"
/// ```
pub fn listing_url(query: &str, page: usize) -> String {
    let mut params = Vec::new();
    if !query.is_empty() {
        params.push(format!("q={}", encode_query_value(query)));
    }
    if page > 1 {
        params.push(format!("page={}", page));
    }

    if params.is_empty() {
        "/blogs".to_string()
    } else {
        format!("/blogs?{}", params.join("&"))
    }
}
