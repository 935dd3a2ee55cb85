//! List helpers for the blog listing: paginator and category pills

use super::html::html_escape;
use super::url::{encode_query_value, listing_url};
use crate::content::listing::ALL_TOPICS;

/// Generate a paginator for the blog listing; empty for a single page
pub fn paginator(
    current: usize,
    total: usize,
    query: &str,
    prev_text: &str,
    next_text: &str,
    mid_size: usize,
) -> String {
    if total <= 1 {
        return String::new();
    }

    let mut html = r#"<nav class="pagination">"#.to_string();

    // Previous link
    if current > 1 {
        html.push_str(&format!(
            r#"<a class="pagination-prev" href="{}">{}</a>"#,
            html_escape(&listing_url(query, current - 1)),
            prev_text
        ));
    } else {
        html.push_str(&format!(
            r#"<span class="pagination-prev disabled">{}</span>"#,
            prev_text
        ));
    }

    // Page numbers
    html.push_str(r#"<span class="pagination-numbers">"#);

    let start = (current.saturating_sub(mid_size)).max(1);
    let end = (current + mid_size).min(total);

    if start > 1 {
        html.push_str(&page_link(query, 1));
        if start > 2 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
    }

    for page in start..=end {
        if page == current {
            html.push_str(&format!(
                r#"<span class="pagination-number current">{}</span>"#,
                page
            ));
        } else {
            html.push_str(&page_link(query, page));
        }
    }

    if end < total {
        if end < total - 1 {
            html.push_str(r#"<span class="pagination-ellipsis">…</span>"#);
        }
        html.push_str(&page_link(query, total));
    }

    html.push_str("</span>");

    html.push_str(&format!(
        r#"<span class="pagination-status">{} / {}</span>"#,
        current, total
    ));

    // Next link
    if current < total {
        html.push_str(&format!(
            r#"<a class="pagination-next" href="{}">{}</a>"#,
            html_escape(&listing_url(query, current + 1)),
            next_text
        ));
    } else {
        html.push_str(&format!(
            r#"<span class="pagination-next disabled">{}</span>"#,
            next_text
        ));
    }

    html.push_str("</nav>");
    html
}

fn page_link(query: &str, page: usize) -> String {
    format!(
        r#"<a class="pagination-number" href="{}">{}</a>"#,
        html_escape(&listing_url(query, page)),
        page
    )
}

/// Generate the category pill bar; the pill whose query equals the active
/// query is marked active
pub fn category_pills(labels: &[String], active_query: &str) -> String {
    if labels.is_empty() {
        return String::new();
    }

    let mut html = r#"<div class="category-pills">"#.to_string();

    for label in labels {
        let is_all = label == ALL_TOPICS;
        let active = if is_all {
            active_query.is_empty()
        } else {
            label == active_query
        };
        let href = if is_all {
            "/blogs".to_string()
        } else {
            format!("/blogs?category={}", encode_query_value(label))
        };

        html.push_str(&format!(
            r#"<a class="category-pill{}" href="{}">{}</a>"#,
            if active { " active" } else { "" },
            html_escape(&href),
            html_escape(label)
        ));
    }

    html.push_str("</div>");
    html
}
