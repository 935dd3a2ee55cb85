//! Blog listing: free-text search and fixed-size pagination over a
//! collection fetched once per session

use serde::Serialize;

use super::post::PostSummary;

/// Posts per listing page
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Label of the pill that clears the search
pub const ALL_TOPICS: &str = "All Topics";

/// True when `query` occurs, case-insensitively, in the title, category or
/// excerpt. An empty query matches everything.
pub fn matches_query(post: &PostSummary, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }

    [&post.title, &post.category, &post.excerpt]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

/// A category filter shortcut
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryPill {
    All,
    Label(String),
}

impl CategoryPill {
    pub fn from_label(label: &str) -> Self {
        if label.is_empty() || label == ALL_TOPICS {
            CategoryPill::All
        } else {
            CategoryPill::Label(label.to_string())
        }
    }

    /// Search query the pill stands for
    pub fn query(&self) -> &str {
        match self {
            CategoryPill::All => "",
            CategoryPill::Label(label) => label,
        }
    }
}

/// Search and pagination state over an in-memory collection
#[derive(Debug, Clone)]
pub struct Listing {
    posts: Vec<PostSummary>,
    query: String,
    page: usize,
    page_size: usize,
}

impl Listing {
    pub fn new(posts: Vec<PostSummary>) -> Self {
        Self::with_page_size(posts, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(posts: Vec<PostSummary>, page_size: usize) -> Self {
        Self {
            posts,
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the search query; always returns to the first page
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Apply a category pill. Labels go through the same substring search,
    /// so a pill also matches posts mentioning the label in title or excerpt.
    pub fn select_category(&mut self, pill: &CategoryPill) {
        self.set_query(pill.query());
    }

    /// All posts matching the current query, in collection order
    pub fn matches(&self) -> Vec<&PostSummary> {
        self.posts
            .iter()
            .filter(|post| matches_query(post, &self.query))
            .collect()
    }

    pub fn match_count(&self) -> usize {
        self.posts
            .iter()
            .filter(|post| matches_query(post, &self.query))
            .count()
    }

    /// Number of pages, at least one even with no matches
    pub fn total_pages(&self) -> usize {
        self.match_count().div_ceil(self.page_size).max(1)
    }

    /// Move to `page`, clamped into `1..=total_pages`
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    /// Posts on the current page
    pub fn visible(&self) -> Vec<&PostSummary> {
        self.posts
            .iter()
            .filter(|post| matches_query(post, &self.query))
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Snapshot of the current page for templates
    pub fn view(&self) -> ListingPage {
        ListingPage {
            posts: self.visible().into_iter().cloned().collect(),
            query: self.query.clone(),
            current: self.page,
            total_pages: self.total_pages(),
            match_count: self.match_count(),
        }
    }
}

/// One rendered page of the listing
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub posts: Vec<PostSummary>,
    pub query: String,
    pub current: usize,
    pub total_pages: usize,
    pub match_count: usize,
}
