//! Content module - blog posts from the headless CMS, rich-text rendering
//! and the searchable listing

mod client;
mod detail;
mod error;
pub mod listing;
mod post;
pub mod richtext;

pub use client::ContentClient;
pub use detail::load_post;
pub use error::{ContentError, Result};
pub use listing::{CategoryPill, Listing, ListingPage};
pub use post::{estimate_read_time, PostSummary, RenderedPost, RichPost};
pub use richtext::{render, RichDocument};
