//! List blog posts from the content API

use anyhow::Result;

use crate::content::{CategoryPill, Listing, ListingPage};
use crate::Clearsite;

/// Print one page of the blog listing
pub async fn run(
    site: &Clearsite,
    query: Option<&str>,
    category: Option<&str>,
    page: usize,
) -> Result<()> {
    let posts = site.client().list_posts().await?;
    let mut listing = Listing::with_page_size(posts, site.config.page_size());

    if let Some(category) = category {
        listing.select_category(&CategoryPill::from_label(category));
    } else if let Some(query) = query {
        listing.set_query(query);
    }
    listing.go_to(page);

    print!("{}", format_page(&listing.view()));
    Ok(())
}

fn format_page(page: &ListingPage) -> String {
    let mut out = if page.query.is_empty() {
        format!("Posts ({}):\n", page.match_count)
    } else {
        format!("Posts matching {:?} ({}):\n", page.query, page.match_count)
    };

    for post in &page.posts {
        out.push_str(&format!(
            "  {} - {} [{}] /blog/{}\n",
            post.display_date(),
            post.title,
            post.category,
            post.slug
        ));
    }

    out.push_str(&format!("Page {} of {}\n", page.current, page.total_pages));
    out
}
