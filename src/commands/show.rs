//! Render a single post to stdout

use anyhow::Result;

use crate::content::{load_post, ContentError};
use crate::Clearsite;

/// Print the rendered body of the post with this slug
pub async fn run(site: &Clearsite, slug: &str) -> Result<()> {
    match load_post(&site.client(), slug).await {
        Ok(post) => {
            println!("{}", post.summary.title);
            println!(
                "{} | {} | {}",
                post.summary.full_date(),
                post.summary.read_time.as_deref().unwrap_or("N/A"),
                post.summary.category
            );
            println!();
            println!("{}", post.html);
            Ok(())
        }
        Err(ContentError::NotFound(slug)) => anyhow::bail!("No post with slug '{}'", slug),
        Err(e) => Err(e.into()),
    }
}
