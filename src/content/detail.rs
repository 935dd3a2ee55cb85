//! Post detail: slug lookup followed by rendering

use super::client::ContentClient;
use super::error::Result;
use super::post::RenderedPost;

/// Fetch the post with exactly this slug and render its body.
///
/// The slug is passed through untouched; matching is case-sensitive.
pub async fn load_post(client: &ContentClient, slug: &str) -> Result<RenderedPost> {
    tracing::debug!(slug, "Loading post");
    let post = client.get_post_by_slug(slug).await?;
    Ok(post.render())
}
