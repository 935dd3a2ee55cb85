//! REST client for the headless CMS

use serde::Deserialize;
use serde_json::Value;

use super::error::{ContentError, Result};
use super::post::{ApiPost, PostSummary, RichPost};
use crate::config::{ListingSource, SiteConfig};
use crate::contact::{ContactError, ContactSubmission};

/// Paginated collection envelope returned by every list endpoint
#[derive(Debug, Deserialize)]
struct Collection<T> {
    docs: Vec<T>,
}

/// Client for the content and contact endpoints
#[derive(Debug, Clone)]
pub struct ContentClient {
    client: reqwest::Client,
    base_url: String,
    listing: ListingSource,
    listing_limit: usize,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            listing: ListingSource::BlogPosts,
            listing_limit: 100,
        }
    }

    /// Build a client from the site configuration
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.api_base()).with_listing(config.listing.source, config.listing.limit)
    }

    pub fn with_listing(mut self, source: ListingSource, limit: usize) -> Self {
        self.listing = source;
        self.listing_limit = limit.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the full collection backing the blog listing
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        match self.listing {
            ListingSource::BlogPosts => {
                let request = self.client.get(self.url("/api/blog-posts"));
                self.fetch_summaries(request).await
            }
            ListingSource::Blogs => self.latest_posts(self.listing_limit).await,
        }
    }

    /// Fetch the newest `limit` posts
    pub async fn latest_posts(&self, limit: usize) -> Result<Vec<PostSummary>> {
        let request = self
            .client
            .get(self.url("/api/blogs"))
            .query(&[("limit", limit.to_string().as_str()), ("sort", "-createdAt")]);
        self.fetch_summaries(request).await
    }

    /// Look up one post by exact slug
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<RichPost> {
        let request = self
            .client
            .get(self.url("/api/blogs"))
            .query(&[("where[slug][equals]", slug)]);

        let docs = self.fetch_docs(request).await?;
        let post = docs
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))?;

        let post: ApiPost = serde_json::from_value(post)?;
        Ok(post.into_rich_post())
    }

    /// Send a lead from the contact form
    pub async fn submit_contact(
        &self,
        submission: &ContactSubmission,
    ) -> std::result::Result<(), ContactError> {
        let url = self.url("/api/contact-submissions");
        tracing::info!(service = %submission.service_type, "Submitting contact request");

        let resp = self.client.post(&url).json(submission).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
            tracing::warn!(status = status.as_u16(), "Contact submission rejected");
            return Err(ContactError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn fetch_summaries(&self, request: reqwest::RequestBuilder) -> Result<Vec<PostSummary>> {
        let docs = self.fetch_docs(request).await?;
        let total = docs.len();

        // A record missing its required fields is dropped, not the listing
        let posts: Vec<PostSummary> = docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<ApiPost>(doc) {
                Ok(post) => Some(post.into_summary()),
                Err(e) => {
                    tracing::warn!("Skipping malformed post record: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!(count = posts.len(), total, "Fetched posts");
        Ok(posts)
    }

    /// Issue a GET and return the raw `docs` array
    async fn fetch_docs(&self, request: reqwest::RequestBuilder) -> Result<Vec<Value>> {
        let resp = request.send().await.map_err(|e| {
            tracing::warn!("Content request failed: {}", e);
            ContentError::from(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %resp.url(), "Content request returned an error status");
            return Err(ContentError::Fetch(format!(
                "status {} from {}",
                status.as_u16(),
                resp.url()
            )));
        }

        let body = resp.text().await?;
        let collection: Collection<Value> = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Unexpected content response structure: {}", e);
            ContentError::from(e)
        })?;
        Ok(collection.docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ServiceType;
    use httpmock::prelude::*;
    use serde_json::json;

    fn record(slug: &str, title: &str) -> Value {
        json!({
            "id": slug,
            "title": title,
            "excerpt": "Short teaser",
            "category": { "name": "Recycling" },
            "createdAt": "2024-02-10T12:00:00Z",
            "slug": slug
        })
    }

    #[tokio::test]
    async fn test_list_posts_from_blog_posts() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blog-posts");
                then.status(200)
                    .json_body(json!({ "docs": [record("a", "A"), record("b", "B")] }));
            })
            .await;

        let client = ContentClient::new(server.base_url());
        let posts = client.list_posts().await.unwrap();

        mock.assert_async().await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "a");
        assert_eq!(posts[1].category, "Recycling");
    }

    #[tokio::test]
    async fn test_list_posts_from_blogs_uses_limit_and_sort() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/blogs")
                    .query_param("limit", "12")
                    .query_param("sort", "-createdAt");
                then.status(200).json_body(json!({ "docs": [record("a", "A")] }));
            })
            .await;

        let client =
            ContentClient::new(server.base_url()).with_listing(ListingSource::Blogs, 12);
        let posts = client.list_posts().await.unwrap();

        mock.assert_async().await;
        assert_eq!(posts.len(), 1);
    }

    #[tokio::test]
    async fn test_odd_records_do_not_fail_the_listing() {
        let server = MockServer::start_async().await;
        let mut unpopulated = record("bulky", "Bulky Waste");
        unpopulated["image"] = json!("665f0c1e2a");
        unpopulated["category"] = json!({ "id": "abc", "title": "Recycling" });
        let mut broken = record("broken", "Broken");
        broken.as_object_mut().unwrap().remove("slug");

        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blog-posts");
                then.status(200)
                    .json_body(json!({ "docs": [record("a", "A"), unpopulated, broken] }));
            })
            .await;

        let posts = ContentClient::new(server.base_url())
            .list_posts()
            .await
            .unwrap();

        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "bulky"]);
        assert_eq!(posts[1].category, "Uncategorized");
        assert_eq!(posts[1].image, None);
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blog-posts");
                then.status(500).body("boom");
            })
            .await;

        let err = ContentClient::new(server.base_url())
            .list_posts()
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blog-posts");
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let err = ContentClient::new(server.base_url())
            .list_posts()
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Fetch(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_fetch_error() {
        // nothing listens on the discard port
        let err = ContentClient::new("http://127.0.0.1:9")
            .list_posts()
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_get_post_by_slug() {
        let server = MockServer::start_async().await;
        let mut doc = record("skip-hire", "Skip Hire");
        doc["content"] = json!({ "root": { "children": [
            { "type": "paragraph", "children": [{ "type": "text", "text": "Hi", "format": 1 }] }
        ] } });

        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/blogs")
                    .query_param("where[slug][equals]", "skip-hire");
                then.status(200).json_body(json!({ "docs": [doc] }));
            })
            .await;

        let post = ContentClient::new(server.base_url())
            .get_post_by_slug("skip-hire")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(post.summary.title, "Skip Hire");
        assert_eq!(post.render().html, "<p><strong>Hi</strong></p>");
    }

    #[tokio::test]
    async fn test_missing_slug_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/blogs")
                    .query_param("where[slug][equals]", "missing-slug");
                then.status(200).json_body(json!({ "docs": [] }));
            })
            .await;

        let err = ContentClient::new(server.base_url())
            .get_post_by_slug("missing-slug")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound(ref slug) if slug == "missing-slug"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_submit_contact() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/contact-submissions")
                    .json_body(json!({
                        "name": "Ada",
                        "phone": "0123",
                        "email": "ada@example.com",
                        "serviceType": "Site Clearance",
                        "message": "Need a skip",
                        "status": "new"
                    }));
                then.status(201).json_body(json!({ "doc": { "id": "1" } }));
            })
            .await;

        let submission = ContactSubmission {
            name: "Ada".to_string(),
            phone: "0123".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            service_type: ServiceType::SiteClearance,
            message: "Need a skip".to_string(),
            status: "new".to_string(),
        };

        ContentClient::new(server.base_url())
            .submit_contact(&submission)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_contact_surfaces_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contact-submissions");
                then.status(400)
                    .json_body(json!({ "message": "Email is invalid" }));
            })
            .await;

        let submission = ContactSubmission {
            name: "Ada".to_string(),
            phone: "0123".to_string(),
            email: "ada@example.com".to_string(),
            company: Some("Analytical Ltd".to_string()),
            service_type: ServiceType::WasteCollection,
            message: "Hello".to_string(),
            status: "new".to_string(),
        };

        let err = ContentClient::new(server.base_url())
            .submit_contact(&submission)
            .await
            .unwrap_err();
        match err {
            ContactError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Email is invalid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
