//! Site server: server-side rendered pages backed by the content API

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::contact::{ContactError, ContactForm};
use crate::content::{load_post, CategoryPill, ContentClient, ContentError, Listing};
use crate::templates::{MessageData, TemplateRenderer, SITE_CSS};
use crate::Clearsite;

/// Server state, immutable and shared by every request
struct ServerState {
    config: SiteConfig,
    client: ContentClient,
    templates: TemplateRenderer,
}

type SharedState = Arc<ServerState>;

/// Start the site server
pub async fn start(site: &Clearsite, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        config: site.config.clone(),
        client: site.client(),
        templates: TemplateRenderer::new()?,
    });

    let app = router(state, site.static_dir());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Content API: {}", site.config.api_base());
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: SharedState, static_dir: PathBuf) -> Router {
    let mut app = Router::new()
        .route("/", get(home_handler))
        .route("/blogs", get(blogs_handler))
        .route("/blog/:slug", get(post_handler))
        .route(
            "/about",
            get(|s: State<SharedState>| static_handler(s, "about.html", "/about")),
        )
        .route(
            "/terms",
            get(|s: State<SharedState>| static_handler(s, "terms.html", "/terms")),
        )
        .route(
            "/terms-of-service",
            get(|s: State<SharedState>| {
                static_handler(s, "terms_of_service.html", "/terms-of-service")
            }),
        )
        .route(
            "/cookies-policy",
            get(|s: State<SharedState>| {
                static_handler(s, "cookies_policy.html", "/cookies-policy")
            }),
        )
        .route("/contact", post(contact_handler))
        .route("/assets/site.css", get(css_handler));

    if static_dir.is_dir() {
        tracing::debug!("Serving static files from {:?}", static_dir);
        app = app.nest_service("/static", ServeDir::new(static_dir));
    }

    app.fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query string of the blog listing
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingParams {
    q: Option<String>,
    category: Option<String>,
    page: Option<String>,
}

impl ListingParams {
    /// Apply search, pill and page to a freshly loaded listing.
    ///
    /// A category pill takes precedence over a typed query; the page is
    /// applied last so the query reset does not discard it.
    fn apply(&self, listing: &mut Listing) {
        if let Some(category) = &self.category {
            listing.select_category(&CategoryPill::from_label(category));
        } else if let Some(q) = &self.q {
            listing.set_query(q.trim());
        }

        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1);
        listing.go_to(page);
    }
}

async fn home_handler(State(state): State<SharedState>) -> Response {
    let latest = match state.client.latest_posts(state.config.latest_limit).await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::warn!("Latest posts unavailable: {}", e);
            Vec::new()
        }
    };

    page_response(StatusCode::OK, state.templates.home(&state.config, &latest))
}

async fn blogs_handler(
    State(state): State<SharedState>,
    Query(params): Query<ListingParams>,
    uri: Uri,
) -> Response {
    // One fetch per listing load; search and paging run on the result
    let posts = match state.client.list_posts().await {
        Ok(posts) => posts,
        Err(e) => return content_error_response(&state, &e, retry_link(&uri)),
    };

    let mut listing = Listing::with_page_size(posts, state.config.page_size());
    params.apply(&mut listing);

    page_response(
        StatusCode::OK,
        state.templates.blogs(&state.config, &listing.view()),
    )
}

async fn post_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Response {
    match load_post(&state.client, &slug).await {
        Ok(post) => page_response(StatusCode::OK, state.templates.post(&state.config, &post)),
        Err(e) => content_error_response(&state, &e, retry_link(&uri)),
    }
}

/// Retrying is a plain reload of the same URL
fn retry_link(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

async fn static_handler(
    State(state): State<SharedState>,
    template: &'static str,
    path: &'static str,
) -> Response {
    page_response(
        StatusCode::OK,
        state
            .templates
            .static_page(&state.config, template, path),
    )
}

async fn contact_handler(
    State(state): State<SharedState>,
    Form(form): Form<ContactForm>,
) -> Response {
    let result = match form.validate() {
        Ok(submission) => state.client.submit_contact(&submission).await,
        Err(e) => Err(e),
    };

    let (status, message) = match result {
        Ok(()) => (
            StatusCode::OK,
            MessageData::success(
                "Thank you!",
                "Your request has been received. Our team will contact you shortly.",
            ),
        ),
        Err(e) => {
            tracing::info!("Contact submission failed: {}", e);
            (
                contact_error_status(&e),
                MessageData::error(
                    "We couldn't send your request",
                    &e.user_message(),
                    Some("/#contact-us".to_string()),
                ),
            )
        }
    };

    page_response(status, state.templates.message(&state.config, &message))
}

/// Rejections of the lead itself are 422; an unreachable or failing CMS is 502
fn contact_error_status(err: &ContactError) -> StatusCode {
    match err {
        ContactError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ContactError::Rejected { status, .. } if *status < 500 => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ContactError::Rejected { .. } | ContactError::Network(_) => StatusCode::BAD_GATEWAY,
    }
}

async fn css_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], SITE_CSS)
}

async fn not_found_handler(State(state): State<SharedState>) -> Response {
    let message = MessageData::error(
        "Page Not Found",
        "The page you are looking for doesn't exist.",
        None,
    );
    page_response(
        StatusCode::NOT_FOUND,
        state.templates.message(&state.config, &message),
    )
}

fn content_error_response(state: &ServerState, err: &ContentError, retry: String) -> Response {
    let status = match err {
        ContentError::NotFound(_) => StatusCode::NOT_FOUND,
        ContentError::Fetch(_) => {
            tracing::error!("Content fetch failed: {}", err);
            StatusCode::BAD_GATEWAY
        }
    };

    let retry = err.is_retryable().then_some(retry);
    let message = MessageData::error(err.title(), err.user_message(), retry);
    page_response(status, state.templates.message(&state.config, &message))
}

fn page_response(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template rendering failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::content::PostSummary;

    fn listing(n: usize) -> Listing {
        let posts = (1..=n)
            .map(|i| PostSummary {
                id: i.to_string(),
                title: format!("Recycling guide {}", i),
                excerpt: String::new(),
                category: "Recycling".to_string(),
                date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
                slug: format!("guide-{}", i),
                read_time: None,
                image: None,
            })
            .collect();
        Listing::with_page_size(posts, 6)
    }

    #[test]
    fn test_params_query_and_page() {
        let params = ListingParams {
            q: Some(" recycling ".to_string()),
            category: None,
            page: Some("2".to_string()),
        };
        let mut l = listing(13);
        params.apply(&mut l);
        assert_eq!(l.query(), "recycling");
        assert_eq!(l.current_page(), 2);
    }

    #[test]
    fn test_params_invalid_page_clamps() {
        let mut l = listing(13);
        ListingParams {
            page: Some("-4".to_string()),
            ..Default::default()
        }
        .apply(&mut l);
        assert_eq!(l.current_page(), 1);

        ListingParams {
            page: Some("99".to_string()),
            ..Default::default()
        }
        .apply(&mut l);
        assert_eq!(l.current_page(), 3);
    }

    #[test]
    fn test_retry_link_keeps_query() {
        let uri: Uri = "/blogs?q=eco&page=2".parse().unwrap();
        assert_eq!(retry_link(&uri), "/blogs?q=eco&page=2");
    }

    fn state(base_url: &str) -> SharedState {
        Arc::new(ServerState {
            config: SiteConfig::default(),
            client: ContentClient::new(base_url),
            templates: TemplateRenderer::new().unwrap(),
        })
    }

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn contact_form() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            phone: "0123".to_string(),
            email: "ada@example.com".to_string(),
            message: "Need a skip".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_listing_fetch_failure_is_bad_gateway_with_retry() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blog-posts");
                then.status(500).body("boom");
            })
            .await;

        let params = ListingParams {
            q: Some("eco".to_string()),
            ..Default::default()
        };
        let uri: Uri = "/blogs?q=eco".parse().unwrap();
        let resp = blogs_handler(State(state(&server.base_url())), Query(params), uri).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = body_text(resp).await;
        assert!(body.contains(r#"href="/blogs?q=eco">Try Again</a>"#));
    }

    #[tokio::test]
    async fn test_listing_renders_matching_posts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blog-posts");
                then.status(200).json_body(json!({ "docs": [
                    {
                        "id": "1",
                        "title": "Eco-Friendly Waste Disposal",
                        "createdAt": "2024-03-05T10:00:00Z",
                        "slug": "eco-friendly"
                    },
                    {
                        "id": "2",
                        "title": "Permit Checklist",
                        "createdAt": "2024-03-06T10:00:00Z",
                        "slug": "permit-checklist"
                    }
                ] }));
            })
            .await;

        let params = ListingParams {
            q: Some("eco".to_string()),
            ..Default::default()
        };
        let uri: Uri = "/blogs?q=eco".parse().unwrap();
        let resp = blogs_handler(State(state(&server.base_url())), Query(params), uri).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("Eco-Friendly Waste Disposal"));
        assert!(!body.contains("Permit Checklist"));
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found_without_retry() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/blogs")
                    .query_param("where[slug][equals]", "missing-slug");
                then.status(200).json_body(json!({ "docs": [] }));
            })
            .await;

        let uri: Uri = "/blog/missing-slug".parse().unwrap();
        let resp = post_handler(
            State(state(&server.base_url())),
            Path("missing-slug".to_string()),
            uri,
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(!body_text(resp).await.contains("Try Again"));
    }

    #[tokio::test]
    async fn test_post_fetch_failure_is_bad_gateway_with_retry() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blogs");
                then.status(503);
            })
            .await;

        let uri: Uri = "/blog/skip-hire".parse().unwrap();
        let resp = post_handler(
            State(state(&server.base_url())),
            Path("skip-hire".to_string()),
            uri,
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = body_text(resp).await;
        assert!(body.contains(r#"href="/blog/skip-hire">Try Again</a>"#));
    }

    #[tokio::test]
    async fn test_home_renders_when_content_api_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/blogs");
                then.status(500);
            })
            .await;

        let resp = home_handler(State(state(&server.base_url()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!body_text(resp).await.contains("latest-posts"));
    }

    #[tokio::test]
    async fn test_contact_validation_is_unprocessable() {
        let form = ContactForm {
            email: "not-an-email".to_string(),
            ..contact_form()
        };
        let resp = contact_handler(State(state("http://127.0.0.1:9")), Form(form)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_contact_upstream_failures_are_bad_gateway() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contact-submissions");
                then.status(500);
            })
            .await;

        let resp = contact_handler(State(state(&server.base_url())), Form(contact_form())).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        // nothing listens on the discard port
        let resp = contact_handler(State(state("http://127.0.0.1:9")), Form(contact_form())).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_contact_error_status() {
        let rejected = |status| ContactError::Rejected {
            status,
            message: None,
        };
        assert_eq!(
            contact_error_status(&rejected(400)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(contact_error_status(&rejected(502)), StatusCode::BAD_GATEWAY);
        assert_eq!(
            contact_error_status(&ContactError::Network("refused".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_params_category_pill() {
        let mut l = listing(3);
        ListingParams {
            q: Some("ignored".to_string()),
            category: Some("All Topics".to_string()),
            page: None,
        }
        .apply(&mut l);
        assert_eq!(l.query(), "");
        assert_eq!(l.match_count(), 3);
    }
}
