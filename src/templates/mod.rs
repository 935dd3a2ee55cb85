//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::contact::ServiceType;
use crate::content::{ListingPage, PostSummary, RenderedPost};
use crate::helpers::{category_pills, date_xml, html_escape, paginator, truncate};

/// Stylesheet served at `/assets/site.css`
pub const SITE_CSS: &str = include_str!("site/site.css");

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is explicit through the `esc` filter; tera's built-in
        // escaper also rewrites `/`, which breaks links
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("blogs.html", include_str!("site/blogs.html")),
            ("post.html", include_str!("site/post.html")),
            ("about.html", include_str!("site/about.html")),
            ("terms.html", include_str!("site/terms.html")),
            (
                "terms_of_service.html",
                include_str!("site/terms_of_service.html"),
            ),
            (
                "cookies_policy.html",
                include_str!("site/cookies_policy.html"),
            ),
            ("message.html", include_str!("site/message.html")),
            // Partials
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
            (
                "partials/contact_form.html",
                include_str!("site/partials/contact_form.html"),
            ),
        ])?;

        tera.register_filter("esc", esc_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Base context shared by every page
    pub fn base_context(&self, config: &SiteConfig, path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from_config(config));
        context.insert("current_path", path);
        context.insert("services", &service_labels());
        context
    }

    pub fn home(&self, config: &SiteConfig, latest: &[PostSummary]) -> Result<String> {
        let mut context = self.base_context(config, "/");
        let posts: Vec<PostData> = latest.iter().map(PostData::from).collect();
        context.insert("posts", &posts);
        self.render("home.html", &context)
    }

    pub fn blogs(&self, config: &SiteConfig, page: &ListingPage) -> Result<String> {
        let mut context = self.base_context(config, "/blogs");
        let posts: Vec<PostData> = page.posts.iter().map(PostData::from).collect();
        context.insert("posts", &posts);
        context.insert("query", &page.query);
        context.insert("match_count", &page.match_count);
        context.insert(
            "pagination",
            &paginator(
                page.current,
                page.total_pages,
                &page.query,
                "Previous",
                "Next",
                2,
            ),
        );
        context.insert("pills", &category_pills(&config.categories, &page.query));
        self.render("blogs.html", &context)
    }

    pub fn post(&self, config: &SiteConfig, post: &RenderedPost) -> Result<String> {
        let mut context = self.base_context(config, &post.summary.path());
        context.insert("post", &PostData::from(&post.summary));
        context.insert("content", &post.html);
        self.render("post.html", &context)
    }

    /// Render one of the static pages (about, legal)
    pub fn static_page(&self, config: &SiteConfig, template: &str, path: &str) -> Result<String> {
        let context = self.base_context(config, path);
        self.render(template, &context)
    }

    pub fn message(&self, config: &SiteConfig, message: &MessageData) -> Result<String> {
        let mut context = self.base_context(config, "");
        context.insert("message", message);
        self.render("message.html", &context)
    }
}

fn service_labels() -> Vec<&'static str> {
    ServiceType::ALL.iter().map(|s| s.label()).collect()
}

/// Tera filter: HTML-escape a string
fn esc_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::String(s) => s.clone(),
        tera::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(html_escape(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };

    Ok(tera::Value::String(truncate(&s, length, Some("…"))))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub year: i32,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        use chrono::Datelike;

        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            phone: config.company.phone.clone(),
            email: config.company.email.clone(),
            address: config.company.address.clone(),
            year: chrono::Utc::now().year(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub date: String,
    pub full_date: String,
    pub datetime: String,
    pub path: String,
    pub read_time: String,
    pub image: Option<String>,
}

impl From<&PostSummary> for PostData {
    fn from(post: &PostSummary) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            date: post.display_date(),
            full_date: post.full_date(),
            datetime: date_xml(&post.date),
            path: post.path(),
            read_time: post.read_time.clone().unwrap_or_else(|| "N/A".to_string()),
            image: post.image.clone(),
        }
    }
}

/// A full-page notice: errors, not found, contact confirmation
#[derive(Debug, Clone, Serialize)]
pub struct MessageData {
    pub title: String,
    pub body: String,
    /// Link for a "Try again" button
    pub retry: Option<String>,
    pub success: bool,
}

impl MessageData {
    pub fn error(title: &str, body: &str, retry: Option<String>) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            retry,
            success: false,
        }
    }

    pub fn success(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            retry: None,
            success: true,
        }
    }
}
