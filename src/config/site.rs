//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `api_url`
pub const API_URL_ENV: &str = "CLEARSITE_API_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub url: String,

    // Content API
    pub api_url: String,
    #[serde(default)]
    pub listing: ListingConfig,
    pub latest_limit: usize,

    // Blog listing
    pub per_page: usize,
    pub categories: Vec<String>,

    // Assets
    pub static_dir: String,

    #[serde(default)]
    pub company: CompanyConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Clearsite".to_string(),
            description: "Waste collection, site clearance and on-call pickup".to_string(),
            url: "http://localhost:4000".to_string(),

            api_url: String::new(),
            listing: ListingConfig::default(),
            latest_limit: 3,

            per_page: 6,
            categories: vec![
                "All Topics".to_string(),
                "Waste Management".to_string(),
                "Sustainability".to_string(),
                "Services".to_string(),
                "Compliance".to_string(),
                "Recycling".to_string(),
            ],

            static_dir: "static".to_string(),
            company: CompanyConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_api_url_override(std::env::var(API_URL_ENV).ok());
    }

    fn apply_api_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Using content API from {}: {}", API_URL_ENV, url);
            self.api_url = url;
        }
    }

    /// Base URL every content request is resolved against.
    ///
    /// An unset API URL means same-origin, i.e. the site's own `url`.
    pub fn api_base(&self) -> &str {
        let base = if self.api_url.trim().is_empty() {
            &self.url
        } else {
            &self.api_url
        };
        base.trim_end_matches('/')
    }

    /// Listing page size, never zero
    pub fn page_size(&self) -> usize {
        self.per_page.max(1)
    }
}

/// Which collection endpoint backs the blog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingSource {
    /// `GET /api/blog-posts`
    BlogPosts,
    /// `GET /api/blogs?limit=N&sort=-createdAt`
    Blogs,
}

/// Blog listing endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub source: ListingSource,
    pub limit: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            source: ListingSource::BlogPosts,
            limit: 100,
        }
    }
}

/// Contact details shown in the footer and contact section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            phone: "+1 (555) 010-2030".to_string(),
            email: "hello@clearsite.example".to_string(),
            address: "Clearsite Services".to_string(),
        }
    }
}
