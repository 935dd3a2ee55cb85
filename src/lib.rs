//! clearsite: marketing site and blog for a waste-management service
//!
//! Pages are rendered on the server from embedded Tera templates. Blog
//! posts come from a headless CMS; their rich-text bodies are rendered to
//! HTML here, and the listing supports search and pagination in memory.

pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The site application
#[derive(Clone)]
pub struct Clearsite {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
}

impl Clearsite {
    /// Create a new instance from a directory, reading `_config.yml` if it
    /// exists and applying environment overrides
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self { config, base_dir })
    }

    /// Content API client for this site
    pub fn client(&self) -> content::ContentClient {
        content::ContentClient::from_config(&self.config)
    }

    /// Directory served under `/static`
    pub fn static_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.static_dir)
    }

    /// Start the site server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }
}
