//! CLI entry point for clearsite

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clearsite::contact::ContactForm;

#[derive(Parser)]
#[command(name = "clearsite")]
#[command(version)]
#[command(about = "Marketing site and blog for Clearsite waste services", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List blog posts from the content API
    List {
        /// Free-text search over title, category and excerpt
        #[arg(short, long)]
        query: Option<String>,

        /// Category pill to apply (overrides --query)
        #[arg(long)]
        category: Option<String>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Render a single post
    Show {
        /// Slug of the post
        slug: String,
    },

    /// Submit a contact request
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        company: String,

        /// Waste Collection, Site Clearance or On-Call Pickup
        #[arg(long, default_value = "Waste Collection")]
        service: String,

        #[arg(long)]
        message: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "clearsite=debug,tower_http=debug,info"
    } else {
        "clearsite=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = clearsite::Clearsite::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            site.serve(&ip, port).await?;
        }

        Commands::List {
            query,
            category,
            page,
        } => {
            let site = clearsite::Clearsite::new(&base_dir)?;
            clearsite::commands::list::run(&site, query.as_deref(), category.as_deref(), page)
                .await?;
        }

        Commands::Show { slug } => {
            let site = clearsite::Clearsite::new(&base_dir)?;
            clearsite::commands::show::run(&site, &slug).await?;
        }

        Commands::Contact {
            name,
            phone,
            email,
            company,
            service,
            message,
        } => {
            let site = clearsite::Clearsite::new(&base_dir)?;
            let form = ContactForm {
                name,
                phone,
                email,
                company,
                service_type: service,
                message,
            };
            clearsite::commands::contact::run(&site, &form).await?;
        }

        Commands::Version => {
            println!("clearsite version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
