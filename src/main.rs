//! expiry-kit - watch an expiring session from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expiry_kit::app::{App, AppResult};
use expiry_kit::config::Config;
use expiry_kit::platform::{BrowserNavigator, Navigator};
use expiry_kit::screens::watch::WatchTarget;
use expiry_kit::services::{host_locale, DateFormatter};

/// expiry-kit - session expiry companion
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default: ~/.config/expiry-kit/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Application origin used for links and navigation
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a live countdown with copyable share links
    Watch {
        /// Expiry timestamp (RFC 3339, or ISO-8601 local time)
        #[arg(long)]
        expires_at: String,

        /// Public id, shared as {base}/p/{id}
        #[arg(long)]
        public_id: Option<String>,

        /// Private id, kept as {base}/r/{id}
        #[arg(long)]
        private_id: Option<String>,

        /// Open the browser when the session expires
        #[arg(long)]
        open: bool,
    },
    /// Print a timestamp in medium date, short time style
    FormatDate {
        /// Timestamp to format
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let filter = if args.debug {
        "expiry_kit=debug,info"
    } else {
        "expiry_kit=info,warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = if let Some(path) = args.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    if let Some(base_url) = args.base_url {
        config.app.base_url = base_url;
    }

    match args.command {
        Command::FormatDate { input } => {
            let formatter = DateFormatter::new(
                config.display.date_format.clone(),
                host_locale(config.display.locale.as_deref()),
            );
            println!("{}", formatter.format(&input));
        }
        Command::Watch {
            expires_at,
            public_id,
            private_id,
            open,
        } => {
            let target = WatchTarget {
                expires_at,
                public_id,
                private_id,
            };
            let base_url = config.app.base_url.clone();

            let mut app = App::new(config, target);
            match app.run().await? {
                AppResult::Exit => {}
                AppResult::Navigated { path } => {
                    let navigator = BrowserNavigator::new(base_url);
                    println!("Session expired, returning to {}", navigator.url_for(&path));
                    if open {
                        navigator.navigate(&path);
                    }
                }
            }
        }
    }

    Ok(())
}
