//! Grantdesk HTTP server binary.
//!
//! Start the server with:
//! ```bash
//! GRANTDESK_TOKENS=/etc/grantdesk/tokens.json cargo run -p grantdesk-server -- -v
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use grantdesk_api::{serve, ApiConfig, AppState};
use grantdesk_core::{config, LogNotifier, Notifier, TokenFileAuthenticator, WebhookNotifier};
use tracing_subscriber::EnvFilter;

/// Grantdesk - grant proposal lifecycle API
#[derive(Parser, Debug)]
#[command(name = "grantdesk-server")]
#[command(about = "JSON API for calls, proposals, and reviews")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "GRANTDESK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, env = "GRANTDESK_PORT", default_value = "8790")]
    port: u16,

    /// Data directory (default: ~/.grantdesk/data)
    #[arg(long, env = "GRANTDESK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Token file mapping bearer tokens to identities
    #[arg(long, env = "GRANTDESK_TOKENS")]
    tokens: Option<PathBuf>,

    /// Email relay URL; notifications are only logged when unset
    #[arg(long, env = "GRANTDESK_NOTIFY_WEBHOOK")]
    notify_webhook: Option<String>,

    /// Requests per client per window (0 disables)
    #[arg(long, env = "GRANTDESK_RATE_LIMIT", default_value = "120")]
    rate_limit: u32,

    /// Rate-limit window in seconds
    #[arg(long, env = "GRANTDESK_RATE_WINDOW", default_value = "60")]
    rate_window: u64,

    /// Rate-limit by X-Forwarded-For (only behind a trusted reverse proxy)
    #[arg(long, env = "GRANTDESK_TRUST_PROXY")]
    trust_proxy: bool,

    /// Allowed CORS origins, comma separated (`*` for any)
    #[arg(long, env = "GRANTDESK_CORS", value_delimiter = ',', default_value = "*")]
    cors: Vec<String>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.host, self.port)
            .with_cors_origins(self.cors.clone())
            .with_rate_limit(self.rate_limit, Duration::from_secs(self.rate_window))
            .with_trust_forwarded_for(self.trust_proxy)
    }

    fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "grantdesk_server=info,grantdesk_api=info,tower_http=warn",
            1 => "grantdesk_server=debug,grantdesk_api=debug,grantdesk_core=debug,tower_http=info",
            2 => "grantdesk_server=trace,grantdesk_api=trace,grantdesk_core=trace,grantdesk_persistence=trace,tower_http=debug",
            _ => "trace",
        }
    }
}

fn build_notifier(webhook: Option<&str>) -> Result<Arc<dyn Notifier>, Box<dyn std::error::Error>> {
    match webhook {
        Some(url) => {
            let notifier = WebhookNotifier::new(url, Duration::from_secs(10))?;
            tracing::info!(url = %notifier.url(), "Relaying notifications to webhook");
            Ok(Arc::new(notifier))
        }
        None => Ok(Arc::new(LogNotifier)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before parsing so env fallbacks see it
    config::load_env();
    let args = Args::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(args.log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let data_dir = args.data_dir.clone().unwrap_or_else(config::data_dir);
    config::ensure_dir(&data_dir)?;

    let tokens_path = args.tokens.clone().unwrap_or_else(config::tokens_file);
    let authenticator = match TokenFileAuthenticator::load(&tokens_path) {
        Ok(auth) => auth,
        Err(e) => {
            tracing::error!(path = %tokens_path.display(), error = %e, "Failed to load token file");
            return Err(e.into());
        }
    };
    if authenticator.is_empty() {
        tracing::warn!(path = %tokens_path.display(), "Token file has no entries; only anonymous access will work");
    }

    let notifier = build_notifier(args.notify_webhook.as_deref())?;
    let config = args.api_config();

    tracing::info!(
        data_dir = %data_dir.display(),
        rate_limit = config.rate_limit,
        "Starting Grantdesk"
    );

    let state = AppState::new(config.clone(), data_dir, Arc::new(authenticator))
        .with_notifier(notifier);
    serve(config, state).await?;

    Ok(())
}
