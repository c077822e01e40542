use crate::{
    admin::{store::PgAdminStore, AdminGate, GateConfig},
    cli::telemetry,
    provider::GoTrueProvider,
    tripgate,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub provider_url: String,
    pub provider_api_key: SecretString,
    pub frontend_url: String,
    pub login_path: String,
    pub bcrypt_cost: u32,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable, the schema cannot be
/// applied, the provider URL is invalid, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&args.dsn)
        .await
        .context("Failed to connect to database")?;

    let store = PgAdminStore::new(pool);
    store.ensure_schema().await?;

    let provider = GoTrueProvider::new(&args.provider_url, args.provider_api_key)?;

    let config = GateConfig::new()
        .with_bcrypt_cost(args.bcrypt_cost)
        .with_login_path(args.login_path)
        .with_session_cookie_secure(is_https(&args.frontend_url));

    let gate = Arc::new(
        AdminGate::new(config, Arc::new(store), Arc::new(provider))
            .context("Failed to build admin gate")?,
    );

    let result = tripgate::new(args.port, gate, &args.frontend_url).await;

    telemetry::shutdown_tracer();

    result
}

fn is_https(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| parsed.scheme() == "https")
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("dsn", redact_dsn(&args.dsn)),
        ("provider_url", args.provider_url.clone()),
        ("frontend_url", args.frontend_url.clone()),
        ("login_path", args.login_path.clone()),
        ("bcrypt_cost", args.bcrypt_cost.to_string()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} ({})\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
