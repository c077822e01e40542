use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let provider_url = matches
        .get_one::<String>("provider-url")
        .cloned()
        .context("missing required argument: --provider-url")?;
    let provider_api_key = matches
        .get_one::<String>("provider-api-key")
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --provider-api-key")?;

    let frontend_url = matches
        .get_one::<String>("frontend-url")
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000".to_string());
    let login_path = matches
        .get_one::<String>("login-path")
        .cloned()
        .unwrap_or_else(|| "/admin/login".to_string());
    let bcrypt_cost = matches
        .get_one::<u32>("bcrypt-cost")
        .copied()
        .unwrap_or(crate::admin::password::DEFAULT_COST);

    Ok(Action::Server(Args {
        port,
        dsn,
        provider_url,
        provider_api_key,
        frontend_url,
        login_path,
        bcrypt_cost,
    }))
}
