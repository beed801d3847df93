//! CLI entry point for cheers.

mod cli;

use cheers::api::{ApiClient, NewUser, QrSecretSource};
use cheers::config::{load_config_with_overrides, QrConfig, ENV_TOKEN};
use cheers::error::ApiError;
use cheers::logging;
use cheers::refresher::{CredentialRefresher, RefreshPolicy, RefresherPhase, RefresherSnapshot};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    let loaded =
        match load_config_with_overrides(args.config.as_deref(), args.base_url.as_deref()) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        };
    let config = loaded.config;
    logging::init(&config.log.level);
    debug!(
        source = %loaded.source,
        base_url = %config.api.base_url,
        "configuration loaded"
    );

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var(ENV_TOKEN).ok())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    if token.is_empty() {
        eprintln!("error: no bearer token; pass --token or set {ENV_TOKEN}");
        std::process::exit(1);
    }

    let client = Arc::new(ApiClient::new(&config.api, &config.retry));
    if let Err(e) = run(args.command, client, &token, &config.qr).await {
        eprintln!("error: {}", describe(e.as_ref()));
        std::process::exit(1);
    }
}

async fn run(
    command: cli::Command,
    client: Arc<ApiClient>,
    token: &str,
    qr: &QrConfig,
) -> CliResult {
    match command {
        cli::Command::Me => print_json(&client.fetch_current_user(token).await?),
        cli::Command::Signup {
            username,
            display_name,
        } => {
            let new_user = NewUser {
                username,
                display_name,
            };
            print_json(&client.fetch_or_create_user(token, &new_user).await?)
        }
        cli::Command::Search { query } => print_json(&client.search_users(token, &query).await?),
        cli::Command::Wishlist { item_id } => {
            print_json(&client.toggle_wishlist_item(token, &item_id).await?)
        }
        cli::Command::Qr { seconds } => {
            run_qr(client, token, RefreshPolicy::from_config(qr), seconds).await
        }
    }
}

/// Display the rotating secret until Ctrl-C or `seconds` elapse.
async fn run_qr(
    client: Arc<ApiClient>,
    token: &str,
    policy: RefreshPolicy,
    seconds: Option<u64>,
) -> CliResult {
    let source = Arc::new(QrSecretSource::new(client, token));
    let refresher = CredentialRefresher::new(source, policy);
    let mut updates = refresher.subscribe();
    refresher.activate();

    let deadline = async {
        match seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(deadline, ctrl_c);

    let mut shown_secret: Option<String> = None;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            () = &mut deadline => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                render_snapshot(&snapshot, &mut shown_secret)?;
            }
        }
    }

    refresher.deactivate();
    println!();
    Ok(())
}

fn render_snapshot(snapshot: &RefresherSnapshot, shown_secret: &mut Option<String>) -> CliResult {
    if snapshot.phase == RefresherPhase::Inactive {
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    if snapshot.secret != *shown_secret {
        if let Some(secret) = &snapshot.secret {
            write!(stdout, "\nqr: {secret}\n")?;
        }
        *shown_secret = snapshot.secret.clone();
    }
    if shown_secret.is_some() {
        write!(stdout, "\rexpires in {:>2}s", snapshot.countdown_secs)?;
    } else {
        write!(stdout, "\rwaiting for secret...")?;
    }
    stdout.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::EntityNotFound) => {
            "no profile found for this token; run `cheers signup <username>`".to_string()
        }
        Some(api) if api.is_timeout() => format!("request timed out: {api}"),
        _ => err.to_string(),
    }
}
