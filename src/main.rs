use adminpanel::{config::Config, panel::AdminPanel, Record};
use anyhow::{bail, Result};
use std::env;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: adminpanel <accounts|users> [SEARCH]\n       adminpanel reset-password <USERNAME>";

fn print_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<usize> {
    let mut n = 0;
    for record in records {
        println!("{}", serde_json::to_string(record)?);
        n += 1;
    }
    Ok(n)
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) parse args ───────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let command = match args.next() {
        Some(c) => c,
        None => bail!(USAGE),
    };
    let rest: Vec<String> = args.collect();

    // ─── 3) configure client ─────────────────────────────────────────
    let config = Config::from_env()?;
    let mut panel = AdminPanel::from_config(&config)?;
    if panel.api().is_demo() {
        info!(data_path = %config.data_path, "running against static demo data");
    }

    // ─── 4) run ──────────────────────────────────────────────────────
    match command.as_str() {
        "accounts" => {
            let search = rest.join(" ");
            if let Err(e) = panel.load_accounts(None).await {
                error!(error = %e, "loading accounts failed");
                return Err(e.into());
            }
            let shown = print_records(panel.accounts().filtered(&search))?;
            info!(shown, total = panel.accounts().len(), "done");
        }
        "users" => {
            let search = rest.join(" ");
            if let Err(e) = panel.load_users(None).await {
                error!(error = %e, "loading users failed");
                return Err(e.into());
            }
            let shown = print_records(panel.visible_users(&search))?;
            info!(shown, total = panel.users().len(), "done");
        }
        "reset-password" => {
            let username = match rest.first() {
                Some(u) => u,
                None => bail!(USAGE),
            };
            let password = panel.reset_password(username).await?;
            println!("{}", password);
        }
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }

    Ok(())
}
