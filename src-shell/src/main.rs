//! Bankers Realm - headless dashboard shell
//!
//! Reads one command per line from stdin and answers each with a JSON line
//! on stdout. Logs go to stderr through `RUST_LOG`.

mod commands;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use commands::{Command, Shell};
use realm_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    realm_core::init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let shell = Shell::open(config).context("Failed to open dashboard")?;

    if let Some(username) = shell.dashboard.login_handler().remembered_username() {
        tracing::info!(username = %username, "Remembered user");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let reply = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => commands::dispatch(&shell, command).await,
            Err(e) => commands::CommandResult::err(e),
        };

        let mut out = serde_json::to_string(&reply)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    shell.dashboard.shutdown();
    Ok(())
}
