use anyhow::Result;
use clap::Parser;
use shared::{Config, ConfigError, HackerNewsClient, InstapaperMailer, Pipeline, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hn-to-instapaper")]
#[command(about = "Send the most-discussed Hacker News articles to Instapaper")]
struct Args {
    /// Pick the stories but don't send any email
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Debug)]
enum Startup<T> {
    Ready(T),
    /// Lines to print instead of running.
    Missing(Vec<String>),
}

/// Validates the configuration and only then calls `connect`, so a missing
/// variable never reaches the network.
fn start<L, C, T>(lookup: L, connect: C) -> Result<Startup<T>>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(Config) -> Result<T>,
{
    match Config::from_lookup(lookup) {
        Ok(config) => Ok(Startup::Ready(connect(config)?)),
        Err(err) => Ok(Startup::Missing(missing_lines(&err))),
    }
}

fn missing_lines(err: &ConfigError) -> Vec<String> {
    let mut lines = vec!["Missing required environment variables:".to_string()];
    lines.extend(err.missing().iter().map(|name| format!("  - {}", name)));
    lines.push(String::new());
    lines.push("Set them in your shell or in a .env file at one of:".to_string());
    lines.extend(
        Config::dotenv_locations()
            .into_iter()
            .map(|location| format!("  {}", location)),
    );
    lines
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    Config::load_dotenv();
    let startup = start(
        |name| std::env::var(name).ok(),
        |config| Ok((HackerNewsClient::new()?, InstapaperMailer::new(&config)?)),
    )?;

    let (source, mailer) = match startup {
        Startup::Ready(clients) => clients,
        Startup::Missing(lines) => {
            for line in lines {
                println!("{}", line);
            }
            return Ok(());
        }
    };

    let settings = Settings {
        dry_run: args.dry_run,
        ..Settings::default()
    };

    let report = Pipeline::new(&source, &mailer, settings).run().await?;

    tracing::info!(
        inspected = report.inspected,
        unavailable = report.unavailable.len(),
        sent = report.sent_count(),
        failed = report.failed_count(),
        "run finished"
    );

    Ok(())
}
