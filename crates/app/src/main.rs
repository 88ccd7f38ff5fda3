mod event_loop;
mod settings;
mod terminal;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use settings::{AppSettings, Args, FileSettings};

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let file = FileSettings::load(&args.config)?;
    let settings = AppSettings::resolve(args, file);

    let bank = settings::load_bank(settings.bank.as_deref())?;
    info!(
        questions = bank.len(),
        seconds_per_question = settings.seconds_per_question,
        "question bank loaded"
    );

    event_loop::run(settings, bank).await
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never interleave with the quiz on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
