use anyhow::Context;
use clap::Parser;
use lesson_core::content::LessonContent;
use lesson_service::{
    client::HttpOpinionClient,
    runner::{RunOutcome, run_lesson},
};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Walk through the SNAP lesson in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Base URL of the lesson API server.
    #[arg(long, env = "LESSON_SERVER_URL", default_value = "http://localhost:3000")]
    server: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr so they don't interleave with the lesson screens.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let client = HttpOpinionClient::new(&cli.server);
    info!(endpoint = %client.endpoint(), "Starting lesson");

    let content = LessonContent::snap_junk_food();
    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    let outcome = run_lesson(&content, &client, input, &mut stdout)
        .await
        .context("Lesson terminated unexpectedly")?;

    if let RunOutcome::Abandoned(stage) = outcome {
        println!();
        println!("Lesson closed at {}. Progress is not saved.", stage.path());
    }
    Ok(())
}
