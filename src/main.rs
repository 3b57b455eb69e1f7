// Entrypoint for the CLI application.
// - Keeps `main` small: load `.env`, set up logging, hand fresh view state
//   to the UI loop.
// - Returns `anyhow::Result` to simplify error handling at the edge.

use tracing_subscriber::EnvFilter;

use tweetpost_cli::{form::FormState, ui};

fn main() -> anyhow::Result<()> {
    // Credentials may live in a local .env file; missing file is fine.
    dotenv::dotenv().ok();

    // Log to stderr so debug output does not garble the form.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // All state starts at defaults; a restart is the only reset.
    ui::run(FormState::new())
}
