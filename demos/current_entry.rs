//! Prints the running time entry, or says there is none.
//!
//! Reads the token from `TOGGL_API_TOKEN` (or a `.env` file), or from the
//! first argument. Set `DEBUG_API_ERRORS=true` to dump failed requests.
//!
//! Run with: `cargo run --example current_entry`

use togglr::{Client, Config, Error};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "togglr=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        if let Some(retry_after) = e.retry_after() {
            eprintln!("Try again in {} seconds.", retry_after);
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let token = std::env::args().nth(1);
    let client = Client::new(Config::from_env(token.as_deref(), None)?)?;

    match client.time_entries().current().await? {
        Some(entry) => {
            let description = entry.description.as_deref().unwrap_or("(no description)");
            println!("{} - {} (started {})", entry.id, description, entry.start);
        }
        None => println!("No time entry is running."),
    }

    Ok(())
}
