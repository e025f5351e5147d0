//! Container health-check command.
//!
//! Invoked by the container runtime's HEALTHCHECK: performs a single GET
//! against the local health probe and exits 0 on HTTP 200, 1 otherwise.
//! Kept deliberately tiny so a wedged server cannot stall the check: the
//! request carries its own timeout, well under the orchestrator's.

use std::process::ExitCode;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{port}/api/v1/health/");

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("healthcheck: failed to build client: {e}");
            return ExitCode::FAILURE;
        }
    };

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => ExitCode::SUCCESS,
        Ok(response) => {
            eprintln!("healthcheck: {url} returned {}", response.status());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("healthcheck: {url} unreachable: {e}");
            ExitCode::FAILURE
        }
    }
}
