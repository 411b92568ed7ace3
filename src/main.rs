mod modules;

use std::time::Duration;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use modules::scan_subdomain_takeover::ScanSubdomainTakeover;
use crate::modules::subdomain_reader::read_subdomains;

const DNS_TIMEOUT_SECONDS: u64 = 10;
const HTTP_TIMEOUT_SECONDS: u64 = 5;
const SCAN_CONCURRENCY: usize = 100;

fn init_tracing() {
    // Diagnostics go to stderr so stdout only carries scan results.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() {
    init_tracing();

    let subdomains = match read_subdomains(BufReader::new(tokio::io::stdin())).await {
        Ok(subdomains) => subdomains,
        Err(err) => {
            eprintln!("Error reading subdomains: {}", err);
            std::process::exit(1);
        }
    };
    info!(count = subdomains.len(), "subdomains loaded");

    let scanner = match ScanSubdomainTakeover::build(
        Duration::from_secs(DNS_TIMEOUT_SECONDS),
        Duration::from_secs(HTTP_TIMEOUT_SECONDS),
        Some(SCAN_CONCURRENCY),
    ) {
        Ok(scanner) => scanner,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let summary = scanner.scan_subdomains(subdomains).await;
    info!(
        scanned = summary.scanned,
        takeovers = summary.takeovers,
        failures = summary.failures,
        "scan finished"
    );
}
