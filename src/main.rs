#[tokio::main]
async fn main() {
    if let Err(e) = tls_stats::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
