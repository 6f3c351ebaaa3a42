use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dotview::{router, AppState, Args, Config};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dotview=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(
                "Failed to resolve repository directory '{}': {}. Exiting.",
                args.repo_dir.display(),
                e
            );
            eprintln!(
                "Error: Failed to resolve repository directory '{}': {}",
                args.repo_dir.display(),
                e
            );
            std::process::exit(1);
        }
    };

    info!("Serving repository: {}", config.repo_root.display());
    info!("Listening on: {}", args.bind_addr);

    let app = router(AppState::new(config));

    let listener = match tokio::net::TcpListener::bind(args.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to address {}: {}", args.bind_addr, e);
            eprintln!("Error: Failed to bind to address {}: {}", args.bind_addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
