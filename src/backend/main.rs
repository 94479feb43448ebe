/**
 * Quillpress Server Entry Point
 *
 * Loads configuration, picks a store and serves the Axum app.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!("Server initialization started");

    let config = quillpress::shared::AppConfig::load()?;
    let store = quillpress::backend::server::config::load_store(&config).await?;
    let addr = config.bind_addr.clone();

    let app = quillpress::backend::server::create_app(config, store);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin quillpress-server --features ssr");
    std::process::exit(1);
}
