use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();

    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("tasknest server\n\nUSAGE:\n  tasknest [--http-port N] [--db-folder PATH] [--token-secret SECRET]\n\nOPTIONS:\n  --http-port N          HTTP API port (env: TASKNEST_HTTP_PORT, default 7878)\n  --db-folder PATH       Document store root folder (env: TASKNEST_DB_FOLDER, default dbs)\n  --token-secret SECRET  Token signing secret (env: TASKNEST_TOKEN_SECRET)\n");
        return Ok(());
    }

    let cfg = tasknest::config::ServerConfig::from_env_and_args(&args);

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "tasknest",
        "tasknest starting: RUST_LOG='{}', http_port={}, db_root='{}'",
        rust_log, cfg.http_port, cfg.db_root
    );

    tasknest::server::run_with_config(&cfg).await
}
