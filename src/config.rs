//!
//! tasknest configuration
//! ----------------------
//! Environment-driven configuration with CLI flag overrides. The token
//! signing secret lives here and is injected into the issuer and guard at
//! startup; nothing reads it from ambient state afterwards.

use std::env;

pub const DEFAULT_HTTP_PORT: u16 = 7878;
pub const DEFAULT_DB_ROOT: &str = "dbs";
// Development fallback only; deployments set TASKNEST_TOKEN_SECRET.
pub const DEFAULT_TOKEN_SECRET: &str = "tasknest-dev-secret";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub db_root: String,
    pub token_secret: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            db_root: DEFAULT_DB_ROOT.to_string(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
        }
    }
}

fn parse_port_env(name: &str) -> Option<u16> {
    match env::var(name) {
        Ok(val) => val.parse::<u16>().ok(),
        Err(_) => None,
    }
}

fn parse_port_arg(args: &[String], flag: &str) -> Option<u16> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag
            && i + 1 < args.len() {
                return args[i + 1].parse::<u16>().ok();
            }
        i += 1;
    }
    None
}

fn parse_string_arg(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag {
            if i + 1 < args.len() { return Some(args[i + 1].clone()); }
            break;
        }
        i += 1;
    }
    None
}

impl ServerConfig {
    /// Resolve configuration from the environment, with CLI arguments
    /// overriding environment variables, overriding built-in defaults.
    pub fn from_env_and_args(args: &[String]) -> Self {
        let env_http = parse_port_env("TASKNEST_HTTP_PORT");
        let env_root = env::var("TASKNEST_DB_FOLDER").ok();
        let env_secret = env::var("TASKNEST_TOKEN_SECRET").ok();

        let arg_http = parse_port_arg(args, "--http-port");
        let arg_root = parse_string_arg(args, "--db-folder");
        let arg_secret = parse_string_arg(args, "--token-secret");

        Self {
            http_port: arg_http.or(env_http).unwrap_or(DEFAULT_HTTP_PORT),
            db_root: arg_root.or(env_root).unwrap_or_else(|| DEFAULT_DB_ROOT.to_string()),
            token_secret: arg_secret.or(env_secret).unwrap_or_else(|| DEFAULT_TOKEN_SECRET.to_string()),
        }
    }
}
