use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub db_max_connections: u32,
    pub listen_addr: String,
    pub frontend_dir: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    /// A `.env` file in the working directory is read first, if present.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Self {
            db_path: get_env("DB_PATH", "/data/netconfig.db"),
            db_max_connections: get_env("DB_MAX_CONNECTIONS", "5")
                .parse()
                .unwrap_or(5),
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:3000"),
            frontend_dir: get_env("FRONTEND_DIR", "/app/frontend"),
            jwt_secret: get_env("JWT_SECRET", ""),
            token_ttl_hours: get_env("TOKEN_TTL_HOURS", "24").parse().unwrap_or(24),
            bcrypt_cost: get_env("BCRYPT_COST", "10").parse().unwrap_or(10),
        }
    }

    /// Settings for tests: in-memory database, fixed secret, cheapest bcrypt cost
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            db_path: ":memory:".to_string(),
            db_max_connections: 1,
            listen_addr: "127.0.0.1:0".to_string(),
            frontend_dir: "frontend".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: 4,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
