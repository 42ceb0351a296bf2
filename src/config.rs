use std::env;

/// Runtime configuration, read once at startup. `main` loads `.env` first,
/// so local values can live there.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub identity_url: String,
    pub generate_url: String,
    pub checkout_url: String,
    pub checkout_secret: String,
    pub session_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .unwrap_or(8080),
            database_url: required("DATABASE_URL"),
            identity_url: required("IDENTITY_URL"),
            generate_url: required("GENERATE_URL"),
            checkout_url: required("CHECKOUT_URL"),
            checkout_secret: required("CHECKOUT_SECRET"),
            session_secret: env::var("SESSION_SECRET").ok(),
        }
    }
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}
