use std::env;
use std::io;

/// Runtime settings read from the process environment (and `.env` via `dotenv`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub server_port: u16,
    pub server_host: String,
}

fn required(name: &str) -> io::Result<String> {
    env::var(name).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{} must be set", name))
    })
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> io::Result<T> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} must be a number, got {:?}", name, raw),
            )
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> io::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            server_port: parsed_or("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
