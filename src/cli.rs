use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "resource-api")]
#[command(about = "Owner-scoped resource REST API")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Port to listen on (overrides API_PORT / PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Address to bind (overrides API_HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "PostgreSQL connection URL (overrides DATABASE_URL / DB_URI)")]
    pub database_url: Option<String>,

    #[arg(long, help = "Keep resources in process memory instead of PostgreSQL")]
    pub in_memory: bool,
}

impl Cli {
    /// Flags take precedence over the environment.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "resource-api",
            "--port",
            "9999",
            "--database-url",
            "postgres://db/resources",
        ])
        .unwrap();
        let mut config = AppConfig::from_lookup(|_| None);
        cli.apply(&mut config);

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/resources"));
        assert!(!cli.in_memory);
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["resource-api", "--in-memory"]).unwrap();
        let mut config = AppConfig::from_lookup(|key| (key == "PORT").then(|| "7000".to_string()));
        cli.apply(&mut config);

        assert!(cli.in_memory);
        assert_eq!(config.server.port, 7000);
        assert!(config.database.url.is_none());
    }
}
