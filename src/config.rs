use clap::Parser;

/// Command line configuration for the exporter.
///
/// Parsed once at start-up and never changed afterwards.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "orchestrator_exporter",
    version,
    about = "Export orchestrator cluster health to Prometheus"
)]
pub struct Config {
    /// Orchestrator host name.
    #[arg(short = 'H', long, default_value = "localhost")]
    pub host: String,

    /// Orchestrator HTTP port.
    #[arg(short = 'P', long, default_value_t = 3000)]
    pub port: u16,

    /// Basic auth user.
    #[arg(short = 'U', long, default_value = "admin")]
    pub user: String,

    /// Basic auth password.
    #[arg(short = 'p', long, default_value = "admin")]
    pub password: String,

    /// Address the `/metrics` endpoint listens on.
    #[arg(short = 'L', long, default_value = "localhost:1010")]
    pub listen: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3000,
            user: "admin".into(),
            password: "admin".into(),
            listen: "localhost:1010".into(),
        }
    }
}

impl Config {
    /// The health API endpoint of the configured orchestrator.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("http://{}:{}/api/health/", self.host, self.port)
    }
}
