use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("health check request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode health response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to bind metrics endpoint on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("metrics endpoint stopped: {0}")]
    Serve(#[source] std::io::Error),
}

impl ExporterError {
    /// Process exit code for an error that ends the exporter.
    ///
    /// A malformed health payload means the target speaks an incompatible API, so it gets its
    /// own code; anything else reaching `main` is a generic failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Decode(_) => 2,
            _ => 1,
        }
    }
}
