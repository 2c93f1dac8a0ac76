#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream catalog returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Upstream catalog reported an error: {0}")]
    Graphql(String),

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("Search proxy returned HTTP {0}")]
    ProxyStatus(u16),
}

pub type Result<T> = std::result::Result<T, Error>;
