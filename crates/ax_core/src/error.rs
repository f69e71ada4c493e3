use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid filter spec: {0}")]
    InvalidSpec(String),

    #[error("Malformed article: {0}")]
    MalformedArticle(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for failures of the network collaborators (listing fetch, delivery).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
