use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP {status} for {path}")]
    Status { path: String, status: u16 },
    #[error("request for {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fragment path {0}")]
    BadPath(String),
    #[error("no fragment registered for {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog is empty")]
    Empty,
    #[error("duplicate video id {0}")]
    DuplicateId(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unsupported locale code '{0}'")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("translation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("translation file has no supported locale")]
    NoLocales,
}
