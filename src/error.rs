use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[cfg(feature = "client")]
use reqwest::Error as ReqwestError;

use crate::properties::SchemeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum Error {
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Cyclic parent chain through scheme {0}")]
    CyclicSchemes(SchemeId),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error("File system error: {0}")]
    Io(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0} not loaded yet")]
    NotLoaded(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for Error {
    fn from(src: toml::de::Error) -> Error {
        Error::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(src: toml::ser::Error) -> Error {
        Error::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for Error {
    fn from(src: JsonError) -> Error {
        Error::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for Error {
    fn from(src: UrlParseError) -> Error {
        Error::Serialization(format!("Invalid URL: {src}"))
    }
}

impl From<io::Error> for Error {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => Error::NotFound(format!("{x}")),
            _ => Error::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(x: fmt::Error) -> Self {
        Error::Export(format!("{x}"))
    }
}

#[cfg(feature = "client")]
impl From<ReqwestError> for Error {
    fn from(x: ReqwestError) -> Self {
        if x.is_decode() {
            Error::Serialization(format!("Response decode failed: {x}"))
        } else {
            Error::Fetch(format!("{x}"))
        }
    }
}
