// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed benchmark document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing key: {0}")]
    MissingKey(String),
    #[error("{path}: expected {expected}")]
    InvalidType {
        path: String,
        expected: &'static str,
    },
    #[error("{path}: index {index} out of range for sequence of length {len}")]
    OutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("render error: {0}")]
    Render(String),
}
