// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate rustcommon_logger;

mod config;
mod document;
mod error;
mod plot;
mod reshape;

pub use crate::config::*;
pub use crate::document::*;
pub use crate::error::Error;
pub use crate::plot::*;
pub use crate::reshape::*;

/// The parsed input together with its reshaped bar weights
pub struct Benchmark {
    document: Document,
    data_sizes: Vec<f64>,
    weights: Vec<Weights>,
}

impl Benchmark {
    /// Parse and reshape one benchmark document
    pub fn new(text: &str) -> Result<Self, Error> {
        let document = Document::parse(text)?;

        for key in document.unrecognized() {
            warn!("ignoring unrecognized key: {}", key);
        }

        let data_sizes = document.data_sizes()?;
        let weights = reshape(&document)?;

        Ok(Self {
            document,
            data_sizes,
            weights,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn data_sizes(&self) -> &[f64] {
        &self.data_sizes
    }

    pub fn weights(&self) -> &[Weights] {
        &self.weights
    }

    pub fn render(&self, config: &Config) -> Result<(), Error> {
        render(config.plot(), &self.data_sizes, &self.weights)
    }
}
