// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;

use rustcommon_logger::Level;
use serde_derive::*;

use std::io::Read;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub const CAPTION: &str =
    "Relative time consumed by D's associative arrays and ART to insert all keys.";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    plot: Plot,
}

impl Config {
    /// Loads the config file if one is given, otherwise the defaults.
    pub fn new(file: Option<&str>) -> Result<Self, Error> {
        match file {
            Some(file) => Self::load_from_file(file),
            None => Ok(Default::default()),
        }
    }

    pub fn load_from_file(filename: &str) -> Result<Self, Error> {
        let mut file = std::fs::File::open(filename)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn general_mut(&mut self) -> &mut General {
        &mut self.general
    }

    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    pub fn plot_mut(&mut self) -> &mut Plot {
        &mut self.plot
    }

    pub fn print(&self) {
        info!("-----");
        info!("Config:");
        info!("Config: Logging: {:?} Echo: {}", self.general.logging(), self.general.echo());
        info!(
            "Config: Output: {} Size: {}x{} Grid: {}x{}",
            self.plot.output(),
            self.plot.width(),
            self.plot.height(),
            self.plot.rows(),
            self.plot.columns()
        );
        info!("-----");
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
    #[serde(default = "default_echo")]
    echo: bool,
}

impl Default for General {
    fn default() -> General {
        General {
            logging: default_logging_level(),
            echo: default_echo(),
        }
    }
}

impl General {
    pub fn logging(&self) -> Level {
        self.logging
    }

    pub fn set_logging(&mut self, level: Level) {
        self.logging = level;
    }

    pub fn echo(&self) -> bool {
        self.echo
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plot {
    #[serde(default = "default_output")]
    output: String,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "two")]
    rows: usize,
    #[serde(default = "two")]
    columns: usize,
    #[serde(default = "default_caption")]
    caption: String,
    #[serde(default = "default_legend_size")]
    legend_size: u32,
}

impl Default for Plot {
    fn default() -> Plot {
        Plot {
            output: default_output(),
            width: default_width(),
            height: default_height(),
            rows: two(),
            columns: two(),
            caption: default_caption(),
            legend_size: default_legend_size(),
        }
    }
}

impl Plot {
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn set_output(&mut self, output: impl AsRef<str>) {
        self.output = output.as_ref().to_owned();
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn legend_size(&self) -> u32 {
        self.legend_size
    }
}

fn default_logging_level() -> Level {
    Level::Info
}

fn default_echo() -> bool {
    true
}

fn default_output() -> String {
    "benchmark.png".to_owned()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    960
}

fn two() -> usize {
    2
}

fn default_caption() -> String {
    CAPTION.to_owned()
}

fn default_legend_size() -> u32 {
    10
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
#[serde(remote = "Level")]
#[serde(deny_unknown_fields)]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
