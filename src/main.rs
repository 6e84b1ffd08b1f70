// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate rustcommon_logger;

use benchplot::*;
use clap::{App, Arg, ArgMatches};
use rustcommon_logger::{LogBuilder, MultiLogBuilder, Stdout};

use std::io::{BufRead, Write};

fn main() {
    // process command line arguments
    let matches = app().get_matches();

    let mut config = match Config::new(matches.value_of("config")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // command line overrides the config file
    apply_overrides(&mut config, &matches);

    // initialize logging
    let log = LogBuilder::new()
        .output(Box::new(Stdout::new()))
        .log_queue_depth(1024)
        .single_message_size(4096)
        .build()
        .expect("failed to initialize log");

    let mut log = MultiLogBuilder::new()
        .level_filter(config.general().logging().to_level_filter())
        .default(log)
        .build()
        .start();

    info!("{} {} initializing...", NAME, VERSION);
    config.print();

    let result = run(&config);
    let _ = log.flush();

    if let Err(e) = result {
        error!("{}", e);
        let _ = log.flush();
        std::process::exit(1);
    }
}

fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .about("Plot ART and associative array benchmark results as grouped histograms")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .value_name("FILE")
                .help("image to write, SVG when the name ends in .svg")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("quiet")
                .long("quiet")
                .short("q")
                .help("do not echo the input line")
                .takes_value(false),
        )
}

fn apply_overrides(config: &mut Config, matches: &ArgMatches) {
    if let Some(output) = matches.value_of("output") {
        config.plot_mut().set_output(output);
    }
    if matches.is_present("quiet") {
        config.general_mut().set_echo(false);
    }
}

/// Reads the single input line without its line terminator.
fn read_input<R: BufRead>(input: &mut R) -> Result<String, Error> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let len = line.trim_end_matches(&['\r', '\n'][..]).len();
    line.truncate(len);
    Ok(line)
}

/// Writes the input line followed by two blank lines.
fn echo<W: Write>(output: &mut W, line: &str) -> Result<(), Error> {
    writeln!(output, "{}", line)?;
    writeln!(output, "\n")?;
    output.flush()?;
    Ok(())
}

fn run(config: &Config) -> Result<(), Error> {
    let stdin = std::io::stdin();
    let line = read_input(&mut stdin.lock())?;

    if config.general().echo() {
        let stdout = std::io::stdout();
        echo(&mut stdout.lock(), &line)?;
    }

    let benchmark = Benchmark::new(&line)?;
    info!("size points: {}", benchmark.data_sizes().len());

    benchmark.render(config)?;
    info!("wrote {}", config.plot().output());

    Ok(())
}
