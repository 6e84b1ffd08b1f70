// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::Plot;
use crate::document::*;
use crate::reshape::Weights;
use crate::Error;

use histgraph::{Panel, PlotConfig, Series};

/// Label for the origin of the bin axis. Group names follow it.
const ORIGIN_LABEL: &str = "0";

/// Magnitudes at or past these bounds switch to exponent form.
const EXPONENT_ABOVE: f64 = 1e16;
const EXPONENT_BELOW: f64 = 1e-4;

/// Formats a byte count in kilobytes, always keeping a fractional part:
/// `1024` becomes `1.0` and `1536` becomes `1.5`. Very large or very small
/// values use a signed, two digit exponent such as `9.765625e+16`.
pub fn kilobytes(bytes: f64) -> String {
    let kb = bytes / 1024.0;
    let magnitude = kb.abs();

    if !kb.is_finite() {
        format!("{}", kb)
    } else if magnitude != 0.0 && (magnitude >= EXPONENT_ABOVE || magnitude < EXPONENT_BELOW) {
        exponent(kb)
    } else if kb.fract() == 0.0 {
        format!("{:.1}", kb)
    } else {
        format!("{}", kb)
    }
}

fn exponent(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) if exp < 0 => format!("{}e-{:02}", mantissa, -exp),
            Ok(exp) => format!("{}e+{:02}", mantissa, exp),
            Err(_) => formatted,
        },
        None => formatted,
    }
}

pub fn title(bytes: f64) -> String {
    format!("Keys total size (KB): {}", kilobytes(bytes))
}

/// Fixed bin axis labels: the origin then each group in bar order.
pub fn bin_labels() -> Vec<&'static str> {
    let mut labels = vec![ORIGIN_LABEL];
    labels.extend(group_names());
    labels
}

/// Builds one panel per size point with one series per structure.
pub fn panels(data_sizes: &[f64], weights: &[Weights]) -> Vec<Panel> {
    let kinds = kind_names();

    data_sizes
        .iter()
        .zip(weights.iter())
        .map(|(size, table)| {
            let mut panel = Panel::new(title(*size));
            for (kind, row) in kinds.iter().zip(table.iter()) {
                panel.series(Series::new(kind, row.to_vec()));
            }
            panel
        })
        .collect()
}

pub fn plot_config(plot: &Plot) -> PlotConfig {
    let mut config = PlotConfig::new();
    config
        .caption(plot.caption())
        .bin_labels(&bin_labels())
        .size((plot.width(), plot.height()))
        .grid(plot.rows(), plot.columns())
        .legend_size(plot.legend_size());
    config
}

/// Draws the grid of histograms to the configured output file.
pub fn render(plot: &Plot, data_sizes: &[f64], weights: &[Weights]) -> Result<(), Error> {
    let panels = panels(data_sizes, weights);
    info!("rendering {} panels to {}", panels.len(), plot.output());

    plot_config(plot)
        .plot(&panels, plot.output())
        .map_err(|e| Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilobyte_titles() {
        assert_eq!(kilobytes(1024.0), "1.0");
        assert_eq!(kilobytes(1536.0), "1.5");
        assert_eq!(kilobytes(0.0), "0.0");
        assert_eq!(kilobytes(1_048_576.0), "1024.0");
        assert_eq!(kilobytes(256.0), "0.25");
        assert_eq!(title(2048.0), "Keys total size (KB): 2.0");
    }

    #[test]
    fn extreme_kilobytes_use_exponents() {
        assert_eq!(kilobytes(1e20), "9.765625e+16");
        assert_eq!(kilobytes(1024.0 * 1e16), "1e+16");
        assert_eq!(kilobytes(1024.0 * 9999999999999998.0), "9999999999999998.0");
        assert_eq!(kilobytes(0.0512), "5e-05");
        assert_eq!(kilobytes(1024.0 * 1.5e-7), "1.5e-07");
        assert_eq!(kilobytes(-1e20), "-9.765625e+16");
    }

    #[test]
    fn labels() {
        assert_eq!(bin_labels(), vec!["0", "sparse", "dense", "sequential"]);
    }

    #[test]
    fn one_panel_per_size() {
        let sizes = [1024.0, 2048.0];
        let weights = [
            [[1.0, 5.0, 9.0], [3.0, 7.0, 11.0]],
            [[2.0, 6.0, 10.0], [4.0, 8.0, 12.0]],
        ];
        let panels = panels(&sizes, &weights);
        assert_eq!(panels.len(), 2);

        assert_eq!(panels[0].title(), "Keys total size (KB): 1.0");
        assert_eq!(panels[1].title(), "Keys total size (KB): 2.0");

        let series = panels[1].all_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label(), "ART");
        assert_eq!(series[0].weights(), &[2.0, 6.0, 10.0]);
        assert_eq!(series[1].label(), "AA");
        assert_eq!(series[1].weights(), &[4.0, 8.0, 12.0]);
        assert_eq!(panels[1].bins(), GROUPS);
    }

    #[test]
    fn no_panels() {
        assert!(panels(&[], &[]).is_empty());
    }
}
