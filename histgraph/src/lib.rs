// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use plotters::coord::Shift;
use plotters::prelude::*;

use std::error::Error;
use std::path::Path;

mod scales;

pub use scales::*;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            (($colour & 0x0000FF) >> 0) as u8,
        )
    };
}

const COLOURS: &[RGBColor] = &[
    hexcolour!(0x1F77B4),
    hexcolour!(0xFF7F0E),
    hexcolour!(0x2CA02C),
    hexcolour!(0xD62728),
    hexcolour!(0x9467BD),
    hexcolour!(0x8C564B),
];

/// Fraction of each bin covered by bars. The remainder is split evenly on
/// both sides of the bar group.
const BAR_FILL: f64 = 0.8;

/// Headroom added beyond the tallest and deepest bars, as a fraction of the
/// value span.
const Y_PADDING: f64 = 0.05;

pub fn colour(index: usize) -> RGBColor {
    COLOURS[index % COLOURS.len()]
}

/// One set of bars, one bar per bin.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    label: String,
    weights: Vec<f64>,
}

impl Series {
    pub fn new(label: impl AsRef<str>, weights: Vec<f64>) -> Self {
        Self {
            label: label.as_ref().to_owned(),
            weights,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// A single chart area of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    title: String,
    series: Vec<Series>,
}

impl Panel {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            title: title.as_ref().to_owned(),
            series: Vec::new(),
        }
    }

    pub fn series(&mut self, series: Series) -> &mut Self {
        self.series.push(series);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn all_series(&self) -> &[Series] {
        &self.series
    }

    /// Number of bins, taken from the longest series.
    pub fn bins(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.weights.len())
            .max()
            .unwrap_or(0)
    }

    /// Largest bar height, never below zero.
    pub fn max_weight(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.weights.iter().copied())
            .filter(|w| w.is_finite())
            .fold(0.0, f64::max)
    }

    /// Smallest bar height, never above zero.
    pub fn min_weight(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.weights.iter().copied())
            .filter(|w| w.is_finite())
            .fold(0.0, f64::min)
    }

    /// Value range of the y axis. Always includes zero and is padded on
    /// each side that holds bars.
    pub fn y_range(&self) -> (f64, f64) {
        let bottom = self.min_weight();
        let top = self.max_weight();
        let span = top - bottom;
        if span <= 0.0 || !span.is_finite() {
            return (0.0, 1.0);
        }
        let pad = span * Y_PADDING;
        let bottom = if bottom < 0.0 { bottom - pad } else { 0.0 };
        (bottom, top + pad)
    }
}

/// Rows and columns for `count` panels. The grid never shrinks below the
/// configured shape and grows by whole rows.
pub fn grid_shape(count: usize, rows: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    let needed = (count + columns - 1) / columns;
    (rows.max(needed).max(1), columns)
}

/// Horizontal extent of the bar for `series` within `bin` when `count`
/// series share the bin.
pub fn bar_span(bin: usize, series: usize, count: usize) -> (f64, f64) {
    let count = count.max(1);
    let width = BAR_FILL / count as f64;
    let start = bin as f64 + (1.0 - BAR_FILL) / 2.0 + width * series as f64;
    (start, start + width)
}

pub struct PlotConfig {
    caption: String,
    bin_labels: Vec<String>,
    size: (u32, u32),
    rows: usize,
    columns: usize,
    legend_size: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self {
            caption: String::new(),
            bin_labels: Vec::new(),
            size: (1280, 960),
            rows: 2,
            columns: 2,
            legend_size: 10,
        }
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = caption.as_ref().to_owned();
        self
    }

    /// Labels for the bin axis. The first label marks the origin and the
    /// rest name the bins in order.
    pub fn bin_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> &mut Self {
        self.bin_labels = labels.iter().map(|l| l.as_ref().to_owned()).collect();
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    pub fn grid(&mut self, rows: usize, columns: usize) -> &mut Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    pub fn legend_size(&mut self, size: u32) -> &mut Self {
        self.legend_size = size;
        self
    }

    /// Renders the panels to `filename`. Paths ending in `.svg` produce an
    /// SVG document, anything else a bitmap.
    pub fn plot(&self, panels: &[Panel], filename: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let path = filename.as_ref();
        let svg = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);

        if svg {
            let root = SVGBackend::new(path, self.size).into_drawing_area();
            self.draw(root, panels)
        } else {
            let root = BitMapBackend::new(path, self.size).into_drawing_area();
            self.draw(root, panels)
        }
    }

    fn draw<DB>(&self, root: DrawingArea<DB, Shift>, panels: &[Panel]) -> Result<(), Box<dyn Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        if self.caption.is_empty() {
            self.draw_grid(&root, panels)?;
        } else {
            let body = root.titled(&self.caption, ("sans-serif", 24.0))?;
            self.draw_grid(&body, panels)?;
        }

        root.present()?;

        Ok(())
    }

    fn draw_grid<DB>(&self, area: &DrawingArea<DB, Shift>, panels: &[Panel]) -> Result<(), Box<dyn Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let shape = grid_shape(panels.len(), self.rows, self.columns);
        let areas = area.split_evenly(shape);

        for (panel, area) in panels.iter().zip(areas.iter()) {
            self.draw_panel(area, panel)?;
        }

        Ok(())
    }

    fn draw_panel<DB>(&self, area: &DrawingArea<DB, Shift>, panel: &Panel) -> Result<(), Box<dyn Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let bins = panel.bins();
        let (bottom, top) = panel.y_range();

        let mut chart = ChartBuilder::on(area)
            .caption(panel.title(), ("sans-serif", 16.0))
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 30)
            .build_cartesian_2d(BinCoord::new(bins), bottom..top)?;

        let labels: &[String] = &self.bin_labels;
        let formatter = |x: &f64| bin_label(labels, *x);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bins + 1)
            .x_label_formatter(&formatter)
            .draw()?;

        let count = panel.all_series().len();
        for (index, series) in panel.all_series().iter().enumerate() {
            let fill = colour(index);
            let bars = series.weights().iter().enumerate().map(move |(bin, weight)| {
                let (left, right) = bar_span(bin, index, count);
                Rectangle::new([(left, 0.0), (right, *weight)], fill.filled())
            });

            chart
                .draw_series(bars)?
                .label(series.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
        }

        chart
            .configure_series_labels()
            .label_font(("sans-serif", f64::from(self.legend_size)))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel {
        let mut panel = Panel::new("Keys total size (KB): 1.0");
        panel
            .series(Series::new("ART", vec![1.0, 5.0, 9.0]))
            .series(Series::new("AA", vec![3.0, 7.0, 11.0]));
        panel
    }

    #[test]
    fn grid_keeps_minimum_shape() {
        assert_eq!(grid_shape(1, 2, 2), (2, 2));
        assert_eq!(grid_shape(4, 2, 2), (2, 2));
    }

    #[test]
    fn grid_grows_rows() {
        assert_eq!(grid_shape(5, 2, 2), (3, 2));
        assert_eq!(grid_shape(7, 1, 3), (3, 3));
        assert_eq!(grid_shape(3, 0, 0), (3, 1));
        assert_eq!(grid_shape(0, 0, 2), (1, 2));
    }

    #[test]
    fn bars_share_bin() {
        let (l0, r0) = bar_span(0, 0, 2);
        let (l1, r1) = bar_span(0, 1, 2);
        assert!((l0 - 0.1).abs() < 1e-12);
        assert!((r0 - 0.5).abs() < 1e-12);
        assert!((l1 - r0).abs() < 1e-12);
        assert!((r1 - 0.9).abs() < 1e-12);

        let (l, r) = bar_span(2, 1, 2);
        assert!(l > 2.0 && r < 3.0);
    }

    #[test]
    fn single_series_is_centred() {
        let (l, r) = bar_span(1, 0, 1);
        assert!(((l + r) / 2.0 - BinCoord::centre(1)).abs() < 1e-12);
        assert_eq!(bar_span(1, 0, 0), bar_span(1, 0, 1));
    }

    #[test]
    fn panel_extent() {
        let panel = panel();
        assert_eq!(panel.bins(), 3);
        assert_eq!(panel.max_weight(), 11.0);
        assert_eq!(panel.all_series()[1].label(), "AA");
        assert_eq!(Panel::new("empty").bins(), 0);
        assert_eq!(Panel::new("empty").max_weight(), 0.0);
    }

    #[test]
    fn y_range_starts_at_zero() {
        let (bottom, top) = panel().y_range();
        assert_eq!(bottom, 0.0);
        assert!((top - 11.55).abs() < 1e-9);
    }

    #[test]
    fn negative_weights_extend_below_axis() {
        let mut panel = Panel::new("Keys total size (KB): 1.0");
        panel
            .series(Series::new("ART", vec![-5.0, 5.0, 9.0]))
            .series(Series::new("AA", vec![3.0, 7.0, 11.0]));
        assert_eq!(panel.min_weight(), -5.0);
        assert_eq!(panel.max_weight(), 11.0);

        let (bottom, top) = panel.y_range();
        assert!((bottom - -5.8).abs() < 1e-9);
        assert!((top - 11.8).abs() < 1e-9);
    }

    #[test]
    fn all_negative_weights() {
        let mut panel = Panel::new("negative");
        panel.series(Series::new("ART", vec![-2.0, -4.0]));
        assert_eq!(panel.max_weight(), 0.0);
        let (bottom, top) = panel.y_range();
        assert!((bottom - -4.2).abs() < 1e-9);
        assert!((top - 0.2).abs() < 1e-9);
    }

    #[test]
    fn flat_panel_gets_unit_range() {
        let mut panel = Panel::new("zeros");
        panel.series(Series::new("ART", vec![0.0, 0.0, 0.0]));
        assert_eq!(panel.y_range(), (0.0, 1.0));
        assert_eq!(Panel::new("empty").y_range(), (0.0, 1.0));
        assert_eq!(Panel::new("empty").min_weight(), 0.0);
    }

    #[test]
    fn colours_wrap() {
        let rgb = |c: RGBColor| (c.0, c.1, c.2);
        assert_eq!(rgb(colour(0)), rgb(colour(COLOURS.len())));
        assert_ne!(rgb(colour(0)), rgb(colour(1)));
    }
}
