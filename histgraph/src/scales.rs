// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;

use std::ops::Range;

/// A linear x axis split into unit-width bins. Key points sit at the origin
/// and at the centre of each bin so that labels name bins rather than edges.
pub struct BinCoord {
    bins: usize,
    range: RangedCoordf64,
}

impl BinCoord {
    pub fn new(bins: usize) -> Self {
        let bins = bins.max(1);
        Self {
            bins,
            range: (0.0..bins as f64).into(),
        }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Centre of the given bin in axis coordinates.
    pub fn centre(bin: usize) -> f64 {
        bin as f64 + 0.5
    }

    /// Maps an axis value back to its slot in a fixed label list, where slot
    /// zero is the origin and slot `n + 1` is the centre of bin `n`.
    pub fn slot(value: f64) -> Option<usize> {
        if value.abs() < f64::EPSILON {
            return Some(0);
        }
        let bin = (value - 0.5).round();
        if bin < 0.0 || (value - 0.5 - bin).abs() > 1e-9 {
            return None;
        }
        Some(bin as usize + 1)
    }
}

impl Ranged for BinCoord {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.range.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        let mut points = vec![0.0];
        points.extend((0..self.bins).map(Self::centre));
        points.truncate(hint.max_num_points().max(1));
        points
    }

    fn range(&self) -> Range<f64> {
        0.0..self.bins as f64
    }
}

/// Formats an axis value using a fixed label list indexed by `BinCoord::slot`.
/// Values without a label fall back to their numeric form.
pub fn bin_label<S: AsRef<str>>(labels: &[S], value: f64) -> String {
    BinCoord::slot(value)
        .and_then(|slot| labels.get(slot))
        .map(|label| label.as_ref().to_owned())
        .unwrap_or_else(|| format!("{}", value))
}
