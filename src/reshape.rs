// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::document::*;
use crate::Error;

use strum::IntoEnumIterator;

/// Bar weights for one size point, indexed `[kind][group]`.
pub type Weights = [[f64; GROUPS]; KINDS];

/// Rearranges per-group, per-kind sequences into one weight table per size
/// point. `output[i][k][g]` is the value of kind `k` under group `g` at size
/// point `i`.
pub fn reshape(document: &Document) -> Result<Vec<Weights>, Error> {
    let points = document.size_points()?;
    debug!("reshaping {} size points", points);

    let mut output = Vec::with_capacity(points);
    for index in 0..points {
        let mut weights = [[0.0; GROUPS]; KINDS];
        for (k, kind) in Kind::iter().enumerate() {
            for (g, group) in Group::iter().enumerate() {
                weights[k][g] = document.measurement(group, kind, index)?;
            }
        }
        output.push(weights);
    }

    Ok(output)
}
