// ABOUTME: Plain-text rendering of aggregated basket ingredients
// ABOUTME: Produces the downloadable shopping list with fixed header and CRLF endings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use crate::constants::{
    SHOPPING_LIST_HEADER, SHOPPING_LIST_LINE_ENDING, SHOPPING_LIST_SEPARATOR_WIDTH,
};
use crate::database::IngredientTotal;

/// Render aggregated basket totals as the downloadable shopping list
///
/// Layout: header line, dash separator, then one `- {name} ({unit}) - {sum}`
/// line per group. Every line ends with CRLF so the file opens cleanly in
/// plain-text viewers on any platform. Group order is whatever the caller
/// passes; the aggregation query already sorts by name then unit.
#[must_use]
pub fn render(totals: &[IngredientTotal]) -> String {
    let mut out = String::new();
    out.push_str(SHOPPING_LIST_HEADER);
    out.push_str(SHOPPING_LIST_LINE_ENDING);
    out.push_str(&"-".repeat(SHOPPING_LIST_SEPARATOR_WIDTH));
    out.push_str(SHOPPING_LIST_LINE_ENDING);

    for group in totals {
        out.push_str(&format!(
            "- {} ({}) - {}",
            group.name, group.measurement_unit, group.total
        ));
        out.push_str(SHOPPING_LIST_LINE_ENDING);
    }

    out
}
