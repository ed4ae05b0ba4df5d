//! Highest/lowest annotations on the capital-city legend.

use serde_json::Value;
use tracing::{debug, warn};

use crate::render::{ChartView, Page};

pub const LABEL_FIELD: &str = "city_label";
pub const RATIO_FIELD: &str = "price_to_income";

const HIGHEST: &str = "highest";
const LOWEST: &str = "lowest";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendExtrema {
    pub highest: String,
    pub lowest: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NoView,
    NoData,
    NoLegend,
}

/// Result of one annotation pass. Never fatal to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationOutcome {
    /// Extrema found; the label write waits for the next frame.
    Scheduled(LegendExtrema),
    Applied { updated: usize },
    Skipped(SkipReason),
    Failed(String),
}

impl AnnotationOutcome {
    /// Log the outcome. Failures are warnings, everything else is debug.
    pub fn report(&self, selector: &str) {
        match self {
            AnnotationOutcome::Failed(reason) => {
                warn!(selector, %reason, "unable to annotate legend extrema");
            }
            other => debug!(selector, outcome = ?other, "legend pass"),
        }
    }
}

/// Highest and lowest ratio rows of the first dataset that has any
/// labelled rows. Ties keep the earliest row.
pub fn derive_extrema(datasets: &[(String, Value)]) -> Option<LegendExtrema> {
    for (_, rows) in datasets {
        let Value::Array(rows) = rows else {
            continue;
        };
        let mut candidates = rows.iter().filter_map(|row| {
            let label = row.get(LABEL_FIELD)?.as_str()?;
            let ratio = row.get(RATIO_FIELD)?.as_f64()?;
            Some((label, ratio))
        });
        let Some(first) = candidates.next() else {
            continue;
        };
        let (mut highest, mut lowest) = (first, first);
        for row in candidates {
            if row.1 > highest.1 {
                highest = row;
            }
            if row.1 < lowest.1 {
                lowest = row;
            }
        }
        return Some(LegendExtrema {
            highest: highest.0.to_string(),
            lowest: lowest.0.to_string(),
        });
    }
    None
}

/// Legend text with any earlier `(highest)`/`(lowest)` suffix removed.
pub fn strip_suffix(text: &str) -> &str {
    let trimmed = text.trim_end();
    for tag in [HIGHEST, LOWEST] {
        let suffix_len = tag.len() + 2;
        if trimmed.len() < suffix_len {
            continue;
        }
        let split = trimmed.len() - suffix_len;
        if !trimmed.is_char_boundary(split) {
            continue;
        }
        let (head, tail) = trimmed.split_at(split);
        let inner = tail
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'));
        if inner.is_some_and(|inner| inner.eq_ignore_ascii_case(tag)) {
            return head.trim();
        }
    }
    trimmed.trim()
}

/// Annotated form of one legend entry.
pub fn annotate_label(text: &str, extrema: &LegendExtrema) -> String {
    let base = strip_suffix(text);
    if !extrema.highest.is_empty() && base == extrema.highest {
        format!("{base} ({HIGHEST})")
    } else if !extrema.lowest.is_empty() && base == extrema.lowest {
        format!("{base} ({LOWEST})")
    } else {
        base.to_string()
    }
}

/// Write the annotated form of every legend entry under `selector`,
/// skipping entries that already read correctly.
pub fn apply_legend_labels<P>(page: &P, selector: &str, extrema: &LegendExtrema) -> AnnotationOutcome
where
    P: Page,
{
    let labels = match page.legend_labels(selector) {
        Ok(labels) => labels,
        Err(err) => return AnnotationOutcome::Failed(err.to_string()),
    };
    if labels.is_empty() {
        return AnnotationOutcome::Skipped(SkipReason::NoLegend);
    }
    let mut updated = 0;
    for (index, text) in labels.iter().enumerate() {
        let next = annotate_label(text, extrema);
        if next == *text {
            continue;
        }
        if let Err(err) = page.set_legend_label(selector, index, &next) {
            return AnnotationOutcome::Failed(err.to_string());
        }
        updated += 1;
    }
    AnnotationOutcome::Applied { updated }
}

fn schedule_labels<P>(page: &P, selector: &'static str, extrema: LegendExtrema)
where
    P: Page,
{
    page.on_next_frame(Box::new(move |page: &P| {
        apply_legend_labels(page, selector, &extrema).report(selector);
    }));
}

/// Once `view` has settled, read its extrema and queue the legend rewrite
/// for the next painted frame. Returns without waiting for that frame.
pub async fn annotate_legend<V, P>(
    view: Option<&V>,
    page: &P,
    selector: &'static str,
) -> AnnotationOutcome
where
    V: ChartView + ?Sized,
    P: Page,
{
    let Some(view) = view else {
        return AnnotationOutcome::Skipped(SkipReason::NoView);
    };
    if let Err(err) = view.settled().await {
        return AnnotationOutcome::Failed(err.to_string());
    }
    let datasets = match view.datasets() {
        Ok(datasets) => datasets,
        Err(err) => return AnnotationOutcome::Failed(err.to_string()),
    };
    let Some(extrema) = derive_extrema(&datasets) else {
        return AnnotationOutcome::Skipped(SkipReason::NoData);
    };
    schedule_labels(page, selector, extrema.clone());
    AnnotationOutcome::Scheduled(extrema)
}
