use tracing::debug;

use crate::render::ChartView;
use crate::DashError;

/// Value of a chart signal as seen from the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum SignalValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays, objects, functions: compared by identity in the renderer,
    /// so never equal to anything here.
    Opaque,
}

impl SignalValue {
    /// Equality used to skip redundant updates. `NaN` matches `NaN`.
    pub fn same_as(&self, other: &SignalValue) -> bool {
        match (self, other) {
            (SignalValue::Number(a), SignalValue::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (SignalValue::Opaque, _) | (_, SignalValue::Opaque) => false,
            (a, b) => a == b,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SignalValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SignalValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for SignalValue {
    fn from(value: f64) -> Self {
        SignalValue::Number(value)
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        SignalValue::Bool(value)
    }
}

impl From<&str> for SignalValue {
    fn from(value: &str) -> Self {
        SignalValue::Text(value.to_string())
    }
}

impl From<String> for SignalValue {
    fn from(value: String) -> Self {
        SignalValue::Text(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every requested value was already current (or missing on the view).
    Unchanged,
    /// The listed signals were set and one render pass ran.
    Rendered { changed: Vec<String> },
}

/// Push `updates` into `view`, skipping values that are already current
/// and signals the view does not define. Runs the view once if anything
/// changed.
pub async fn sync_signals<V>(
    view: &V,
    updates: &[(&str, SignalValue)],
) -> Result<SyncOutcome, DashError>
where
    V: ChartView + ?Sized,
{
    let mut changed = Vec::new();
    for (name, value) in updates {
        let current = match view.signal(name) {
            Ok(current) => current,
            Err(err) => {
                debug!(signal = *name, %err, "skipping signal");
                continue;
            }
        };
        if current.same_as(value) {
            continue;
        }
        if let Err(err) = view.set_signal(name, value) {
            debug!(signal = *name, %err, "view rejected signal");
            continue;
        }
        changed.push((*name).to_string());
    }

    if changed.is_empty() {
        return Ok(SyncOutcome::Unchanged);
    }
    view.run().await?;
    debug!(signals = ?changed, "view re-rendered");
    Ok(SyncOutcome::Rendered { changed })
}
