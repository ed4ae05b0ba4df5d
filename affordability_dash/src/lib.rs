//! Chart specification transforms and control wiring for the housing
//! affordability dashboard.
//!
//! The crate is renderer agnostic: the browser front-end implements the
//! traits in [`render`] against `vegaEmbed` and the DOM, while tests drive
//! the same controller with in-memory doubles.

use thiserror::Error;

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod labels;
pub mod legend;
pub mod palette;
pub mod render;
pub mod signals;
pub mod spec;

pub use charts::{ChartDef, ChartId, ControlId, DisplayId};
pub use config::{DashboardConfig, EmbedOptions, RendererKind};
pub use dashboard::Dashboard;
pub use labels::{js_number, region_label, year_label};
pub use legend::{apply_legend_labels, AnnotationOutcome, LegendExtrema, SkipReason};
pub use palette::Palette;
pub use render::{ChartView, FrameTask, Page, Renderer, SpecSource};
pub use signals::{sync_signals, SignalValue, SyncOutcome};
pub use spec::{Pipeline, SpecTransform};

#[derive(Error, Debug)]
pub enum DashError {
    #[error("unable to load spec: {path} ({reason})")]
    Load { path: String, reason: String },
    #[error("failed to embed {selector}: {reason}")]
    Embed { selector: String, reason: String },
    #[error("signal update failed: {0}")]
    Update(String),
    #[error("view has no signal named {0}")]
    MissingSignal(String),
    #[error("invalid dashboard config: {0}")]
    Config(String),
    #[error("page interaction failed: {0}")]
    Page(String),
}

impl DashError {
    pub fn load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DashError::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
