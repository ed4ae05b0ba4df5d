//! Fixed registry of charts, form controls and display spans on the page.

use serde::{Deserialize, Serialize};

use crate::spec::{Pipeline, SpecTransform};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    Kpi,
    City,
    StateTrend,
    SalaryShare,
    Sa3,
    Timeseries,
    Distribution,
}

impl ChartId {
    pub const ALL: [ChartId; 7] = [
        ChartId::Kpi,
        ChartId::City,
        ChartId::StateTrend,
        ChartId::SalaryShare,
        ChartId::Sa3,
        ChartId::Timeseries,
        ChartId::Distribution,
    ];

    pub fn def(self) -> ChartDef {
        match self {
            ChartId::Kpi => ChartDef::new(self, "#kpi-vis", "kpi_cards"),
            ChartId::City => ChartDef::new(self, "#city-vis", "city_comparator")
                .strip(&["yearParam"])
                .palette()
                .legend("#city-vis .vega-legend .vega-legend-entry text"),
            ChartId::StateTrend => ChartDef::new(self, "#state-trend-vis", "state_trend")
                .strip(&["focusState"])
                .palette()
                .subtitle("Use the dropdown", "Use the highlight selector"),
            ChartId::SalaryShare => ChartDef::new(self, "#salary-share-vis", "salary_share")
                .strip(&["yearParam"])
                .palette(),
            ChartId::Sa3 => ChartDef::new(self, "#sa3-vis", "sa3_map_rank").palette(),
            ChartId::Timeseries => ChartDef::new(self, "#timeseries-vis", "time_series").palette(),
            ChartId::Distribution => ChartDef::new(self, "#distribution-vis", "distribution")
                .strip(&["yearParam"])
                .palette()
                .subtitle("Year selector below", "Year dropdown above"),
        }
    }
}

/// Where a chart mounts, which spec it loads and how the spec is patched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartDef {
    pub id: ChartId,
    pub selector: &'static str,
    pub file_stem: &'static str,
    /// Legend text nodes to annotate, for charts that get extrema labels.
    pub legend_selector: Option<&'static str>,
    steps: Vec<SpecTransform>,
}

impl ChartDef {
    fn new(id: ChartId, selector: &'static str, file_stem: &'static str) -> Self {
        Self {
            id,
            selector,
            file_stem,
            legend_selector: None,
            steps: Vec::new(),
        }
    }

    fn strip(mut self, names: &[&str]) -> Self {
        self.steps.push(SpecTransform::strip(names));
        self
    }

    fn palette(mut self) -> Self {
        self.steps.push(SpecTransform::ApplyPalette);
        self
    }

    fn subtitle(mut self, find: &str, replace: &str) -> Self {
        self.steps.push(SpecTransform::subtitle(find, replace));
        self
    }

    fn legend(mut self, selector: &'static str) -> Self {
        self.legend_selector = Some(selector);
        self
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.steps.clone())
    }
}

/// `<select>` elements that drive chart signals.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    GlobalYear,
    SnapshotCity,
    Sa3City,
    Sa3Year,
    DistributionYear,
    CityYear,
    IncomeYear,
    StateHighlight,
}

impl ControlId {
    pub const ALL: [ControlId; 8] = [
        ControlId::GlobalYear,
        ControlId::SnapshotCity,
        ControlId::Sa3Year,
        ControlId::Sa3City,
        ControlId::DistributionYear,
        ControlId::IncomeYear,
        ControlId::CityYear,
        ControlId::StateHighlight,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            ControlId::GlobalYear => "global-year-select",
            ControlId::SnapshotCity => "snapshot-city-select",
            ControlId::Sa3City => "sa3-city-select",
            ControlId::Sa3Year => "sa3-year-select",
            ControlId::DistributionYear => "distribution-year-select",
            ControlId::CityYear => "city-year-select",
            ControlId::IncomeYear => "income-year-select",
            ControlId::StateHighlight => "state-highlight-select",
        }
    }

    /// Chart whose signals this control feeds.
    pub fn chart(self) -> ChartId {
        match self {
            ControlId::GlobalYear | ControlId::SnapshotCity => ChartId::Kpi,
            ControlId::Sa3City | ControlId::Sa3Year => ChartId::Sa3,
            ControlId::DistributionYear => ChartId::Distribution,
            ControlId::CityYear => ChartId::City,
            ControlId::IncomeYear => ChartId::SalaryShare,
            ControlId::StateHighlight => ChartId::StateTrend,
        }
    }

    /// Prefix for the warning logged when a change fails.
    pub fn failure_context(self) -> &'static str {
        match self {
            ControlId::GlobalYear => "Unable to update scoreboard year",
            ControlId::SnapshotCity => "Unable to update scoreboard region",
            ControlId::Sa3Year => "Unable to update SA3 year",
            ControlId::Sa3City => "Unable to update SA3 region",
            ControlId::DistributionYear => "Unable to update distribution year",
            ControlId::IncomeYear => "Unable to update salary share year",
            ControlId::CityYear => "Unable to update capital city year",
            ControlId::StateHighlight => "Unable to update state highlight",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayId {
    GlobalYear,
    CityYear,
}

impl DisplayId {
    pub fn element_id(self) -> &'static str {
        match self {
            DisplayId::GlobalYear => "global-year-display",
            DisplayId::CityYear => "city-year-display",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_city_chart_has_legend() {
        for id in ChartId::ALL {
            let def = id.def();
            assert_eq!(def.id, id);
            assert_eq!(def.legend_selector.is_some(), id == ChartId::City);
        }
    }

    #[test]
    fn kpi_is_untransformed() {
        assert!(ChartId::Kpi.def().pipeline().is_empty());
        assert_eq!(
            ChartId::Distribution.def().pipeline().steps(),
            &[
                SpecTransform::strip(&["yearParam"]),
                SpecTransform::ApplyPalette,
                SpecTransform::subtitle("Year selector below", "Year dropdown above"),
            ]
        );
    }

    #[test]
    fn element_ids_are_unique() {
        let mut ids: Vec<_> = ControlId::ALL.iter().map(|c| c.element_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ControlId::ALL.len());
    }
}
