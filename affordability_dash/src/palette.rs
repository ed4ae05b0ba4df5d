//! Shared state/capital colour palette.

use serde::{Deserialize, Serialize};

pub const STATE_NAMES: [&str; 8] = [
    "New South Wales",
    "Victoria",
    "Queensland",
    "South Australia",
    "Western Australia",
    "Tasmania",
    "Northern Territory",
    "Australian Capital Territory",
];

pub const CAPITAL_NAMES: [&str; 8] = [
    "Sydney",
    "Melbourne",
    "Brisbane",
    "Adelaide",
    "Perth",
    "Hobart",
    "Darwin",
    "Canberra",
];

/// CSS custom property per state, in `STATE_NAMES` order, with the colour
/// used when the stylesheet leaves it undefined.
pub const STATE_COLOR_VARS: [(&str, &str); 8] = [
    ("--nsw", "#1f77b4"),
    ("--vic", "#d62728"),
    ("--qld", "#ff7f0e"),
    ("--sa", "#9467bd"),
    ("--wa", "#2ca02c"),
    ("--tas", "#8c564b"),
    ("--nt", "#17becf"),
    ("--act", "#7f7f7f"),
];

/// Domain/range pairs applied to matching scales. Each domain lines up
/// index-for-index with its range.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Palette {
    pub state_domain: Vec<String>,
    pub state_range: Vec<String>,
    pub capital_domain: Vec<String>,
    pub capital_range: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_css(|_| None)
    }
}

impl Palette {
    /// Build the palette from a custom-property lookup. Blank values fall
    /// back to the literal colour.
    pub fn from_css<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let colors: Vec<String> = STATE_COLOR_VARS
            .iter()
            .map(|(var, fallback)| {
                lookup(var)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| (*fallback).to_string())
            })
            .collect();
        Self {
            state_domain: STATE_NAMES.iter().map(|s| s.to_string()).collect(),
            state_range: colors.clone(),
            capital_domain: CAPITAL_NAMES.iter().map(|s| s.to_string()).collect(),
            capital_range: colors,
        }
    }

    /// Range to use for `domain`, if it is one of the known ordered lists.
    pub fn range_for(&self, domain: &[serde_json::Value]) -> Option<&[String]> {
        if matches_names(domain, &self.state_domain) {
            Some(&self.state_range)
        } else if matches_names(domain, &self.capital_domain) {
            Some(&self.capital_range)
        } else {
            None
        }
    }
}

fn matches_names(domain: &[serde_json::Value], names: &[String]) -> bool {
    domain.len() == names.len()
        && domain
            .iter()
            .zip(names)
            .all(|(value, name)| value.as_str() == Some(name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn css_values_override_fallbacks() {
        let palette = Palette::from_css(|var| match var {
            "--vic" => Some("  #000080 ".to_string()),
            "--qld" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(palette.state_range[0], "#1f77b4");
        assert_eq!(palette.state_range[1], "#000080");
        assert_eq!(palette.state_range[2], "#ff7f0e");
        assert_eq!(palette.capital_range, palette.state_range);
    }

    #[test]
    fn range_lookup_needs_exact_order() {
        let palette = Palette::default();
        let capitals: Vec<_> = CAPITAL_NAMES.iter().map(|c| json!(c)).collect();
        assert!(palette.range_for(&capitals).is_some());

        let mut shuffled = capitals.clone();
        shuffled.swap(0, 1);
        assert!(palette.range_for(&shuffled).is_none());
        assert!(palette.range_for(&capitals[..7]).is_none());
    }
}
