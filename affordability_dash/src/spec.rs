//! In-place rewrites applied to a chart specification before it is embedded.

use serde_json::{Map, Value};

use crate::palette::Palette;

/// Callback for [`walk_mut`]. Objects are visited before their children,
/// so edits made here are seen by the rest of the walk.
pub trait SpecVisitor {
    fn visit_object(&mut self, node: &mut Map<String, Value>);
}

/// Depth-first walk over every object in the document.
pub fn walk_mut<V: SpecVisitor + ?Sized>(node: &mut Value, visitor: &mut V) {
    match node {
        Value::Array(items) => {
            for item in items.iter_mut() {
                walk_mut(item, visitor);
            }
        }
        Value::Object(map) => {
            visitor.visit_object(map);
            for child in map.values_mut() {
                walk_mut(child, visitor);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn color_array(colors: &[String]) -> Value {
    Value::Array(colors.iter().cloned().map(Value::String).collect())
}

struct PaletteVisitor<'a> {
    palette: &'a Palette,
}

impl SpecVisitor for PaletteVisitor<'_> {
    fn visit_object(&mut self, node: &mut Map<String, Value>) {
        let Some(Value::Object(scale)) = node.get_mut("scale") else {
            return;
        };
        let matched = match scale.get("domain") {
            Some(Value::Array(domain)) => self.palette.range_for(domain).map(color_array),
            _ => None,
        };
        if let Some(range) = matched {
            scale.insert("range".to_string(), range);
        }
        // Eight-entry ranges are assumed to be per-state even without a labelled domain.
        if matches!(scale.get("range"), Some(Value::Array(range)) if range.len() == 8) {
            scale.insert("range".to_string(), color_array(&self.palette.state_range));
        }
    }
}

/// Repaint state/capital scales and backfill `config.range.category`.
pub fn apply_palette(spec: &mut Value, palette: &Palette) {
    walk_mut(spec, &mut PaletteVisitor { palette });

    let Value::Object(root) = spec else {
        return;
    };
    let config = root
        .entry("config")
        .or_insert_with(|| Value::Object(Map::new()));
    if !config.is_object() {
        *config = Value::Object(Map::new());
    }
    let Some(config) = config.as_object_mut() else {
        return;
    };
    let range = config
        .entry("range")
        .or_insert_with(|| Value::Object(Map::new()));
    if !range.is_object() {
        *range = Value::Object(Map::new());
    }
    let Some(range) = range.as_object_mut() else {
        return;
    };
    let needs_category = match range.get("category") {
        None | Some(Value::Null) => true,
        Some(Value::Array(colors)) => colors.len() < 8,
        // scheme references are left alone
        Some(_) => false,
    };
    if needs_category {
        range.insert("category".to_string(), color_array(&palette.state_range));
    }
}

/// Drop the `bind` widget from listed params, or from every param when
/// `names` is `None`.
pub fn strip_param_bindings(spec: &mut Value, names: Option<&[String]>) {
    let Some(Value::Array(params)) = spec.get_mut("params") else {
        return;
    };
    for param in params.iter_mut() {
        let Value::Object(param) = param else {
            continue;
        };
        let listed = match names {
            None => true,
            Some(names) => param
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| names.iter().any(|n| n == name)),
        };
        if listed {
            param.remove("bind");
        }
    }
}

fn replace_first(text: &str, find: &str, replace: &str) -> String {
    text.replacen(find, replace, 1)
}

fn rewrite_text(value: &mut Value, find: &str, replace: &str) {
    match value {
        Value::String(text) if !text.is_empty() => *text = replace_first(text, find, replace),
        Value::Array(lines) => {
            for line in lines.iter_mut() {
                if let Value::String(text) = line {
                    *text = replace_first(text, find, replace);
                }
            }
        }
        _ => {}
    }
}

/// Find-and-replace on the subtitle of an object title, or on the title
/// itself when it is a plain string.
pub fn replace_subtitle(spec: &mut Value, find: &str, replace: &str) {
    match spec.get_mut("title") {
        Some(Value::Object(title)) => {
            if let Some(subtitle) = title.get_mut("subtitle") {
                rewrite_text(subtitle, find, replace);
            }
        }
        Some(title) if title.is_string() => rewrite_text(title, find, replace),
        _ => {}
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecTransform {
    StripBindings(Option<Vec<String>>),
    ApplyPalette,
    ReplaceSubtitle { find: String, replace: String },
}

impl SpecTransform {
    pub fn strip(names: &[&str]) -> Self {
        SpecTransform::StripBindings(Some(names.iter().map(|n| n.to_string()).collect()))
    }

    pub fn subtitle(find: &str, replace: &str) -> Self {
        SpecTransform::ReplaceSubtitle {
            find: find.to_string(),
            replace: replace.to_string(),
        }
    }

    pub fn apply(&self, spec: &mut Value, palette: &Palette) {
        match self {
            SpecTransform::StripBindings(names) => strip_param_bindings(spec, names.as_deref()),
            SpecTransform::ApplyPalette => apply_palette(spec, palette),
            SpecTransform::ReplaceSubtitle { find, replace } => {
                replace_subtitle(spec, find, replace)
            }
        }
    }
}

/// Ordered list of transforms run against one chart's spec.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<SpecTransform>,
}

impl Pipeline {
    pub fn new(steps: Vec<SpecTransform>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[SpecTransform] {
        &self.steps
    }

    pub fn apply(&self, mut spec: Value, palette: &Palette) -> Value {
        for step in &self.steps {
            step.apply(&mut spec, palette);
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{CAPITAL_NAMES, STATE_NAMES};
    use serde_json::json;

    fn sample_spec() -> Value {
        json!({
            "title": { "text": "Trend", "subtitle": "Use the dropdown to focus a state" },
            "params": [
                { "name": "yearParam", "value": 2022, "bind": { "input": "select" } },
                { "name": "focusState", "value": "All", "bind": { "input": "select" } },
                "not-an-object"
            ],
            "scales": [
                { "name": "color", "type": "ordinal", "domain": STATE_NAMES, "range": ["#fff"] },
                { "name": "x", "type": "linear", "domain": [0, 1] }
            ],
            "marks": [{
                "type": "group",
                "encoding": {
                    "color": { "scale": { "domain": CAPITAL_NAMES, "range": ["#000"] } },
                    "stroke": { "scale": { "range": ["a", "b", "c", "d", "e", "f", "g", "h"] } },
                    "fill": { "scale": "color" }
                }
            }]
        })
    }

    #[test]
    fn palette_repaints_known_domains_and_eight_entry_ranges() {
        let palette = Palette::from_css(|var| (var == "--nsw").then(|| "#123456".to_string()));
        let mut spec = sample_spec();
        apply_palette(&mut spec, &palette);

        let color = &spec["marks"][0]["encoding"]["color"]["scale"]["range"];
        assert_eq!(color, &json!(palette.capital_range));
        let stroke = &spec["marks"][0]["encoding"]["stroke"]["scale"]["range"];
        assert_eq!(stroke[0], "#123456");
        assert_eq!(spec["marks"][0]["encoding"]["fill"]["scale"], "color");
        assert_eq!(spec["config"]["range"]["category"], json!(palette.state_range));
        // top-level scales use `domain` directly, not `scale.domain`
        assert_eq!(spec["scales"][0]["range"], json!(["#fff"]));
    }

    #[test]
    fn palette_is_idempotent() {
        let palette = Palette::default();
        let mut once = sample_spec();
        apply_palette(&mut once, &palette);
        let mut twice = once.clone();
        apply_palette(&mut twice, &palette);
        assert_eq!(once, twice);
    }

    #[test]
    fn palette_keeps_full_category_and_schemes() {
        let palette = Palette::default();
        let full = json!(["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        let mut spec = json!({ "config": { "range": { "category": full.clone() } } });
        apply_palette(&mut spec, &palette);
        assert_eq!(spec["config"]["range"]["category"], full);

        let mut scheme = json!({ "config": { "range": { "category": { "scheme": "tableau10" } } } });
        apply_palette(&mut scheme, &palette);
        assert_eq!(scheme["config"]["range"]["category"], json!({ "scheme": "tableau10" }));

        let mut short = json!({ "config": null });
        apply_palette(&mut short, &palette);
        assert_eq!(short["config"]["range"]["category"], json!(palette.state_range));
    }

    #[test]
    fn palette_copies_range_per_scale() {
        let palette = Palette::default();
        let mut spec = json!({
            "a": { "scale": { "domain": STATE_NAMES } },
            "b": { "scale": { "domain": STATE_NAMES } }
        });
        apply_palette(&mut spec, &palette);
        spec["a"]["scale"]["range"][0] = json!("changed");
        assert_eq!(spec["b"]["scale"]["range"][0], json!(palette.state_range[0]));
    }

    #[test]
    fn strip_only_listed_bindings() {
        let mut spec = sample_spec();
        strip_param_bindings(&mut spec, Some(&["yearParam".to_string()]));
        assert!(spec["params"][0].get("bind").is_none());
        assert_eq!(spec["params"][1]["bind"], json!({ "input": "select" }));
        assert_eq!(spec["params"][1]["value"], "All");
        assert_eq!(spec["params"][2], "not-an-object");
    }

    #[test]
    fn strip_all_bindings_without_list() {
        let mut spec = sample_spec();
        strip_param_bindings(&mut spec, None);
        assert!(spec["params"][0].get("bind").is_none());
        assert!(spec["params"][1].get("bind").is_none());
        assert_eq!(spec["params"][0]["value"], 2022);

        let mut no_params = json!({ "params": "nope" });
        strip_param_bindings(&mut no_params, None);
        assert_eq!(no_params, json!({ "params": "nope" }));
    }

    #[test]
    fn subtitle_rewrites() {
        let mut spec = sample_spec();
        replace_subtitle(&mut spec, "Use the dropdown", "Use the highlight selector");
        assert_eq!(
            spec["title"]["subtitle"],
            "Use the highlight selector to focus a state"
        );
        assert_eq!(spec["title"]["text"], "Trend");

        let mut plain = json!({ "title": "Year selector below, Year selector below" });
        replace_subtitle(&mut plain, "Year selector below", "Year dropdown above");
        assert_eq!(plain["title"], "Year dropdown above, Year selector below");

        let mut lines = json!({ "title": { "subtitle": ["Year selector below", 3] } });
        replace_subtitle(&mut lines, "Year selector below", "Year dropdown above");
        assert_eq!(lines["title"]["subtitle"], json!(["Year dropdown above", 3]));

        let mut missing = json!({ "title": { "text": "x" } });
        replace_subtitle(&mut missing, "a", "b");
        assert_eq!(missing, json!({ "title": { "text": "x" } }));
    }

    #[test]
    fn pipeline_runs_in_order() {
        let pipeline = Pipeline::new(vec![
            SpecTransform::strip(&["focusState"]),
            SpecTransform::ApplyPalette,
            SpecTransform::subtitle("dropdown", "highlight selector"),
        ]);
        let out = pipeline.apply(sample_spec(), &Palette::default());
        assert!(out["params"][1].get("bind").is_none());
        assert!(out["params"][0].get("bind").is_some());
        assert!(out["config"]["range"]["category"].is_array());
        assert_eq!(
            out["title"]["subtitle"],
            "Use the highlight selector to focus a state"
        );
    }
}
