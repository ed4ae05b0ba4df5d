//! Display text derived from control values.

/// Financial-year labels for the years the data covers.
pub const YEAR_LABELS: [(i64, &str); 5] = [
    (2018, "2017–18"),
    (2019, "2018–19"),
    (2020, "2019–20"),
    (2021, "2020–21"),
    (2022, "2021–22"),
];

/// Label for a year value; years outside the table render as
/// `"{year-1}–{year}"`.
pub fn year_label(year: f64) -> String {
    if year.is_finite() && year.fract() == 0.0 {
        let whole = year as i64;
        if let Some((_, label)) = YEAR_LABELS.iter().find(|(y, _)| *y == whole) {
            return (*label).to_string();
        }
    }
    format!("{}–{}", js_display(year - 1.0), js_display(year))
}

fn js_display(value: f64) -> String {
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}Infinity")
    } else {
        value.to_string()
    }
}

/// Numeric coercion of form-control text: surrounding whitespace is
/// ignored, blank text is zero, and anything else non-numeric is NaN.
pub fn js_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned == "Infinity" {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let plain = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !plain {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Short region name shown next to the summary figures.
///
/// Uses the trimmed text of the `<option>` whose value matches, otherwise
/// the value minus its first `"Greater "` prefix.
pub fn region_label<'a, I>(value: &str, options: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    if value.is_empty() {
        return String::new();
    }
    options
        .into_iter()
        .find(|(option_value, _)| *option_value == value)
        .map(|(_, text)| text.trim().to_string())
        .unwrap_or_else(|| value.replacen("Greater ", "", 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_years_use_literal_labels() {
        for (year, label) in YEAR_LABELS {
            assert_eq!(year_label(year as f64), label);
        }
        assert_eq!(year_label(2020.0), "2019–20");
    }

    #[test]
    fn other_years_use_computed_range() {
        assert_eq!(year_label(2023.0), "2022–2023");
        assert_eq!(year_label(2015.0), "2014–2015");
        assert_eq!(year_label(0.0), "-1–0");
        assert_eq!(year_label(f64::NAN), "NaN–NaN");
        assert_eq!(year_label(f64::INFINITY), "Infinity–Infinity");
        assert_eq!(year_label(f64::NEG_INFINITY), "-Infinity–-Infinity");
    }

    #[test]
    fn number_coercion() {
        assert_eq!(js_number("2021"), 2021.0);
        assert_eq!(js_number(" 2020 "), 2020.0);
        assert_eq!(js_number(""), 0.0);
        assert_eq!(js_number("1e3"), 1000.0);
        assert_eq!(js_number("-Infinity"), f64::NEG_INFINITY);
        assert!(js_number("inf").is_nan());
        assert!(js_number("twenty").is_nan());
        assert!(js_number("20-21").is_nan());
    }

    #[test]
    fn at_most_one_sign_is_accepted() {
        assert_eq!(js_number("+Infinity"), f64::INFINITY);
        assert!(js_number("+-Infinity").is_nan());
        assert!(js_number("--Infinity").is_nan());
        assert!(js_number("--2020").is_nan());
    }

    #[test]
    fn region_label_prefers_option_text() {
        let options = [("Australia", "Australia"), ("Greater Sydney", " Sydney ")];
        assert_eq!(region_label("Greater Sydney", options), "Sydney");
        assert_eq!(region_label("Greater Perth", options), "Perth");
        assert_eq!(region_label("Rest of Vic.", options), "Rest of Vic.");
        assert_eq!(region_label("", options), "");
    }
}
