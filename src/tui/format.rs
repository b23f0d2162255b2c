//! Text formatting for results, shared by the TUI and the one-shot binary.

use crate::domain::{display_name, CountryProbability, Gender, InferenceResult};
use crate::NameprobeError;

const UNKNOWN: &str = "unknown";

#[must_use]
pub fn format_age(age: Option<u32>) -> String {
    age.map_or_else(|| UNKNOWN.to_string(), |a| a.to_string())
}

#[must_use]
pub fn format_gender(gender: Option<Gender>) -> String {
    gender.map_or_else(|| UNKNOWN.to_string(), |g| g.to_string())
}

/// Probability as a percentage with two decimals, e.g. `80.00%`.
#[must_use]
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// `Nigeria (80.00%)`; unknown codes are shown as-is.
#[must_use]
pub fn country_line(country: &CountryProbability) -> String {
    format!(
        "{} ({})",
        display_name(&country.country_code),
        format_probability(country.probability)
    )
}

/// Fixed-width bar, e.g. `████░░░░░░` for 0.4 at width 10.
#[must_use]
pub fn probability_bar(probability: f64, width: usize) -> String {
    let filled = (probability.clamp(0.0, 1.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// Multi-line plain-text report.
#[must_use]
pub fn report(name: &str, result: &InferenceResult) -> String {
    let mut out = format!(
        "Results for {name}\nAge: {}\nGender: {}\nProbable Nationalities:\n",
        format_age(result.age),
        format_gender(result.gender)
    );
    if result.countries.is_empty() {
        out.push_str("  (none)\n");
    }
    for country in &result.countries {
        out.push_str("  ");
        out.push_str(&country_line(country));
        out.push('\n');
    }
    out
}

/// JSON report with display names added next to the raw codes.
///
/// # Errors
/// Returns `NameprobeError::Serialization` if encoding fails.
pub fn report_json(name: &str, result: &InferenceResult) -> Result<String, NameprobeError> {
    let countries: Vec<serde_json::Value> = result
        .countries
        .iter()
        .map(|c| {
            serde_json::json!({
                "country_id": c.country_code,
                "country_name": display_name(&c.country_code),
                "probability": c.probability,
            })
        })
        .collect();

    let value = serde_json::json!({
        "name": name,
        "age": result.age,
        "gender": result.gender,
        "countries": countries,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
