//! Rendering of parsed payloads into the two display surfaces

use serde::{Deserialize, Serialize};

use crate::models::{NOT_AVAILABLE, WeatherReading};
use crate::sections::ParsedResponse;
use crate::sections::parse::review_place_name;

pub const ANSWER_HEADER: &str = "**⭐ Top Reviews & 🚗 Transport Suggestions**";

const WEATHER_KEYWORDS: [&str; 3] = ["weather", "temperature", "wind"];

/// Structured sidebar content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarPanels {
    pub alert: String,
    pub temperature: String,
    pub wind: String,
    pub places: String,
    pub reviews: String,
    pub transport: String,
}

/// Panels plus the conversational answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub panels: SidebarPanels,
    pub answer: String,
}

/// Trimmed non-blank lines separated by blank lines
fn spaced_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1}"))
}

fn is_weather_query(query: &str) -> bool {
    let query = query.to_lowercase();
    WEATHER_KEYWORDS.iter().any(|k| query.contains(k))
}

fn weather_answer(weather: &WeatherReading) -> String {
    format!(
        "The current temperature is {} degrees Celsius with a wind speed of {} km/h.",
        one_decimal(weather.temperature),
        one_decimal(weather.wind)
    )
}

fn reviews_answer(parsed: &ParsedResponse) -> String {
    let mut blocks = vec![ANSWER_HEADER.to_string()];
    for chunk in parsed.review_chunks() {
        blocks.push(chunk.to_string());
        if let Some(info) = review_place_name(chunk).and_then(|name| parsed.transport_for(name)) {
            blocks.push(format!("🚗 {info}"));
        }
    }
    blocks.join("\n\n")
}

/// Derive panels and answer from the same parsed payloads
#[must_use]
pub fn render(parsed: &ParsedResponse, query: &str) -> Rendered {
    let panels = SidebarPanels {
        alert: parsed.weather.format_alert(),
        temperature: parsed.weather.format_temperature(),
        wind: parsed.weather.format_wind(),
        places: spaced_lines(&parsed.places),
        reviews: spaced_lines(&parsed.reviews),
        transport: spaced_lines(&parsed.transport),
    };

    let answer = if is_weather_query(query) {
        weather_answer(&parsed.weather)
    } else {
        reviews_answer(parsed)
    };

    Rendered { panels, answer }
}
