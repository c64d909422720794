//! Best-effort decoding of a tagged blob
//!
//! Each section is decoded on its own through a short ladder of decoders,
//! tried in order until one recovers something. A section that defeats
//! every decoder falls back to its default and never disturbs the others.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

use super::{SectionTag, split_sections};
use crate::models::WeatherReading;
use crate::ranking::coerce_f64;
use crate::{NearbyAiError, Result};

pub const DEFAULT_PLACES: &str = "No places found";
pub const DEFAULT_REVIEWS: &str = "No reviews info";
pub const DEFAULT_TRANSPORT: &str = "No transport info";

static TEMPERATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\btemp(?:erature)?(?:\s+(?:is|of|at))?[\s:=]+(-?\d+(?:\.\d+)?|n/?a\b)")
        .expect("temperature pattern is valid")
});

static WIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwind(?:\s*speed)?(?:\s+(?:is|of|at))?[\s:=]+(-?\d+(?:\.\d+)?|n/?a\b)")
        .expect("wind pattern is valid")
});

static ALERT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)\balerts?\s*:\s*(.*)$").expect("alert pattern is valid")
});

static PY_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(None|True|False)\b").expect("literal pattern is valid")
});

static LINKED_REVIEW_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"⭐[^—\n]*—\s*([^\n]+?)\s*\(\[map\]").expect("linked review name pattern is valid")
});

static REVIEW_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"⭐[^—\n]*—\s*([^,(\n]+)").expect("review name pattern is valid")
});

const ALERT_GLYPH: char = '⚠';

/// One decoding attempt; `None` hands over to the next rung
type Decoder<T> = fn(&str) -> Option<T>;

/// Run `ladder` over a section body, stopping at the first success
fn decode_section<T>(tag: SectionTag, raw: Option<&str>, ladder: &[(&str, Decoder<T>)]) -> Option<T> {
    let Some(text) = raw.filter(|t| !t.is_empty()) else {
        debug!("{} section missing or empty, using default", tag);
        return None;
    };

    for (name, decoder) in ladder {
        if let Some(value) = decoder(text) {
            return Some(value);
        }
        debug!("{} section: {} decoder did not match", tag, name);
    }

    debug!("{} section undecodable, using default", tag);
    None
}

/// Payloads recovered from one blob
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedResponse {
    pub weather: WeatherReading,
    pub places: String,
    pub reviews: String,
    pub transport: String,
}

impl Default for ParsedResponse {
    fn default() -> Self {
        Self {
            weather: WeatherReading::default(),
            places: DEFAULT_PLACES.to_string(),
            reviews: DEFAULT_REVIEWS.to_string(),
            transport: DEFAULT_TRANSPORT.to_string(),
        }
    }
}

/// A transport line split at its first arrow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEntry {
    pub place: String,
    pub info: String,
}

impl ParsedResponse {
    /// Review block cut into chunks that each start at a star
    #[must_use]
    pub fn review_chunks(&self) -> Vec<&str> {
        let mut starts: Vec<usize> = self.reviews.match_indices('⭐').map(|(i, _)| i).collect();
        if starts.first() != Some(&0) {
            starts.insert(0, 0);
        }
        starts.push(self.reviews.len());

        starts
            .windows(2)
            .map(|w| self.reviews[w[0]..w[1]].trim())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    #[must_use]
    pub fn transport_entries(&self) -> Vec<TransportEntry> {
        self.transport
            .lines()
            .map(str::trim)
            .filter_map(|line| line.split_once('→'))
            .map(|(place, info)| TransportEntry {
                place: place.trim().to_string(),
                info: info.trim().to_string(),
            })
            .collect()
    }

    /// Transport info for a place name; later lines win on duplicates.
    /// A name cut at its first comma still finds the full address entry.
    #[must_use]
    pub fn transport_for(&self, place: &str) -> Option<String> {
        let entries = self.transport_entries();
        let address_prefix = format!("{place},");
        entries
            .iter()
            .rev()
            .find(|entry| entry.place == place)
            .or_else(|| {
                entries
                    .iter()
                    .rev()
                    .find(|entry| entry.place.starts_with(&address_prefix))
            })
            .map(|entry| entry.info.clone())
    }
}

/// Place name of a review chunk such as `⭐ 4.5 — Cafe ([map](...))`.
/// Without a map link the name stops at the first comma.
#[must_use]
pub fn review_place_name(chunk: &str) -> Option<&str> {
    [&*LINKED_REVIEW_NAME_RE, &*REVIEW_NAME_RE]
        .into_iter()
        .find_map(|re| re.captures(chunk).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

/// Decode every section of `blob` independently
#[must_use]
pub fn parse_response(blob: &str) -> ParsedResponse {
    let sections = split_sections(blob);

    let weather = decode_section::<WeatherReading>(
        SectionTag::Weather,
        sections.get(SectionTag::Weather),
        &[
            ("structured", structured_weather as Decoder<WeatherReading>),
            ("labeled", labeled_weather),
            ("verbatim", verbatim_weather),
        ],
    )
    .unwrap_or_default();

    ParsedResponse {
        weather,
        places: text_section(
            SectionTag::Places,
            sections.get(SectionTag::Places),
            places_verbatim,
            DEFAULT_PLACES,
        ),
        reviews: text_section(
            SectionTag::Reviews,
            sections.get(SectionTag::Reviews),
            reviews_verbatim,
            DEFAULT_REVIEWS,
        ),
        transport: text_section(
            SectionTag::Transport,
            sections.get(SectionTag::Transport),
            transport_verbatim,
            DEFAULT_TRANSPORT,
        ),
    }
}

fn text_section(tag: SectionTag, raw: Option<&str>, decoder: Decoder<String>, default: &str) -> String {
    decode_section(tag, raw, &[("verbatim", decoder)]).unwrap_or_else(|| default.to_string())
}

/// Lowercased with surrounding whitespace and a trailing period removed
fn normalize_sentinel(text: &str) -> String {
    text.trim().trim_end_matches('.').trim().to_lowercase()
}

fn verbatim_unless(text: &str, sentinels: &[&str]) -> Option<String> {
    let normalized = normalize_sentinel(text);
    (!normalized.is_empty() && !sentinels.contains(&normalized.as_str())).then(|| text.to_string())
}

fn places_verbatim(text: &str) -> Option<String> {
    verbatim_unless(text, &["none", "no places found", "no places info"])
}

fn reviews_verbatim(text: &str) -> Option<String> {
    verbatim_unless(text, &["none", "no reviews info", "no places found"])
}

fn transport_verbatim(text: &str) -> Option<String> {
    verbatim_unless(
        text,
        &["none", "no transport info", "no top places found for routing"],
    )
}

/// Convert a Python-style dict literal into JSON and decode it
fn decode_map(text: &str) -> Result<Map<String, Value>> {
    let quoted = text.replace('\'', "\"");
    let json = PY_LITERAL_RE.replace_all(&quoted, |caps: &regex::Captures| {
        match &caps[1] {
            "None" => "null",
            "True" => "true",
            _ => "false",
        }
    });
    serde_json::from_str(&json).map_err(|e| NearbyAiError::parse(format!("weather map: {e}")))
}

fn alert_value(value: &Value) -> Option<String> {
    let alert = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };
    (!alert.is_empty() && !is_no_alert(&alert)).then_some(alert)
}

fn first_of<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}

fn structured_weather(text: &str) -> Option<WeatherReading> {
    if !(text.starts_with('{') && text.ends_with('}')) {
        return None;
    }

    let map = match decode_map(text) {
        Ok(map) => map,
        Err(e) => {
            debug!("{}", e);
            return None;
        }
    };

    Some(WeatherReading {
        temperature: first_of(&map, &["temperature", "temp"]).and_then(coerce_f64),
        wind: first_of(&map, &["wind", "wind_speed", "windspeed"]).and_then(coerce_f64),
        alert: first_of(&map, &["alert", "alerts"]).and_then(alert_value),
    })
}

fn is_no_alert(alert: &str) -> bool {
    matches!(
        normalize_sentinel(alert).as_str(),
        "none" | "n/a" | "no alerts" | "no active alerts"
    )
}

/// `None` when the label is absent, `Some(None)` for a labeled `N/A`
fn labeled_f64(re: &Regex, text: &str) -> Option<Option<f64>> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<f64>().ok())
}

fn labeled_weather(text: &str) -> Option<WeatherReading> {
    let temperature = labeled_f64(&TEMPERATURE_RE, text);
    let wind = labeled_f64(&WIND_RE, text);

    // an explicit "Alert: none" still counts as recognized
    let keyword_alert = ALERT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('.').trim_end());
    let (alert_found, alert) = match keyword_alert {
        Some(value) => (true, Some(value).filter(|v| !v.is_empty() && !is_no_alert(v))),
        None => {
            let line = text.lines().map(str::trim).find(|l| l.contains(ALERT_GLYPH));
            (line.is_some(), line)
        }
    };

    if temperature.is_none() && wind.is_none() && !alert_found {
        return None;
    }

    Some(WeatherReading {
        temperature: temperature.flatten(),
        wind: wind.flatten(),
        alert: alert.map(str::to_string),
    })
}

fn verbatim_weather(text: &str) -> Option<WeatherReading> {
    Some(WeatherReading {
        alert: Some(text.to_string()),
        ..WeatherReading::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Place};
    use crate::ranking::assemble;
    use crate::sections::compose;
    use rstest::rstest;

    #[test]
    fn test_labeled_weather_with_empty_sections() {
        let parsed =
            parse_response("[WEATHER]\nTemperature: 21.5\nWind: 10\n[PLACES]\n[REVIEWS]\n[TRANSPORT]");

        assert_eq!(parsed.weather.temperature, Some(21.5));
        assert_eq!(parsed.weather.wind, Some(10.0));
        assert_eq!(parsed.weather.format_alert(), "N/A");
        assert_eq!(parsed.places, DEFAULT_PLACES);
        assert_eq!(parsed.reviews, DEFAULT_REVIEWS);
        assert_eq!(parsed.transport, DEFAULT_TRANSPORT);
    }

    #[test]
    fn test_missing_transport_leaves_other_sections_alone() {
        let parsed = parse_response(
            "[WEATHER]\nTemperature: 18°C\n[PLACES]\n• Cafe\n• Park\n[REVIEWS]\n⭐ 4.5 — Cafe\n",
        );
        assert_eq!(parsed.weather.temperature, Some(18.0));
        assert_eq!(parsed.places, "• Cafe\n• Park");
        assert_eq!(parsed.reviews, "⭐ 4.5 — Cafe");
        assert_eq!(parsed.transport, DEFAULT_TRANSPORT);
    }

    #[test]
    fn test_freeform_weather_becomes_alert() {
        let parsed = parse_response("[WEATHER]\nClear skies and a light breeze all afternoon\n[PLACES]\nnone");
        assert_eq!(parsed.weather.temperature, None);
        assert_eq!(parsed.weather.wind, None);
        assert_eq!(
            parsed.weather.alert.as_deref(),
            Some("Clear skies and a light breeze all afternoon")
        );
        assert_eq!(parsed.weather.format_temperature(), "N/A");
        assert_eq!(parsed.places, DEFAULT_PLACES);
    }

    #[test]
    fn test_no_tags_degrades_to_defaults() {
        assert_eq!(
            parse_response("Sorry, I had trouble reaching the tools."),
            ParsedResponse::default()
        );
    }

    #[test]
    fn test_reordered_sections() {
        let parsed = parse_response(
            "[TRANSPORT]\nCafe → 🚶 0.3 km\n[REVIEWS]\n⭐ 4.0 — Cafe\n[WEATHER]\nwind speed 12 km/h\n[PLACES]\n• Cafe",
        );
        assert_eq!(parsed.transport, "Cafe → 🚶 0.3 km");
        assert_eq!(parsed.reviews, "⭐ 4.0 — Cafe");
        assert_eq!(parsed.weather.wind, Some(12.0));
        assert_eq!(parsed.places, "• Cafe");
    }

    #[rstest]
    #[case("{'temperature': 22.4, 'wind': 7, 'alert': None}", Some(22.4), Some(7.0), None)]
    #[case("{'temp': '19.5', 'windspeed': '3.2', 'alert': 'Fog'}", Some(19.5), Some(3.2), Some("Fog"))]
    #[case("{\"temperature\": null, \"alerts\": [\"Heat\", \"Dust\"]}", None, None, Some("Heat, Dust"))]
    fn test_structured_weather(
        #[case] body: &str,
        #[case] temperature: Option<f64>,
        #[case] wind: Option<f64>,
        #[case] alert: Option<&str>,
    ) {
        let parsed = parse_response(&format!("[WEATHER]\n{body}\n[PLACES]\n• A"));
        assert_eq!(parsed.weather.temperature, temperature);
        assert_eq!(parsed.weather.wind, wind);
        assert_eq!(parsed.weather.alert.as_deref(), alert);
    }

    #[test]
    fn test_labeled_not_available_is_not_freeform() {
        let weather = parse_response("[WEATHER]\nTemperature: N/A\nWind speed: N/A\n[PLACES]").weather;
        assert!(weather.is_empty());
    }

    #[test]
    fn test_malformed_map_falls_through_to_labels() {
        let parsed = parse_response("[WEATHER]\n{temperature: 30, wind: oops}");
        assert_eq!(parsed.weather.temperature, Some(30.0));
        assert_eq!(parsed.weather.wind, None);
    }

    #[rstest]
    #[case("Temperature: -4.5°C\nWind speed: 20 km/h\nAlert: Snow storm. Stay home.", Some("Snow storm. Stay home"))]
    #[case("Temp 30\n⚠️ Heat Advisory in effect", Some("⚠️ Heat Advisory in effect"))]
    #[case("The temperature is 25 degrees. Alerts: none", None)]
    #[case("Alert: ⚠️ Thunderstorm", Some("⚠️ Thunderstorm"))]
    fn test_labeled_alerts(#[case] body: &str, #[case] alert: Option<&str>) {
        let weather = parse_response(&format!("[WEATHER]\n{body}")).weather;
        assert_eq!(weather.alert.as_deref(), alert);
    }

    #[test]
    fn test_labeled_numbers() {
        let weather = parse_response("[WEATHER]\nTemperature: -4.5°C\nWind speed: 20 km/h").weather;
        assert_eq!(weather.temperature, Some(-4.5));
        assert_eq!(weather.wind, Some(20.0));

        let weather = parse_response("[WEATHER]\nThe temperature is 25 degrees").weather;
        assert_eq!(weather.temperature, Some(25.0));
        assert_eq!(weather.alert, None);
    }

    #[rstest]
    #[case("None", DEFAULT_PLACES)]
    #[case("No places found.", DEFAULT_PLACES)]
    #[case("  no PLACES info  ", DEFAULT_PLACES)]
    #[case("• Lalbagh", "• Lalbagh")]
    fn test_places_sentinels(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(parse_response(&format!("[PLACES]\n{body}")).places, expected);
    }

    #[rstest]
    #[case("No top places found for routing.", DEFAULT_TRANSPORT)]
    #[case("no transport info", DEFAULT_TRANSPORT)]
    #[case("No places found.", "No places found.")]
    fn test_transport_sentinels(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(parse_response(&format!("[TRANSPORT]\n{body}")).transport, expected);
    }

    #[test]
    fn test_reviews_sentinel_shared_with_places() {
        assert_eq!(parse_response("[REVIEWS]\nNo places found.").reviews, DEFAULT_REVIEWS);
    }

    #[test]
    fn test_review_chunks_and_names() {
        let parsed = ParsedResponse {
            reviews: "Top picks:\n⭐ 4.8 — Toit ([map](x))\n\n⭐ 4.1 — Cubbon Park, Bengaluru\n⭐".to_string(),
            ..ParsedResponse::default()
        };
        let chunks = parsed.review_chunks();
        assert_eq!(
            chunks,
            vec!["Top picks:", "⭐ 4.8 — Toit ([map](x))", "⭐ 4.1 — Cubbon Park, Bengaluru", "⭐"]
        );
        assert_eq!(review_place_name(chunks[1]), Some("Toit"));
        assert_eq!(review_place_name(chunks[2]), Some("Cubbon Park"));
        assert_eq!(review_place_name(chunks[0]), None);
    }

    #[rstest]
    #[case("⭐ 4.0 — Cubbon Park, Bengaluru, Karnataka ([map](x))", "Cubbon Park, Bengaluru, Karnataka")]
    #[case("⭐ 3.5 — Arbor (Brewing) ([map](x))", "Arbor (Brewing)")]
    #[case("⭐ 4.2 — Lalbagh, Bengaluru", "Lalbagh")]
    fn test_review_place_name(#[case] chunk: &str, #[case] expected: &str) {
        assert_eq!(review_place_name(chunk), Some(expected));
    }

    #[test]
    fn test_transport_for_address_names() {
        let parsed = ParsedResponse {
            transport: "Cubbon Park, Bengaluru → 🚶 0.3 km\nCubbon Parkway → 🛵 1.1 km".to_string(),
            ..ParsedResponse::default()
        };
        assert_eq!(
            parsed.transport_for("Cubbon Park, Bengaluru").as_deref(),
            Some("🚶 0.3 km")
        );
        assert_eq!(parsed.transport_for("Cubbon Park").as_deref(), Some("🚶 0.3 km"));
        assert_eq!(parsed.transport_for("Cubbon").as_deref(), None);
    }

    #[test]
    fn test_transport_entries() {
        let parsed = ParsedResponse {
            transport: "Toit → 🚶 0.3 km → 🚌 500D 4.2 km\n\nno arrow here\n  Lalbagh → **🚇 3.1 km — Metro recommended.**  "
                .to_string(),
            ..ParsedResponse::default()
        };
        let entries = parsed.transport_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].place, "Toit");
        assert_eq!(entries[0].info, "🚶 0.3 km → 🚌 500D 4.2 km");
        assert_eq!(
            parsed.transport_for("Lalbagh").as_deref(),
            Some("**🚇 3.1 km — Metro recommended.**")
        );
        assert_eq!(parsed.transport_for("Nowhere"), None);
    }

    #[test]
    fn test_compose_then_parse_recovers_sections() {
        let weather = WeatherReading {
            temperature: Some(26.0),
            wind: Some(13.5),
            alert: Some("⚠️ Heat Adv. until 5 p.m".to_string()),
        };
        let places: Vec<Place> = [("Toit", 12.979, Some(4.7)), ("Lalbagh, Bengaluru", 12.9507, None)]
            .into_iter()
            .map(|(name, lat, rating)| Place {
                name: name.to_string(),
                coordinates: Coordinates {
                    latitude: lat,
                    longitude: 77.64,
                },
                rating,
                address: String::new(),
                link: String::new(),
            })
            .collect();
        let assembly = assemble(places, 3);
        let transport = "Toit → 🚶 0.4 km\nLalbagh, Bengaluru → **🚇 3.1 km — Metro recommended.**";

        let blob = compose(&weather, &assembly, transport);
        let sections = split_sections(&blob);
        let parsed = parse_response(&blob);

        assert_eq!(parsed.weather, weather);
        assert_eq!(Some(parsed.places.as_str()), sections.places);
        assert_eq!(Some(parsed.reviews.as_str()), sections.reviews);
        assert_eq!(parsed.transport, transport);
        assert_eq!(parsed.review_chunks().len(), 2);
        assert_eq!(
            review_place_name(parsed.review_chunks()[1]),
            Some("Lalbagh, Bengaluru")
        );
    }
}
