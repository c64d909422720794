use super::SectionTag;
use crate::models::{NOT_AVAILABLE, Place, WeatherReading};
use crate::ranking::Assembly;

pub const NO_PLACES_BODY: &str = "No places found.";
pub const NO_REVIEWS_BODY: &str = "No reviews info.";
pub const NO_TRANSPORT_BODY: &str = "No transport info.";

fn weather_body(weather: &WeatherReading) -> String {
    let temperature = weather
        .temperature
        .map_or_else(|| NOT_AVAILABLE.to_string(), |t| format!("{t}°C"));
    let wind = weather
        .wind
        .map_or_else(|| NOT_AVAILABLE.to_string(), |w| format!("{w} km/h"));

    let mut lines = vec![
        format!("Temperature: {temperature}"),
        format!("Wind speed: {wind}"),
    ];
    if let Some(alert) = &weather.alert {
        lines.push(format!("Alert: {alert}"));
    }
    lines.join("\n")
}

fn place_line(place: &Place) -> String {
    format!("• {} ([map]({}))", place.name, place.link)
}

fn review_line(place: &Place) -> String {
    format!(
        "⭐ {:.1} — {} ([map]({}))",
        place.effective_rating(),
        place.name,
        place.link
    )
}

fn lines_of(places: &[Place], line: fn(&Place) -> String) -> String {
    places.iter().map(line).collect::<Vec<_>>().join("\n")
}

/// Serialize the four payloads into one tagged blob, in protocol order.
///
/// `transport` is the advisor block for `assembly.top`; it is replaced by the
/// no-info body when the assembly holds no places at all.
#[must_use]
pub fn compose(weather: &WeatherReading, assembly: &Assembly, transport: &str) -> String {
    let (places, reviews, transport) = if assembly.is_empty() {
        (
            NO_PLACES_BODY.to_string(),
            NO_REVIEWS_BODY.to_string(),
            NO_TRANSPORT_BODY.to_string(),
        )
    } else {
        (
            lines_of(&assembly.places, place_line),
            lines_of(&assembly.top, review_line),
            transport.to_string(),
        )
    };

    let bodies = [weather_body(weather), places, reviews, transport];
    SectionTag::ALL
        .iter()
        .zip(bodies)
        .map(|(tag, body)| format!("{tag}\n{body}\n"))
        .collect()
}
