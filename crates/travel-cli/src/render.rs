use std::fmt::Write as _;

use travel_core::stats::TravelStats;
use travel_core::{City, Mutation, SyncOutcome};

pub fn city_line(city: &City) -> String {
    let mark = if city.visited { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{mark} {} {} ({}) · {}",
        city.emoji, city.name, city.country, city.id
    );
    if city.is_custom {
        line.push_str(" · custom");
    }
    if let Some(date) = city.visited_date {
        let _ = write!(line, " · visited {}", date.format("%Y-%m-%d"));
    }
    line
}

pub fn city_list(cities: &[&City]) -> String {
    if cities.is_empty() {
        return "No cities match.".to_string();
    }
    cities
        .iter()
        .map(|city| city_line(city))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats_summary(stats: &TravelStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Cities: {}/{} visited ({:.1}%)",
        stats.visited_cities, stats.total_cities, stats.completion_percentage
    );
    let _ = writeln!(
        out,
        "Countries: {}/{}",
        stats.visited_countries.len(),
        stats.total_countries
    );
    let _ = writeln!(
        out,
        "Continents: {}/{}",
        stats.visited_continents.len(),
        stats.total_continents
    );
    let _ = write!(out, "Custom cities: {}", stats.custom_cities);

    if !stats.visited_continents.is_empty() {
        let names: Vec<&str> = stats
            .visited_continents
            .iter()
            .map(|continent| continent.as_str())
            .collect();
        let _ = write!(out, "\nContinents explored: {}", names.join(", "));
    }
    if !stats.visited_countries.is_empty() {
        let _ = write!(
            out,
            "\nCountries visited: {}",
            stats.visited_countries.join(", ")
        );
    }
    out
}

pub fn mutation_summary(action: &str, mutation: &Mutation, sync: Option<&SyncOutcome>) -> String {
    let mut out = match (&mutation.applied, &mutation.city_id) {
        (true, Some(id)) => format!("{action}: {id}"),
        (true, None) => format!("{action}: done"),
        (false, _) => format!("{action}: no change"),
    };
    if let Some(warning) = &mutation.warning {
        let _ = write!(out, "\nwarning: {warning}");
    }
    if let Some(error) = sync.and_then(|outcome| outcome.error.as_deref()) {
        let _ = write!(out, "\nwarning: mirror sync failed: {error}");
    }
    out
}

#[cfg(test)]
mod tests {
    use travel_core::stats;
    use travel_core::{Coordinates, Importance, PersistWarning};

    use super::*;

    fn fixture_city(visited: bool) -> City {
        City {
            id: "custom-1-00000001".to_string(),
            name: "Cabin".to_string(),
            country: "Norway".to_string(),
            coordinates: Coordinates::new(61.0, 8.0),
            visited,
            visited_date: visited
                .then(|| chrono::DateTime::from_timestamp(1_767_225_600, 0))
                .flatten(),
            emoji: "🌲".to_string(),
            is_custom: true,
            importance: Importance::Small,
            population: None,
        }
    }

    #[test]
    fn render_city_line_marks_visit_and_custom() {
        assert_eq!(
            city_line(&fixture_city(false)),
            "[ ] 🌲 Cabin (Norway) · custom-1-00000001 · custom"
        );
        assert!(city_line(&fixture_city(true)).ends_with("· visited 2026-01-01"));
    }

    #[test]
    fn render_empty_list_has_placeholder() {
        assert_eq!(city_list(&[]), "No cities match.");
    }

    #[test]
    fn render_stats_summary_lists_counts() {
        let cities = vec![fixture_city(true)];
        let summary = stats_summary(&stats::compute(&cities));

        assert!(summary.starts_with("Cities: 1/1 visited (100.0%)"));
        assert!(summary.contains("Countries visited: Norway"));
        assert!(!summary.contains("Continents explored"));
    }

    #[test]
    fn render_mutation_includes_warnings() {
        let mutation = Mutation {
            applied: true,
            city_id: Some("paris".to_string()),
            warning: Some(PersistWarning {
                key: "travelMapCities".to_string(),
                message: "disk full".to_string(),
            }),
        };
        let sync = SyncOutcome {
            rows: 0,
            error: Some("mirror api error (503): HTTP 503".to_string()),
        };

        let text = mutation_summary("toggled", &mutation, Some(&sync));

        assert!(text.starts_with("toggled: paris"));
        assert!(text.contains("not saved"));
        assert!(text.contains("mirror sync failed"));
        assert_eq!(
            mutation_summary("removed", &Mutation::default(), None),
            "removed: no change"
        );
    }
}
