use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::continents::{Continent, continent_for};
use crate::model::City;

/// Aggregate travel statistics, recomputed from the collection on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelStats {
    pub total_cities: usize,
    pub visited_cities: usize,
    pub custom_cities: usize,
    pub total_countries: usize,
    pub visited_countries: Vec<String>,
    pub total_continents: usize,
    pub visited_continents: Vec<Continent>,
    pub completion_percentage: f64,
    pub countries: Vec<CountryBreakdown>,
    pub continents: Vec<ContinentBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryBreakdown {
    pub name: String,
    pub continent: Option<Continent>,
    pub visited_cities: usize,
    pub total_cities: usize,
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinentBreakdown {
    pub name: Continent,
    pub countries: usize,
    pub visited_countries: usize,
    pub cities: usize,
    pub visited_cities: usize,
    pub completion_percentage: f64,
}

pub fn completion_percentage(visited: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    visited as f64 * 100.0 / total as f64
}

pub fn visited_countries(cities: &[City]) -> Vec<String> {
    cities
        .iter()
        .filter(|city| city.visited)
        .map(|city| city.country.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn visited_continents(cities: &[City]) -> Vec<Continent> {
    cities
        .iter()
        .filter(|city| city.visited)
        .filter_map(|city| continent_for(&city.country))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Default)]
struct Tally {
    visited: usize,
    total: usize,
}

pub fn compute(cities: &[City]) -> TravelStats {
    let mut by_country: BTreeMap<&str, Tally> = BTreeMap::new();
    for city in cities {
        let tally = by_country.entry(city.country.as_str()).or_default();
        tally.total += 1;
        if city.visited {
            tally.visited += 1;
        }
    }

    let countries: Vec<CountryBreakdown> = by_country
        .iter()
        .map(|(name, tally)| CountryBreakdown {
            name: (*name).to_string(),
            continent: continent_for(name),
            visited_cities: tally.visited,
            total_cities: tally.total,
            completion_percentage: completion_percentage(tally.visited, tally.total),
        })
        .collect();

    let mut by_continent: BTreeMap<Continent, ContinentBreakdown> = BTreeMap::new();
    for country in &countries {
        let Some(continent) = country.continent else {
            continue;
        };
        let row = by_continent
            .entry(continent)
            .or_insert_with(|| ContinentBreakdown {
                name: continent,
                countries: 0,
                visited_countries: 0,
                cities: 0,
                visited_cities: 0,
                completion_percentage: 0.0,
            });
        row.countries += 1;
        if country.visited_cities > 0 {
            row.visited_countries += 1;
        }
        row.cities += country.total_cities;
        row.visited_cities += country.visited_cities;
    }
    let continents: Vec<ContinentBreakdown> = by_continent
        .into_values()
        .map(|mut row| {
            row.completion_percentage = completion_percentage(row.visited_cities, row.cities);
            row
        })
        .collect();

    let visited = cities.iter().filter(|city| city.visited).count();

    TravelStats {
        total_cities: cities.len(),
        visited_cities: visited,
        custom_cities: cities.iter().filter(|city| city.is_custom).count(),
        total_countries: countries.len(),
        visited_countries: visited_countries(cities),
        total_continents: continents.len(),
        visited_continents: visited_continents(cities),
        completion_percentage: completion_percentage(visited, cities.len()),
        countries,
        continents,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::{Coordinates, Importance};

    fn city(id: &str, country: &str, visited: bool) -> City {
        City {
            id: id.to_string(),
            name: id.to_uppercase(),
            country: country.to_string(),
            coordinates: Coordinates::new(0.0, 0.0),
            visited,
            visited_date: visited.then(Utc::now),
            emoji: String::new(),
            is_custom: false,
            importance: Importance::Medium,
            population: None,
        }
    }

    #[test]
    fn stats_empty_collection_has_zero_completion() {
        let stats = compute(&[]);

        assert_eq!(stats.total_cities, 0);
        assert_eq!(stats.visited_cities, 0);
        assert_eq!(stats.completion_percentage, 0.0);
        assert!(stats.visited_countries.is_empty());
        assert!(stats.visited_continents.is_empty());
        assert!(stats.countries.is_empty());
    }

    #[test]
    fn stats_all_visited_is_one_hundred_percent() {
        let cities = vec![city("a", "France", true), city("b", "Japan", true)];

        assert_eq!(compute(&cities).completion_percentage, 100.0);
    }

    #[test]
    fn stats_dedupe_countries_and_map_continents() {
        let cities = vec![
            city("paris", "France", true),
            city("lyon", "France", true),
            city("tokyo", "Japan", true),
            city("x", "Nowhere", true),
            city("rome", "Italy", false),
        ];

        let stats = compute(&cities);

        assert_eq!(stats.visited_cities, 4);
        assert_eq!(
            stats.visited_countries,
            vec!["France".to_string(), "Japan".to_string(), "Nowhere".to_string()]
        );
        assert_eq!(
            stats.visited_continents,
            vec![Continent::Asia, Continent::Europe]
        );
        assert_eq!(stats.total_countries, 4);
        assert_eq!(stats.total_continents, 2);
    }

    #[test]
    fn stats_breakdowns_count_per_country_and_continent() {
        let cities = vec![
            city("paris", "France", true),
            city("lyon", "France", false),
            city("rome", "Italy", false),
            city("tokyo", "Japan", false),
        ];

        let stats = compute(&cities);

        let france = stats
            .countries
            .iter()
            .find(|row| row.name == "France")
            .expect("france row");
        assert_eq!(france.visited_cities, 1);
        assert_eq!(france.total_cities, 2);
        assert_eq!(france.completion_percentage, 50.0);
        assert_eq!(france.continent, Some(Continent::Europe));

        let europe = stats
            .continents
            .iter()
            .find(|row| row.name == Continent::Europe)
            .expect("europe row");
        assert_eq!(europe.countries, 2);
        assert_eq!(europe.visited_countries, 1);
        assert_eq!(europe.cities, 3);
        assert_eq!(europe.visited_cities, 1);

        let asia = stats
            .continents
            .iter()
            .find(|row| row.name == Continent::Asia)
            .expect("asia row");
        assert_eq!(asia.visited_countries, 0);
        assert_eq!(asia.completion_percentage, 0.0);
    }

    #[test]
    fn stats_one_of_three_visited_is_a_third() {
        let cities = vec![
            city("a", "France", false),
            city("b", "France", true),
            city("c", "France", false),
        ];

        let stats = compute(&cities);

        assert_eq!(stats.visited_cities, 1);
        assert!((stats.completion_percentage - 100.0 / 3.0).abs() < 1e-9);
    }
}
