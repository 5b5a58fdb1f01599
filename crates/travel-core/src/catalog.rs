//! Built-in world city catalog.
//!
//! A fresh collection is seeded from this list with every city unvisited.
//! Ids are stable slugs and must stay unique; persisted collections refer to
//! them by id.

use crate::model::{City, Coordinates, Importance};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    pub coordinates: Coordinates,
    pub emoji: &'static str,
    pub importance: Importance,
    pub population: u64,
}

impl CatalogEntry {
    pub fn to_city(&self) -> City {
        City {
            id: self.id.to_string(),
            name: self.name.to_string(),
            country: self.country.to_string(),
            coordinates: self.coordinates,
            visited: false,
            visited_date: None,
            emoji: self.emoji.to_string(),
            is_custom: false,
            importance: self.importance,
            population: Some(self.population),
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn entry(
    id: &'static str,
    name: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
    emoji: &'static str,
    importance: Importance,
    population: u64,
) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        country,
        coordinates: Coordinates::new(latitude, longitude),
        emoji,
        importance,
        population,
    }
}

const fn major(
    id: &'static str,
    name: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
    emoji: &'static str,
    population: u64,
) -> CatalogEntry {
    entry(id, name, country, latitude, longitude, emoji, Importance::Major, population)
}

const fn medium(
    id: &'static str,
    name: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
    emoji: &'static str,
    population: u64,
) -> CatalogEntry {
    entry(id, name, country, latitude, longitude, emoji, Importance::Medium, population)
}

const fn small(
    id: &'static str,
    name: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
    emoji: &'static str,
    population: u64,
) -> CatalogEntry {
    entry(id, name, country, latitude, longitude, emoji, Importance::Small, population)
}

/// Fresh, fully unvisited collection built from [`WORLD_CITIES`].
pub fn seed_collection() -> Vec<City> {
    WORLD_CITIES.iter().map(CatalogEntry::to_city).collect()
}

pub fn is_catalog_id(id: &str) -> bool {
    WORLD_CITIES.iter().any(|entry| entry.id == id)
}

pub const WORLD_CITIES: &[CatalogEntry] = &[
    major("london", "London", "United Kingdom", 51.5074, -0.1278, "🏰", 9_000_000),
    major("paris", "Paris", "France", 48.8566, 2.3522, "🗼", 11_000_000),
    major("rome", "Rome", "Italy", 41.9028, 12.4964, "🏛️", 4_300_000),
    major("berlin", "Berlin", "Germany", 52.5200, 13.4050, "🍺", 3_700_000),
    major("madrid", "Madrid", "Spain", 40.4168, -3.7038, "💃", 6_600_000),
    major("barcelona", "Barcelona", "Spain", 41.3851, 2.1734, "🏖️", 5_500_000),
    major("amsterdam", "Amsterdam", "Netherlands", 52.3676, 4.9041, "🌷", 2_400_000),
    major("vienna", "Vienna", "Austria", 48.2082, 16.3738, "🎼", 1_900_000),
    major("prague", "Prague", "Czech Republic", 50.0755, 14.4378, "🏰", 1_300_000),
    major("stockholm", "Stockholm", "Sweden", 59.3293, 18.0686, "🐻", 2_400_000),
    medium("florence", "Florence", "Italy", 43.7696, 11.2558, "🎨", 380_000),
    medium("venice", "Venice", "Italy", 45.4408, 12.3155, "🚤", 260_000),
    major("milan", "Milan", "Italy", 45.4642, 9.1900, "👗", 3_200_000),
    medium("naples", "Naples", "Italy", 40.8518, 14.2681, "🍕", 970_000),
    medium("lyon", "Lyon", "France", 45.7640, 4.8357, "🍷", 2_300_000),
    medium("marseille", "Marseille", "France", 43.2965, 5.3698, "⛵", 1_800_000),
    medium("nice", "Nice", "France", 43.7102, 7.2620, "🌊", 340_000),
    major("munich", "Munich", "Germany", 48.1351, 11.5820, "🍻", 1_500_000),
    medium("hamburg", "Hamburg", "Germany", 53.5511, 9.9937, "⚓", 1_900_000),
    medium("cologne", "Cologne", "Germany", 50.9375, 6.9603, "⛪", 1_100_000),
    small("bruges", "Bruges", "Belgium", 51.2093, 3.2247, "🏘️", 118_000),
    small("ghent", "Ghent", "Belgium", 51.0543, 3.7174, "🏰", 260_000),
    small("salzburg", "Salzburg", "Austria", 47.8095, 13.0550, "🎵", 150_000),
    small("innsbruck", "Innsbruck", "Austria", 47.2692, 11.4041, "⛷️", 130_000),
    small("heidelberg", "Heidelberg", "Germany", 49.3988, 8.6724, "🏫", 160_000),
    small("rothenburg", "Rothenburg", "Germany", 49.3755, 10.1796, "🏰", 11_000),
    major("new-york", "New York", "United States", 40.7128, -74.0060, "🗽", 20_000_000),
    major("los-angeles", "Los Angeles", "United States", 34.0522, -118.2437, "🎬", 13_000_000),
    major("chicago", "Chicago", "United States", 41.8781, -87.6298, "🌆", 9_500_000),
    major("san-francisco", "San Francisco", "United States", 37.7749, -122.4194, "🌉", 4_700_000),
    major("toronto", "Toronto", "Canada", 43.6532, -79.3832, "🍁", 6_200_000),
    major("vancouver", "Vancouver", "Canada", 49.2827, -123.1207, "🏔️", 2_500_000),
    major("mexico-city", "Mexico City", "Mexico", 19.4326, -99.1332, "🌮", 21_800_000),
    medium("miami", "Miami", "United States", 25.7617, -80.1918, "🏖️", 6_100_000),
    medium("seattle", "Seattle", "United States", 47.6062, -122.3321, "☕", 4_000_000),
    medium("boston", "Boston", "United States", 42.3601, -71.0589, "🦞", 4_900_000),
    medium("las-vegas", "Las Vegas", "United States", 36.1699, -115.1398, "🎰", 2_300_000),
    medium("montreal", "Montreal", "Canada", 45.5017, -73.5673, "🥐", 4_300_000),
    medium("calgary", "Calgary", "Canada", 51.0447, -114.0719, "🤠", 1_400_000),
    small("charleston", "Charleston", "United States", 32.7765, -79.9311, "🏛️", 140_000),
    small("savannah", "Savannah", "United States", 32.0835, -81.0998, "🌳", 150_000),
    small("quebec-city", "Quebec City", "Canada", 46.8139, -71.2080, "🏰", 540_000),
    small("banff", "Banff", "Canada", 51.1784, -115.5708, "🏔️", 8_000),
    major("tokyo", "Tokyo", "Japan", 35.6762, 139.6503, "🍣", 37_400_000),
    major("osaka", "Osaka", "Japan", 34.6937, 135.5023, "🍜", 19_300_000),
    major("beijing", "Beijing", "China", 39.9042, 116.4074, "🏮", 21_500_000),
    major("shanghai", "Shanghai", "China", 31.2304, 121.4737, "🏙️", 27_000_000),
    major("hong-kong", "Hong Kong", "Hong Kong", 22.3193, 114.1694, "🦄", 7_500_000),
    major("singapore", "Singapore", "Singapore", 1.3521, 103.8198, "🦁", 5_900_000),
    major("bangkok", "Bangkok", "Thailand", 13.7563, 100.5018, "🐘", 10_500_000),
    major("seoul", "Seoul", "South Korea", 37.5665, 126.9780, "🎮", 25_600_000),
    major("mumbai", "Mumbai", "India", 19.0760, 72.8777, "🕌", 20_400_000),
    major("delhi", "Delhi", "India", 28.7041, 77.1025, "🐅", 32_900_000),
    medium("kyoto", "Kyoto", "Japan", 35.0116, 135.7681, "⛩️", 1_500_000),
    medium("hiroshima", "Hiroshima", "Japan", 34.3853, 132.4553, "🕊️", 1_200_000),
    medium("chiang-mai", "Chiang Mai", "Thailand", 18.7883, 98.9853, "🏯", 130_000),
    medium("phuket", "Phuket", "Thailand", 7.8804, 98.3923, "🏝️", 420_000),
    medium("busan", "Busan", "South Korea", 35.1796, 129.0756, "🌊", 3_400_000),
    medium("jeju", "Jeju", "South Korea", 33.4996, 126.5312, "🌺", 670_000),
    small("takayama", "Takayama", "Japan", 36.1397, 137.2530, "🏘️", 88_000),
    small("nikko", "Nikko", "Japan", 36.7500, 139.6000, "🌲", 80_000),
    small("luang-prabang", "Luang Prabang", "Laos", 19.8845, 102.1348, "🏯", 56_000),
    small("hoi-an", "Hoi An", "Vietnam", 15.8801, 108.3380, "🏮", 120_000),
    major("sao-paulo", "São Paulo", "Brazil", -23.5505, -46.6333, "⚽", 22_400_000),
    major("rio-de-janeiro", "Rio de Janeiro", "Brazil", -22.9068, -43.1729, "🏖️", 13_700_000),
    major("buenos-aires", "Buenos Aires", "Argentina", -34.6118, -58.3960, "💃", 15_200_000),
    major("lima", "Lima", "Peru", -12.0464, -77.0428, "🦙", 10_700_000),
    major("santiago", "Santiago", "Chile", -33.4489, -70.6693, "🍷", 6_800_000),
    medium("cusco", "Cusco", "Peru", -13.5319, -71.9675, "🏔️", 430_000),
    medium("cartagena", "Cartagena", "Colombia", 10.3910, -75.4794, "🏰", 1_000_000),
    medium("mendoza", "Mendoza", "Argentina", -32.8895, -68.8458, "🍇", 1_100_000),
    medium("valparaiso", "Valparaíso", "Chile", -33.0472, -71.6127, "🎨", 300_000),
    small("bariloche", "Bariloche", "Argentina", -41.1335, -71.3103, "🏔️", 140_000),
    small("ushuaia", "Ushuaia", "Argentina", -54.8019, -68.3030, "🐧", 80_000),
    small("atacama", "San Pedro de Atacama", "Chile", -22.9083, -68.2000, "🌵", 6_000),
    major("cape-town", "Cape Town", "South Africa", -33.9249, 18.4241, "🦁", 4_600_000),
    major("cairo", "Cairo", "Egypt", 30.0444, 31.2357, "🐪", 20_900_000),
    major("marrakech", "Marrakech", "Morocco", 31.6295, -7.9811, "🕌", 930_000),
    major("lagos", "Lagos", "Nigeria", 6.5244, 3.3792, "🎭", 15_400_000),
    medium("casablanca", "Casablanca", "Morocco", 33.5731, -7.5898, "🏛️", 3_400_000),
    medium("fez", "Fez", "Morocco", 34.0181, -5.0078, "🏺", 1_200_000),
    medium("luxor", "Luxor", "Egypt", 25.6872, 32.6396, "🏺", 500_000),
    major("johannesburg", "Johannesburg", "South Africa", -26.2041, 28.0473, "💎", 5_600_000),
    small("chefchaouen", "Chefchaouen", "Morocco", 35.1689, -5.2636, "💙", 42_000),
    small("aswan", "Aswan", "Egypt", 24.0889, 32.8998, "⛵", 290_000),
    small("stellenbosch", "Stellenbosch", "South Africa", -33.9321, 18.8602, "🍷", 160_000),
    major("sydney", "Sydney", "Australia", -33.8688, 151.2093, "🦘", 5_300_000),
    major("melbourne", "Melbourne", "Australia", -37.8136, 144.9631, "☕", 5_200_000),
    major("auckland", "Auckland", "New Zealand", -36.8485, 174.7633, "🐑", 1_700_000),
    medium("brisbane", "Brisbane", "Australia", -27.4698, 153.0251, "🌞", 2_600_000),
    medium("perth", "Perth", "Australia", -31.9505, 115.8605, "🏖️", 2_100_000),
    medium("wellington", "Wellington", "New Zealand", -41.2865, 174.7762, "🌬️", 420_000),
    medium("christchurch", "Christchurch", "New Zealand", -43.5321, 172.6362, "🌸", 380_000),
    small("cairns", "Cairns", "Australia", -16.9186, 145.7781, "🐠", 150_000),
    small("uluru", "Uluru", "Australia", -25.3444, 131.0369, "🪨", 400),
    small("queenstown", "Queenstown", "New Zealand", -45.0312, 168.6626, "🏔️", 16_000),
    small("rotorua", "Rotorua", "New Zealand", -38.1368, 176.2497, "♨️", 58_000),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_ids_are_unique_slugs() {
        let mut seen = HashSet::new();
        for entry in WORLD_CITIES {
            assert!(seen.insert(entry.id), "duplicate catalog id {}", entry.id);
            assert!(
                entry
                    .id
                    .chars()
                    .all(|ch| ch.is_ascii_lowercase() || ch == '-'),
                "catalog id {} is not a slug",
                entry.id
            );
            assert!(!entry.id.starts_with("custom-"));
        }
        assert_eq!(WORLD_CITIES.len(), 97);
    }

    #[test]
    fn catalog_coordinates_are_valid() {
        for entry in WORLD_CITIES {
            assert!(
                entry.coordinates.validate().is_ok(),
                "{} has invalid coordinates",
                entry.id
            );
        }
    }

    #[test]
    fn seed_collection_starts_unvisited_and_non_custom() {
        let cities = seed_collection();

        assert_eq!(cities.len(), WORLD_CITIES.len());
        assert!(cities.iter().all(|city| !city.visited));
        assert!(cities.iter().all(|city| city.visited_date.is_none()));
        assert!(cities.iter().all(|city| !city.is_custom));
        assert!(is_catalog_id("london"));
        assert!(!is_catalog_id("custom-1-abc"));
    }
}
