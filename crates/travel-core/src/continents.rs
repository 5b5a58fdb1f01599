use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    Oceania,
    #[serde(rename = "South America")]
    SouthAmerica,
}

impl Continent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::Oceania => "Oceania",
            Self::SouthAmerica => "South America",
        }
    }
}

impl std::fmt::Display for Continent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up the continent for a country name as written in the catalog.
/// Unknown countries (custom entries, typos) map to `None`.
pub fn continent_for(country: &str) -> Option<Continent> {
    let continent = match country.trim() {
        "United Kingdom" | "France" | "Italy" | "Germany" | "Spain" | "Netherlands"
        | "Austria" | "Czech Republic" | "Sweden" | "Belgium" => Continent::Europe,
        "United States" | "Canada" | "Mexico" => Continent::NorthAmerica,
        "Japan" | "China" | "Hong Kong" | "Singapore" | "Thailand" | "South Korea" | "India"
        | "Laos" | "Vietnam" => Continent::Asia,
        "Brazil" | "Argentina" | "Peru" | "Chile" | "Colombia" => Continent::SouthAmerica,
        "South Africa" | "Egypt" | "Morocco" | "Nigeria" => Continent::Africa,
        "Australia" | "New Zealand" => Continent::Oceania,
        _ => return None,
    };
    Some(continent)
}
