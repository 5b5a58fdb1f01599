use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::{Rng, RngExt};

pub const CUSTOM_ID_PREFIX: &str = "custom-";

const PLACE_EMOJIS: &[&str] = &[
    "🏙️", "🌆", "🏘️", "🏞️", "🌄", "🏔️", "🏖️", "🌊", "🌴", "🌸", "🌺", "🌻", "🌷", "🌹", "🌿",
    "🍀", "🌳", "🌲", "🎋", "🍁", "🏰", "🏯", "🗼", "🎡", "🎢", "🎠", "⛩️", "🕌", "⛪", "🏛️",
    "🏗️", "🏭", "🏢", "🏬", "🏪", "🏫", "🏨", "🏦", "🏤", "🏣",
];

/// Builds `custom-<unix-millis>-<8 hex>` and retries until the id is not in
/// `taken`.
pub fn generate_custom_id<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    taken: &HashSet<&str>,
    rng: &mut R,
) -> String {
    let millis = now.timestamp_millis();
    loop {
        let suffix: u32 = rng.random_range(0..=u32::MAX);
        let candidate = format!("{CUSTOM_ID_PREFIX}{millis}-{suffix:08x}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}

pub fn random_place_emoji<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PLACE_EMOJIS[rng.random_range(0..PLACE_EMOJIS.len())]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn custom_id_has_prefix_millis_and_hex_suffix() {
        let now = DateTime::from_timestamp_millis(1_767_225_600_123).expect("fixture time");
        let mut rng = StdRng::seed_from_u64(7);

        let id = generate_custom_id(now, &HashSet::new(), &mut rng);

        let rest = id.strip_prefix("custom-1767225600123-").expect("prefix");
        assert_eq!(rest.len(), 8);
        assert!(rest.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn custom_id_skips_taken_candidates() {
        let now = DateTime::from_timestamp_millis(1_000).expect("fixture time");
        let first = generate_custom_id(now, &HashSet::new(), &mut StdRng::seed_from_u64(1));

        let taken: HashSet<&str> = [first.as_str()].into_iter().collect();
        let second = generate_custom_id(now, &taken, &mut StdRng::seed_from_u64(1));

        assert_ne!(first, second);
        assert!(second.starts_with("custom-1000-"));
    }

    #[test]
    fn random_place_emoji_comes_from_palette() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(PLACE_EMOJIS.contains(&random_place_emoji(&mut rng)));
        }
    }
}
