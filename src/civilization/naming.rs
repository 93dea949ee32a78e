//! City name generation.
//!
//! Names combine a random prefix and suffix. The caller supplies the RNG, so
//! the simulation's seeded generator keeps name sequences reproducible and
//! tests can inject a fixed stream.

use rand::Rng;

const NAME_PREFIXES: [&str; 15] = [
    "New", "Port", "Mount", "Lake", "North", "South", "East", "West", "Fort", "Saint", "Royal",
    "Grand", "Old", "Upper", "Lower",
];

const NAME_SUFFIXES: [&str; 20] = [
    "haven", "burg", "ville", "ton", "ford", "bridge", "field", "wood", "hill", "vale", "shore",
    "cliff", "rapids", "falls", "meadow", "grove", "ridge", "crest", "view", "harbor",
];

/// Generate a city name (e.g. "Port haven", "Grand falls").
pub fn generate_city_name(rng: &mut impl Rng) -> String {
    let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
    let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
    format!("{} {}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_names_are_deterministic_per_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(5);
        let mut b = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..10 {
            assert_eq!(generate_city_name(&mut a), generate_city_name(&mut b));
        }
    }

    #[test]
    fn test_names_combine_known_words() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let name = generate_city_name(&mut rng);
            let (prefix, suffix) = name.split_once(' ').expect("name has two parts");
            assert!(NAME_PREFIXES.contains(&prefix));
            assert!(NAME_SUFFIXES.contains(&suffix));
        }
    }
}
