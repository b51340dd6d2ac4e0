use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::record::{DATE_FORMAT, UserRecord};

/// Number of records generated when nothing else is configured
pub const DEFAULT_RECORD_COUNT: usize = 500;

/// Registration dates fall within this many days before today
const REGISTRATION_WINDOW_DAYS: i64 = 5 * 365;

const FIRST_NAMES: &[&str] = &[
    "Aiden", "Amara", "Beatriz", "Caleb", "Chen", "Dmitri", "Elena", "Farah", "Gabriel", "Hana",
    "Ibrahim", "Isla", "Jonas", "Keiko", "Liam", "Lucia", "Mateo", "Mei", "Noah", "Olivia",
    "Priya", "Quentin", "Rosa", "Samir", "Sofia", "Tariq", "Uma", "Viktor", "Wen", "Yara",
    "Zoe", "John",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Bianchi", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hansen", "Ito",
    "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov", "Quinn", "Rossi",
    "Silva", "Tanaka", "Usman", "Varga", "Weber", "Xu", "Yilmaz", "Zhang", "Doe",
];

const CITIES: &[&str] = &[
    "Amsterdam", "Bangalore", "Berlin", "Buenos Aires", "Cairo", "Chicago", "Dublin", "Helsinki",
    "Istanbul", "Lagos", "Lisbon", "London", "Madrid", "Melbourne", "Mexico City", "Montreal",
    "Nairobi", "Osaka", "Oslo", "Paris", "Prague", "Seoul", "Singapore", "Toronto", "Vienna",
    "Warsaw",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "inbox.test"];

/// Synthetic user record generator
///
/// With a seed the output is reproducible for a given `today`; without one
/// each call draws from OS entropy.
#[derive(Debug, Clone)]
pub struct Generator {
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for Generator {
    fn default() -> Self {
        Generator {
            count: DEFAULT_RECORD_COUNT,
            seed: None,
        }
    }
}

impl Generator {
    pub fn new(count: usize, seed: Option<u64>) -> Self {
        Generator { count, seed }
    }

    /// Generate `count` records registered on or before `today`.
    pub fn generate(&self, today: NaiveDate) -> Vec<UserRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        (0..self.count)
            .map(|n| generate_record(&mut rng, n, today))
            .collect()
    }
}

fn generate_record(rng: &mut StdRng, n: usize, today: NaiveDate) -> UserRecord {
    // Pools are non-empty constants
    let first = *FIRST_NAMES.choose(rng).unwrap_or(&"Alex");
    let last = *LAST_NAMES.choose(rng).unwrap_or(&"Smith");
    let city = *CITIES.choose(rng).unwrap_or(&"Paris");
    let domain = *DOMAINS.choose(rng).unwrap_or(&"example.com");

    let id = Builder::from_random_bytes(rng.r#gen()).into_uuid();
    let registered = today - Duration::days(rng.gen_range(0..=REGISTRATION_WINDOW_DAYS));

    UserRecord {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}{}@{}", first, last, n, domain).to_lowercase(),
        city: city.to_string(),
        registered_date: registered.format(DATE_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::validate_records;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn generates_requested_count_of_valid_records() {
        let records = Generator::new(300, Some(7)).generate(today());
        assert_eq!(records.len(), 300);
        assert_eq!(validate_records(&records), Ok(()));
    }

    #[test]
    fn dates_stay_within_window() {
        let earliest = today() - Duration::days(REGISTRATION_WINDOW_DAYS);
        for record in Generator::new(200, Some(1)).generate(today()) {
            let date = record.registered_on().unwrap();
            assert!(date <= today());
            assert!(date >= earliest);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = Generator::new(20, Some(42)).generate(today());
        let b = Generator::new(20, Some(42)).generate(today());
        let c = Generator::new(20, Some(43)).generate(today());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn email_is_lowercase_and_built_from_name() {
        let records = Generator::new(5, Some(3)).generate(today());
        for (n, r) in records.iter().enumerate() {
            let prefix = format!("{}.{}{}@", r.first_name, r.last_name, n).to_lowercase();
            assert!(r.email.starts_with(&prefix), "{}", r.email);
        }
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(Generator::new(0, None).generate(today()).is_empty());
    }
}
