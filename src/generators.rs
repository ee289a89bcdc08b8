//! Randomized field values that keep repeated runs against a persistent
//! backend from tripping over uniqueness constraints.
//!
//! All generators take the random source explicitly; pass a seeded
//! `StdRng` to get reproducible data.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;

pub const EMAIL_LOCAL_PART_LEN: usize = 8;
pub const LOGIN_SUFFIX_LEN: usize = 8;
pub const PHONE_DIGITS: usize = 10;
pub const PHONE_COUNTRY_CODE: &str = "+1";

pub fn random_lowercase<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}

pub fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// `test_xxxxxxxx@example.com`
pub fn email<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("test_{}@example.com", random_lowercase(rng, EMAIL_LOCAL_PART_LEN))
}

/// `+1` followed by ten digits.
pub fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}{}", PHONE_COUNTRY_CODE, random_digits(rng, PHONE_DIGITS))
}

/// `user_xxxxxxxx`
pub fn login<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("user_{}", random_lowercase(rng, LOGIN_SUFFIX_LEN))
}

/// `ROLE_TEST_nnnn`, with nnnn in 1000..=9999.
pub fn authority_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("ROLE_TEST_{}", rng.random_range(1000..=9999))
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Instant rendered at minute precision, as the backend accepts it:
/// `2026-10-16T14:25:00Z`.
pub fn minute_instant(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:00Z").to_string()
}

/// [`minute_instant`] for now plus `days` whole days.
pub fn instant_in_days(days: i64) -> String {
    minute_instant(Utc::now() + Duration::days(days))
}
