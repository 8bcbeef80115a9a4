//! Motivational quote of the day.

use chrono::Datelike;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::clock::parse_day_key;

pub const QUOTES: &[&str] = &[
    "Hoy es un buen día para empezar.",
    "Pequeños pasos crean grandes cambios.",
    "Tu enfoque es tu superpoder.",
    "Sigue, aunque sea lento, pero sigue.",
    "La disciplina vence a la motivación.",
    "Hecho es mejor que perfecto.",
    "Cada minuto cuenta, haz que valga.",
    "Empieza por lo pequeño, gana impulso.",
    "Tú controlas tu siguiente acción.",
    "Una cosa a la vez, bien hecha.",
    "Con constancia, todo llega.",
    "Respira, prioriza y avanza.",
    "Un poco hoy, mucho mañana.",
    "Tu futuro yo te lo agradecerá.",
    "La claridad llega al actuar.",
];

/// Deterministic quote for a `YYYY-MM-DD` day key.
///
/// Index = zero-based day of year + year + month + day, modulo the list
/// length. Unparseable keys get the first quote.
pub fn quote_for_day(day_key: &str) -> &'static str {
    let Some(date) = parse_day_key(day_key) else {
        return QUOTES[0];
    };
    let seed = date.ordinal0() as i64 + i64::from(date.year()) + i64::from(date.month()) + i64::from(date.day());
    QUOTES[seed.rem_euclid(QUOTES.len() as i64) as usize]
}

/// A random quote other than `previous`.
pub fn random_quote_different<R: Rng + ?Sized>(previous: Option<&str>, rng: &mut R) -> &'static str {
    let pool: Vec<&'static str> = QUOTES
        .iter()
        .copied()
        .filter(|q| Some(*q) != previous)
        .collect();
    pool.choose(rng).copied().unwrap_or(QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn quote_for_day_is_stable() {
        // 2024-01-01: 0 + 2024 + 1 + 1 = 2026, 2026 % 15 = 1
        assert_eq!(quote_for_day("2024-01-01"), QUOTES[1]);
        assert_eq!(quote_for_day("2024-01-01"), quote_for_day("2024-01-01"));
        assert_eq!(quote_for_day("garbage"), QUOTES[0]);
    }

    #[test]
    fn random_quote_avoids_previous() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let previous = QUOTES[3];
            assert_ne!(random_quote_different(Some(previous), &mut rng), previous);
        }
        assert!(QUOTES.contains(&random_quote_different(None, &mut rng)));
    }
}
