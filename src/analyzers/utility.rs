use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Treats missing and non-positive populations as unknown (0).
pub fn safe_population(population: Option<i64>) -> i64 {
    population.filter(|p| *p > 0).unwrap_or(0)
}

/// `value` per thousand inhabitants. Returns 0.0 when population is not positive.
pub fn per_thousand(value: i64, population: i64) -> f64 {
    if population <= 0 {
        return 0.0;
    }
    value as f64 / (population as f64 / 1000.0)
}

/// Mean over `days` distinct days. Returns 0.0 for zero days.
pub fn per_day(total: i64, days: usize) -> f64 {
    if days == 0 {
        return 0.0;
    }
    total as f64 / days as f64
}

/// Country-name ordering: accents stripped, case-folded, underscores read as
/// spaces. Ties are broken on the raw bytes so the order is total.
pub fn collate(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == '_' { ' ' } else { c })
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_population() {
        assert_eq!(safe_population(None), 0);
        assert_eq!(safe_population(Some(0)), 0);
        assert_eq!(safe_population(Some(-10)), 0);
        assert_eq!(safe_population(Some(47_000_000)), 47_000_000);
    }

    #[test]
    fn test_per_thousand_with_zero_population() {
        assert_eq!(per_thousand(1_000, 0), 0.0);
        assert_eq!(per_thousand(1_000, -5), 0.0);
        assert_eq!(per_thousand(0, 0), 0.0);
    }

    #[test]
    fn test_per_thousand_normal_values() {
        assert_eq!(per_thousand(5, 1_000), 5.0);
        assert_eq!(per_thousand(12, 2_000), 6.0);
        assert!((per_thousand(10, 67_000_000) - 0.000_149_25).abs() < 1e-9);
    }

    #[test]
    fn test_per_day() {
        assert_eq!(per_day(10, 0), 0.0);
        assert_eq!(per_day(12, 2), 6.0);
        assert_eq!(per_day(7, 2), 3.5);
    }

    #[test]
    fn test_collate_ignores_case() {
        assert_eq!(collate("france", "Germany"), Ordering::Less);
        assert_eq!(collate("Spain", "spain"), Ordering::Less);
        assert_eq!(collate("spain", "Spain"), Ordering::Greater);
        assert_eq!(collate("Spain", "Spain"), Ordering::Equal);
    }

    #[test]
    fn test_collate_underscores_as_spaces() {
        assert_eq!(
            collate("United_Kingdom", "United_States_of_America"),
            Ordering::Less
        );
        assert_eq!(collate("South_Africa", "Southern_Island"), Ordering::Less);
    }

    #[test]
    fn test_collate_ignores_accents() {
        assert_eq!(collate("Équateur", "France"), Ordering::Less);
        assert_eq!(collate("Åland", "Belgium"), Ordering::Less);
        assert_eq!(collate("Curaçao", "Cyprus"), Ordering::Less);
        assert_eq!(collate("Equateur", "Équateur"), Ordering::Less);
    }
}
