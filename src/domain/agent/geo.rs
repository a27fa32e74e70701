//! City normalization tables and date handling

use chrono::NaiveDate;

use crate::domain::DomainError;

/// Shorthand and airport-code style aliases for city names
const CITY_ALIASES: &[(&str, &str)] = &[
    ("hyd", "hyderabad"),
    ("blr", "bangalore"),
    ("bom", "mumbai"),
    ("mum", "mumbai"),
    ("del", "delhi"),
    ("maa", "chennai"),
    ("ccu", "kolkata"),
];

/// State names mapped to a representative gateway city
const STATE_TO_CITY: &[(&str, &str)] = &[
    ("kerala", "kochi"),
    ("tamil nadu", "chennai"),
    ("karnataka", "bangalore"),
    ("maharashtra", "mumbai"),
    ("rajasthan", "jaipur"),
    ("telangana", "hyderabad"),
    ("andhra pradesh", "visakhapatnam"),
    ("west bengal", "kolkata"),
];

const CITY_TO_IATA: &[(&str, &str)] = &[
    ("delhi", "DEL"),
    ("hyderabad", "HYD"),
    ("mumbai", "BOM"),
    ("bangalore", "BLR"),
    ("chennai", "MAA"),
    ("goa", "GOI"),
    ("kolkata", "CCU"),
    ("kochi", "COK"),
    ("trivandrum", "TRV"),
    ("calicut", "CCJ"),
    ("jaipur", "JAI"),
    ("visakhapatnam", "VTZ"),
];

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Normalize user input to a canonical lowercase city name: trims, resolves
/// aliases, and falls back from a state name to its gateway city.
pub fn canonical_city(input: &str) -> String {
    let city = input.trim().to_lowercase();
    let city = lookup(CITY_ALIASES, &city).map(str::to_string).unwrap_or(city);
    lookup(STATE_TO_CITY, &city).map(str::to_string).unwrap_or(city)
}

/// IATA airport code for a canonical city name
pub fn iata_code(city: &str) -> Option<&'static str> {
    CITY_TO_IATA.iter().find(|(k, _)| *k == city).map(|(_, v)| *v)
}

/// Normalize a date to ISO `YYYY-MM-DD`. Accepts `YYYY-MM-DD` or
/// `DD-MM-YYYY`.
pub fn normalize_date(value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d-%m-%Y"))
        .map_err(|_| {
            DomainError::validation(format!(
                "Invalid date '{}'; expected YYYY-MM-DD or DD-MM-YYYY",
                value
            ))
        })?;
    Ok(parsed.format("%Y-%m-%d").to_string())
}

/// Whole days between two ISO dates, clamped to at least one
pub fn trip_days(depart: &str, ret: &str) -> u32 {
    let parse = |v: &str| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok();
    match (parse(depart), parse(ret)) {
        (Some(d), Some(r)) => (r - d).num_days().max(1) as u32,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolution() {
        assert_eq!(canonical_city("HYD"), "hyderabad");
        assert_eq!(canonical_city(" blr "), "bangalore");
        assert_eq!(canonical_city("Mumbai"), "mumbai");
    }

    #[test]
    fn test_state_fallback() {
        assert_eq!(canonical_city("Kerala"), "kochi");
        assert_eq!(canonical_city("tamil nadu"), "chennai");
    }

    #[test]
    fn test_iata_lookup() {
        assert_eq!(iata_code("goa"), Some("GOI"));
        assert_eq!(iata_code("delhi"), Some("DEL"));
        assert_eq!(iata_code("atlantis"), None);
    }

    #[test]
    fn test_normalize_date_iso() {
        assert_eq!(normalize_date("2026-09-01").unwrap(), "2026-09-01");
    }

    #[test]
    fn test_normalize_date_dmy() {
        assert_eq!(normalize_date("01-09-2026").unwrap(), "2026-09-01");
    }

    #[test]
    fn test_normalize_date_invalid() {
        assert!(normalize_date("September 1st").is_err());
        assert!(normalize_date("2026-13-40").is_err());
    }

    #[test]
    fn test_trip_days() {
        assert_eq!(trip_days("2026-09-01", "2026-09-05"), 4);
        assert_eq!(trip_days("2026-09-01", "2026-09-01"), 1);
        assert_eq!(trip_days("garbage", "2026-09-05"), 3);
    }
}
