// src/criteria.rs
use chrono::NaiveDate;

use crate::error::CriteriaError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validated search input. Build with [`SearchCriteria::new`]; the date is a
/// calendar date, so an unparsed string never reaches [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    search_term: String,
    date_from: NaiveDate,
}

impl SearchCriteria {
    pub fn new(search_term: &str, date_from: NaiveDate) -> Result<Self, CriteriaError> {
        let term = search_term.trim();
        if term.is_empty() {
            return Err(CriteriaError::EmptySearchTerm);
        }
        Ok(Self {
            search_term: term.to_string(),
            date_from,
        })
    }

    /// Boundary helper for CLI flags and invocation events.
    pub fn from_raw(
        search_term: &str,
        date_from: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, CriteriaError> {
        let date = parse_date_from(date_from, today)?;
        Self::new(search_term, date)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn date_from(&self) -> NaiveDate {
        self.date_from
    }
}

/// `None` or blank → `today`; anything else must be strict `YYYY-MM-DD`.
pub fn parse_date_from(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, CriteriaError> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(today);
    };
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|source| CriteriaError::InvalidDate {
        input: s.to_string(),
        source,
    })
}

/// Ordered query parameters for the content API. Never holds the API key;
/// the fetcher merges it into its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy of the pairs with `key = value` set (replacing any existing entry).
    pub fn merged_with(&self, key: &str, value: &str) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> =
            self.pairs.iter().filter(|(k, _)| k != key).cloned().collect();
        out.push((key.to_string(), value.to_string()));
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Canonical content API parameters for `criteria`.
pub fn build(criteria: &SearchCriteria) -> QueryParameters {
    [
        ("q", criteria.search_term.clone()),
        ("from-date", criteria.date_from.format(DATE_FORMAT).to_string()),
        ("order-by", "newest".to_string()),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn build_emits_exactly_three_keys() {
        let c = SearchCriteria::new("bitcoin", d(2024, 1, 1)).unwrap();
        let p = build(&c);
        assert_eq!(p.len(), 3);
        assert_eq!(p.get("q"), Some("bitcoin"));
        assert_eq!(p.get("from-date"), Some("2024-01-01"));
        assert_eq!(p.get("order-by"), Some("newest"));
        assert!(!p.contains_key("api-key"));
    }

    #[test]
    fn single_digit_months_are_zero_padded() {
        let c = SearchCriteria::new("economy", d(2023, 3, 7)).unwrap();
        assert_eq!(build(&c).get("from-date"), Some("2023-03-07"));
    }

    #[test]
    fn empty_or_blank_term_is_rejected() {
        assert!(matches!(
            SearchCriteria::new("", d(2024, 1, 1)),
            Err(CriteriaError::EmptySearchTerm)
        ));
        assert!(matches!(
            SearchCriteria::new("   ", d(2024, 1, 1)),
            Err(CriteriaError::EmptySearchTerm)
        ));
    }

    #[test]
    fn term_is_trimmed() {
        let c = SearchCriteria::new("  climate ", d(2024, 1, 1)).unwrap();
        assert_eq!(c.search_term(), "climate");
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let today = d(2025, 10, 1);
        assert_eq!(parse_date_from(None, today).unwrap(), today);
        assert_eq!(parse_date_from(Some("  "), today).unwrap(), today);
    }

    #[test]
    fn malformed_dates_are_never_coerced() {
        let today = d(2025, 10, 1);
        for bad in ["2024-13-01", "2024-02-30", "01/02/2024", "yesterday", "20240101"] {
            let err = parse_date_from(Some(bad), today).unwrap_err();
            assert!(
                matches!(err, CriteriaError::InvalidDate { ref input, .. } if input == bad),
                "expected InvalidDate for {bad}"
            );
        }
    }

    #[test]
    fn merged_with_leaves_original_untouched() {
        let c = SearchCriteria::new("bitcoin", d(2024, 1, 1)).unwrap();
        let p = build(&c);
        let merged = p.merged_with("api-key", "secret");
        assert_eq!(merged.len(), 4);
        assert!(merged.contains(&("api-key".to_string(), "secret".to_string())));
        assert!(!p.contains_key("api-key"));
    }
}
