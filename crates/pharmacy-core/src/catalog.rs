//! Autocomplete ranking over an inventory snapshot.
//!
//! The billing form filters the last-fetched inventory list as the user
//! types. Filtering is a case-insensitive substring match; ordering within
//! the matches combines Jaro-Winkler (good for typos and prefixes) with
//! normalized Levenshtein.

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::InventoryItem;

/// Rank catalog items for an autocomplete dropdown.
///
/// Returns the substring matches ordered best-first. An empty query
/// returns nothing (the dropdown is closed until the user types).
pub fn rank_suggestions<'a>(query: &str, items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<(&InventoryItem, f64)> = items
        .iter()
        .filter(|item| item.medicine_name.to_lowercase().contains(&query_lower))
        .map(|item| {
            let score = fuzzy_match(&query_lower, &item.medicine_name.to_lowercase());
            (item, score)
        })
        .collect();

    matches.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.medicine_name.cmp(&b.0.medicine_name))
    });

    matches.into_iter().map(|(item, _)| item).collect()
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Supplier};
    use chrono::NaiveDate;

    fn item(name: &str) -> InventoryItem {
        InventoryItem::new(
            name.into(),
            Category::Painkillers,
            1000,
            50,
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            Supplier::PharmaInc,
        )
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let items = vec![item("Panadol")];
        assert!(rank_suggestions("", &items).is_empty());
        assert!(rank_suggestions("   ", &items).is_empty());
    }

    #[test]
    fn test_substring_filter_case_insensitive() {
        let items = vec![item("Panadol"), item("Paracetamol"), item("Amoxicillin")];

        let names: Vec<&str> = rank_suggestions("PAN", &items)
            .iter()
            .map(|i| i.medicine_name.as_str())
            .collect();
        assert_eq!(names, vec!["Panadol"]);

        // Mid-string match
        let names: Vec<&str> = rank_suggestions("cet", &items)
            .iter()
            .map(|i| i.medicine_name.as_str())
            .collect();
        assert_eq!(names, vec!["Paracetamol"]);
    }

    #[test]
    fn test_closer_name_ranks_first() {
        let items = vec![item("Paracetamol Syrup 200ml"), item("Para")];
        let ranked = rank_suggestions("para", &items);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].medicine_name, "Para");
    }

    #[test]
    fn test_no_match() {
        let items = vec![item("Panadol")];
        assert!(rank_suggestions("zzz", &items).is_empty());
    }

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("panadol", "panadol") > 0.99);
        assert!(fuzzy_match("panadol", "panadol extra") > fuzzy_match("panadol", "paracetamol"));
    }
}
