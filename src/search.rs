//! Trainer name search.
//!
//! Every trainer gets a list of normalized aliases (full English and Spanish
//! names, localized short names and localized trainer classes). Queries are
//! normalized the same way and matched by prefix first, then by substring.

use crate::errors::{LookupError, LookupResult};
use schema::TrainerRecord;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Clamp a caller supplied limit, which may be zero or negative, to `1..=MAX_SEARCH_LIMIT`.
pub fn clamp_limit(limit: i64) -> usize {
    // Clamped first, so the cast cannot truncate.
    limit.clamp(1, MAX_SEARCH_LIMIT as i64) as usize
}

/// Fold a name for matching: lowercase, strip diacritics, turn punctuation
/// into spaces and collapse whitespace. Non-latin scripts are kept.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .trim()
        .to_lowercase()
        .nfkd()
        .filter(|&ch| !is_combining_mark(ch))
        .collect();

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for ch in folded.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchRow {
    position: usize,
    aliases: Vec<String>,
}

/// Alias table over a trainer list, built once per repository.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    rows: Vec<SearchRow>,
}

impl SearchIndex {
    pub fn build(trainers: &[TrainerRecord]) -> Self {
        let rows = trainers
            .iter()
            .enumerate()
            .map(|(position, trainer)| SearchRow {
                position,
                aliases: aliases_for(trainer),
            })
            .collect();
        Self { rows }
    }

    /// Positions (into the trainer slice the index was built from) of the
    /// trainers matching `query`, prefix matches first. `limit` is clamped to
    /// `1..=MAX_SEARCH_LIMIT`.
    ///
    /// Only a literally empty query is rejected. A query that normalizes to
    /// nothing (e.g. `" !"`) is a prefix of every alias and returns the first
    /// `limit` trainers in file order.
    pub fn search(&self, query: &str, limit: usize) -> LookupResult<Vec<usize>> {
        if query.is_empty() {
            return Err(LookupError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }
        let needle = normalize(query);
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);

        let mut matches: Vec<usize> = self
            .rows
            .iter()
            .filter(|row| row.aliases.iter().any(|alias| alias.starts_with(&needle)))
            .map(|row| row.position)
            .collect();

        if matches.len() < limit {
            let prefix_count = matches.len();
            let contains = self
                .rows
                .iter()
                .filter(|row| !matches[..prefix_count].contains(&row.position))
                .filter(|row| row.aliases.iter().any(|alias| alias.contains(&needle)))
                .map(|row| row.position)
                .collect::<Vec<_>>();
            matches.extend(contains);
        }

        matches.truncate(limit);
        Ok(matches)
    }
}

fn aliases_for(trainer: &TrainerRecord) -> Vec<String> {
    let localized = |names: &Option<schema::LocalizedNames>| -> Vec<String> {
        names
            .iter()
            .flat_map(|map| map.values())
            .flatten()
            .filter(|value| !value.trim().is_empty())
            .map(|value| normalize(value))
            .collect()
    };

    let mut candidates = vec![normalize(&trainer.name_en)];
    if let Some(name_es) = &trainer.name_es {
        candidates.push(normalize(name_es));
    }
    candidates.extend(localized(&trainer.names));
    candidates.extend(localized(&trainer.classes));

    let mut aliases: Vec<String> = Vec::with_capacity(candidates.len());
    for alias in candidates {
        if !alias.is_empty() && !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::trainer_record;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[rstest]
    #[case("  Ace Trainer   Allen ", "ace trainer allen")]
    #[case("Entrenador Guay Álex", "entrenador guay alex")]
    #[case("Pokémon Breeder (F) Ximena", "pokemon breeder f ximena")]
    #[case("Ace_Trainer", "ace_trainer")]
    #[case("エリートトレーナー", "エリートトレーナー")]
    #[case("...", "")]
    #[case("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    fn localized(pairs: &[(&str, Option<&str>)]) -> Option<BTreeMap<String, Option<String>>> {
        Some(
            pairs
                .iter()
                .map(|(lang, value)| (lang.to_string(), value.map(str::to_string)))
                .collect(),
        )
    }

    fn trainers() -> Vec<TrainerRecord> {
        let mut allen = trainer_record("set4-allen", "Ace Trainer Allen", Some("Entrenador Guay Allen"));
        allen.names = localized(&[("en", Some("Allen")), ("ja", Some("アレン")), ("ko", None)]);
        allen.classes = localized(&[("en", Some("Ace Trainer")), ("es", Some("Entrenador Guay"))]);
        let sallen = trainer_record("set5-sallen", "Scientist Sallen", None);
        let galena = trainer_record("set5-galena", "Lady Galena", Some("Dama Galena"));
        vec![allen, sallen, galena]
    }

    #[test]
    fn test_aliases_are_normalized_and_deduplicated() {
        let aliases = aliases_for(&trainers()[0]);
        assert_eq!(
            aliases,
            vec![
                "ace trainer allen",
                "entrenador guay allen",
                "allen",
                "アレン",
                "ace trainer",
                "entrenador guay",
            ]
        );
    }

    #[test]
    fn test_prefix_matches_come_first() {
        let index = SearchIndex::build(&trainers());

        // "allen" is a prefix alias of Allen and a substring of Sallen.
        assert_eq!(index.search("Allen", 20).unwrap(), vec![0, 1]);
        assert_eq!(index.search("allen", 1).unwrap(), vec![0]);
    }

    #[test]
    fn test_search_matches_localized_names_and_classes() {
        let index = SearchIndex::build(&trainers());

        assert_eq!(index.search("アレン", 20).unwrap(), vec![0]);
        assert_eq!(index.search("entrenador", 20).unwrap(), vec![0]);
        assert_eq!(index.search("dáma", 20).unwrap(), vec![2]);
        assert!(index.search("nobody", 20).unwrap().is_empty());
    }

    #[test]
    fn test_search_limit_is_clamped() {
        let index = SearchIndex::build(&trainers());

        assert_eq!(index.search("a", 0).unwrap().len(), 1);
        assert_eq!(index.search("a", 1000).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_query_is_rejected() {
        let index = SearchIndex::build(&trainers());

        assert!(matches!(index.search("", 20), Err(LookupError::InvalidRequest(_))));
    }

    #[test]
    fn test_punctuation_only_query_lists_trainers_in_file_order() {
        let index = SearchIndex::build(&trainers());

        assert_eq!(index.search(" !? ", 20).unwrap(), vec![0, 1, 2]);
        assert_eq!(index.search(" ", 2).unwrap(), vec![0, 1]);
    }

    #[rstest]
    #[case(-5, 1)]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(20, 20)]
    #[case(50, 50)]
    #[case(51, 50)]
    #[case(i64::MAX, 50)]
    fn test_clamp_limit(#[case] limit: i64, #[case] expected: usize) {
        assert_eq!(clamp_limit(limit), expected);
    }
}
