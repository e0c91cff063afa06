//! Request/response operations shared by the HTTP and MCP front ends.

use crate::combinations::{binomial, compute_remaining, Strategy, TEAM_SIZE};
use crate::errors::{LookupError, LookupResult};
use crate::repository::Repository;
use crate::search::SearchIndex;
use schema::{EntityId, LocalizedNames, PoolId, SetRecord, TrainerId, TrainerRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub trainer_id: TrainerId,
    pub name_en: String,
    pub name_es: Option<String>,
    pub display_name: String,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerDetail {
    pub trainer_id: TrainerId,
    pub name_en: String,
    pub name_es: Option<String>,
    pub display_name: String,
    pub section: String,
    pub pool_id: PoolId,
    pub pool_size: usize,
    pub sets: Vec<SetRecord>,
    pub names: Option<LocalizedNames>,
    pub classes: Option<LocalizedNames>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub seen_global_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub pool_id: PoolId,
    pub seen_global_ids: Vec<EntityId>,
    pub num_possible_teams: u64,
    pub possible_remaining_global_ids: Vec<EntityId>,
    pub possible_remaining_sets: Vec<SetRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub pool_id: PoolId,
    pub pool_size: usize,
    pub pool_global_ids: Vec<EntityId>,
    pub trainer_ids: Vec<TrainerId>,
    pub num_possible_teams: u64,
}

/// The loaded repository plus its search index. Immutable once built.
#[derive(Debug, Clone)]
pub struct LookupService {
    repository: Repository,
    search_index: SearchIndex,
    strategy: Strategy,
}

impl LookupService {
    pub fn new(repository: Repository, strategy: Strategy) -> Self {
        let search_index = SearchIndex::build(repository.trainers());
        Self {
            repository,
            search_index,
            strategy,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn search(&self, query: &str, limit: usize) -> LookupResult<Vec<SearchResult>> {
        let positions = self.search_index.search(query, limit)?;
        let trainers = self.repository.trainers();
        Ok(positions
            .into_iter()
            .map(|position| search_result(&trainers[position]))
            .collect())
    }

    /// A trainer with its whole candidate pool hydrated for display.
    pub fn trainer_detail(&self, trainer_id: &str) -> LookupResult<TrainerDetail> {
        let trainer = self.repository.trainer(trainer_id)?;
        let pool_id = self.repository.resolve_trainer(trainer_id)?;
        let pool = self.repository.get_pool(pool_id.as_str()).map_err(|_| {
            LookupError::DataIntegrity(format!("{} not found in pools file", pool_id))
        })?;

        Ok(TrainerDetail {
            trainer_id: trainer.trainer_id.clone(),
            name_en: trainer.name_en.clone(),
            name_es: trainer.name_es.clone(),
            display_name: trainer.display_name(),
            section: trainer.section.clone(),
            pool_id: pool_id.clone(),
            pool_size: pool.declared_size(),
            sets: self.repository.hydrate_all(pool.members().iter().copied()),
            names: trainer.names.clone(),
            classes: trainer.classes.clone(),
        })
    }

    /// Narrow a pool by the sets already seen.
    ///
    /// An impossible observation is not an error: it yields zero teams and no
    /// remaining sets. Only an unknown pool fails.
    pub fn filter(&self, pool_id: &str, seen_ids: &[EntityId]) -> LookupResult<FilterResult> {
        let pool = self.repository.get_pool(pool_id)?;
        let seen: BTreeSet<EntityId> = seen_ids.iter().copied().collect();

        let outcome = compute_remaining(pool.members(), &seen, TEAM_SIZE, self.strategy);
        let remaining: Vec<EntityId> = if outcome.is_satisfiable() {
            outcome.remaining(&seen).into_iter().collect()
        } else {
            Vec::new()
        };
        debug!(
            pool_id,
            seen = seen.len(),
            teams = outcome.count,
            remaining = remaining.len(),
            strategy = %self.strategy,
            "filtered pool"
        );

        Ok(FilterResult {
            pool_id: pool.id().clone(),
            seen_global_ids: seen.into_iter().collect(),
            num_possible_teams: outcome.count,
            possible_remaining_sets: self.repository.hydrate_all(remaining.iter().copied()),
            possible_remaining_global_ids: remaining,
        })
    }

    pub fn pool_summary(&self, pool_id: &str) -> LookupResult<PoolSummary> {
        let pool = self.repository.get_pool(pool_id)?;
        Ok(PoolSummary {
            pool_id: pool.id().clone(),
            pool_size: pool.declared_size(),
            pool_global_ids: pool.members().iter().copied().collect(),
            trainer_ids: self
                .repository
                .trainers_in_pool(pool_id)
                .into_iter()
                .cloned()
                .collect(),
            num_possible_teams: binomial(pool.len(), TEAM_SIZE),
        })
    }
}

fn search_result(trainer: &TrainerRecord) -> SearchResult {
    SearchResult {
        trainer_id: trainer.trainer_id.clone(),
        name_en: trainer.name_en.clone(),
        name_es: trainer.name_es.clone(),
        display_name: trainer.display_name(),
        section: trainer.section.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Pool;
    use crate::tests::common::{sample_service, set_record, trainer_record};
    use pretty_assertions::assert_eq;
    use schema::PoolRecord;
    use std::collections::HashMap;

    #[test]
    fn test_trainer_detail() {
        let service = sample_service();

        let detail = service.trainer_detail("set4-allen").unwrap();
        assert_eq!(detail.pool_id.as_str(), "pool_a");
        assert_eq!(detail.pool_size, 6);
        assert_eq!(detail.display_name, "Entrenador Guay Allen");
        // 106 has no set record and is left out of the hydrated list.
        assert_eq!(detail.sets.len(), 5);
        assert_eq!(detail.sets[0], set_record(101, "Metagross"));
    }

    #[test]
    fn test_trainer_detail_unknown_trainer() {
        let service = sample_service();

        assert_eq!(
            service.trainer_detail("unknown-id"),
            Err(LookupError::TrainerNotFound(TrainerId::new("unknown-id")))
        );
    }

    #[test]
    fn test_trainer_detail_unmapped_trainer_is_internal() {
        let service = sample_service();

        assert!(matches!(
            service.trainer_detail("set5-orphan"),
            Err(LookupError::DataIntegrity(_))
        ));
    }

    #[test]
    fn test_filter_unknown_pool() {
        let service = sample_service();

        assert_eq!(
            service.filter("pool_missing", &[]),
            Err(LookupError::PoolNotFound(PoolId::new("pool_missing")))
        );
    }

    #[test]
    fn test_pool_summary() {
        let service = sample_service();

        let summary = service.pool_summary("pool_a").unwrap();
        assert_eq!(summary.pool_size, 6);
        assert_eq!(summary.num_possible_teams, 15);
        assert_eq!(
            summary.trainer_ids,
            vec![TrainerId::new("set4-allen"), TrainerId::new("set4-ximena")]
        );
    }

    #[test]
    fn test_search_returns_display_rows() {
        let service = sample_service();

        let results = service.search("ximena", 20).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].trainer_id.as_str(), "set4-ximena");
        assert_eq!(results[0].display_name, "Criadora Pokémon Ximena");
    }

    #[test]
    fn test_pool_size_counts_repeated_ids_as_listed() {
        let trainers = vec![trainer_record("set4-dup", "Ace Trainer Dup", None)];
        let trainer_to_pool = HashMap::from([(TrainerId::new("set4-dup"), PoolId::new("pool_dup"))]);
        let record = PoolRecord {
            pool_id: PoolId::new("pool_dup"),
            pool_global_ids: [1, 1, 2, 3, 4].into_iter().map(EntityId).collect(),
        };
        let sets = (1..=4).map(|id| (EntityId(id), set_record(id, "Bronzong"))).collect();
        let service = LookupService::new(
            Repository::new(trainers, trainer_to_pool, [Pool::from(record)], sets),
            Strategy::ClosedForm,
        );

        let detail = service.trainer_detail("set4-dup").unwrap();
        assert_eq!(detail.pool_size, 5);
        assert_eq!(detail.sets.len(), 4);

        let summary = service.pool_summary("pool_dup").unwrap();
        assert_eq!(summary.pool_size, 5);
        assert_eq!(summary.pool_global_ids.len(), 4);
        // Combinations are counted over distinct members.
        assert_eq!(summary.num_possible_teams, 1);
    }

    #[test]
    fn test_search_with_punctuation_only_lists_first_trainers() {
        let service = sample_service();

        let results = service.search(" !", 2).unwrap();
        let ids: Vec<&str> = results.iter().map(|row| row.trainer_id.as_str()).collect();
        assert_eq!(ids, vec!["set4-allen", "set4-ximena"]);
    }
}
