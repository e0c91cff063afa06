//! In-memory indexes over the offline data files.
//!
//! A [`Repository`] is built once at startup and only read afterwards, so it
//! can be shared between request handlers behind an `Arc` without locking.

use crate::errors::{LookupError, LookupResult};
use schema::{EntityId, PoolId, PoolRecord, SetRecord, TrainerId, TrainerRecord};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// A deduplicated candidate pool: every set a trainer may bring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    id: PoolId,
    members: BTreeSet<EntityId>,
    declared_size: usize,
}

impl Pool {
    /// Repeated ids collapse into one member; the raw id count is kept as
    /// [`Pool::declared_size`].
    pub fn new(id: PoolId, members: impl IntoIterator<Item = EntityId>) -> Self {
        let ids: Vec<EntityId> = members.into_iter().collect();
        let declared_size = ids.len();
        let members: BTreeSet<EntityId> = ids.into_iter().collect();
        if members.len() != declared_size {
            warn!(
                pool_id = %id,
                declared = declared_size,
                distinct = members.len(),
                "pool lists the same global id more than once"
            );
        }
        Self {
            id,
            members,
            declared_size,
        }
    }

    pub fn id(&self) -> &PoolId {
        &self.id
    }

    pub fn members(&self) -> &BTreeSet<EntityId> {
        &self.members
    }

    /// Number of distinct members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Number of ids as listed in the pools file, repeats included.
    pub fn declared_size(&self) -> usize {
        self.declared_size
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }
}

impl From<PoolRecord> for Pool {
    fn from(record: PoolRecord) -> Self {
        Pool::new(record.pool_id, record.pool_global_ids)
    }
}

/// Counts gathered by [`Repository::check_integrity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub trainers: usize,
    pub pools: usize,
    pub sets: usize,
    /// Pool members that have no set record. Hydration skips these.
    pub missing_sets: Vec<(PoolId, EntityId)>,
}

#[derive(Debug, Clone, Default)]
pub struct Repository {
    trainers: Vec<TrainerRecord>,
    trainer_positions: HashMap<TrainerId, usize>,
    trainer_to_pool: HashMap<TrainerId, PoolId>,
    pools: HashMap<PoolId, Pool>,
    sets: HashMap<EntityId, SetRecord>,
}

impl Repository {
    pub fn new(
        trainers: Vec<TrainerRecord>,
        trainer_to_pool: HashMap<TrainerId, PoolId>,
        pools: impl IntoIterator<Item = Pool>,
        sets: HashMap<EntityId, SetRecord>,
    ) -> Self {
        let mut trainer_positions = HashMap::with_capacity(trainers.len());
        for (position, trainer) in trainers.iter().enumerate() {
            match trainer_positions.entry(trainer.trainer_id.clone()) {
                Entry::Occupied(_) => {
                    warn!(trainer_id = %trainer.trainer_id, "duplicate trainer id, keeping the first entry")
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }

        let mut pool_map = HashMap::new();
        for pool in pools {
            if pool_map.contains_key(pool.id()) {
                warn!(pool_id = %pool.id(), "duplicate pool id, keeping the last entry");
            }
            pool_map.insert(pool.id().clone(), pool);
        }

        Self {
            trainers,
            trainer_positions,
            trainer_to_pool,
            pools: pool_map,
            sets,
        }
    }

    /// Trainers in file order.
    pub fn trainers(&self) -> &[TrainerRecord] {
        &self.trainers
    }

    pub fn trainer(&self, trainer_id: &str) -> LookupResult<&TrainerRecord> {
        self.trainer_positions
            .get(trainer_id)
            .map(|&position| &self.trainers[position])
            .ok_or_else(|| LookupError::TrainerNotFound(TrainerId::new(trainer_id)))
    }

    /// Pool assigned to a trainer.
    ///
    /// A known trainer without a pool mapping means the pool index is broken,
    /// which is reported as [`LookupError::DataIntegrity`] rather than not-found.
    pub fn resolve_trainer(&self, trainer_id: &str) -> LookupResult<&PoolId> {
        let trainer = self.trainer(trainer_id)?;
        self.trainer_to_pool.get(trainer_id).ok_or_else(|| {
            LookupError::DataIntegrity(format!(
                "trainer_to_pool index missing trainer {}",
                trainer.trainer_id
            ))
        })
    }

    pub fn get_pool(&self, pool_id: &str) -> LookupResult<&Pool> {
        self.pools
            .get(pool_id)
            .ok_or_else(|| LookupError::PoolNotFound(PoolId::new(pool_id)))
    }

    /// Trainer ids mapped to `pool_id`, in trainer file order.
    pub fn trainers_in_pool(&self, pool_id: &str) -> Vec<&TrainerId> {
        self.trainers
            .iter()
            .map(|trainer| &trainer.trainer_id)
            .filter(|trainer_id| {
                self.trainer_to_pool
                    .get(trainer_id.as_str())
                    .is_some_and(|mapped| mapped.as_str() == pool_id)
            })
            .collect()
    }

    pub fn hydrate(&self, id: EntityId) -> LookupResult<&SetRecord> {
        self.sets.get(&id).ok_or(LookupError::EntityNotFound(id))
    }

    /// Records for `ids` in the given order. Ids without a record are skipped.
    pub fn hydrate_all(&self, ids: impl IntoIterator<Item = EntityId>) -> Vec<SetRecord> {
        ids.into_iter()
            .filter_map(|id| match self.hydrate(id) {
                Ok(record) => Some(record.clone()),
                Err(err) => {
                    warn!(global_id = %id, "skipping set: {}", err);
                    None
                }
            })
            .collect()
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Cross-check the indexes.
    ///
    /// Every trainer must map to a known pool; anything else is an error.
    /// Pool members without a set record are only collected in the report.
    pub fn check_integrity(&self) -> LookupResult<IntegrityReport> {
        let mut broken = Vec::new();
        for trainer in &self.trainers {
            match self.trainer_to_pool.get(trainer.trainer_id.as_str()) {
                None => broken.push(format!("{} has no pool", trainer.trainer_id)),
                Some(pool_id) if !self.pools.contains_key(pool_id) => {
                    broken.push(format!("{} maps to unknown {}", trainer.trainer_id, pool_id))
                }
                Some(_) => {}
            }
        }
        if !broken.is_empty() {
            return Err(LookupError::DataIntegrity(broken.join("; ")));
        }

        let sets = &self.sets;
        let mut missing_sets: Vec<(PoolId, EntityId)> = self
            .pools
            .values()
            .flat_map(|pool| {
                pool.members()
                    .iter()
                    .filter(move |id| !sets.contains_key(*id))
                    .map(move |&id| (pool.id().clone(), id))
            })
            .collect();
        missing_sets.sort();

        Ok(IntegrityReport {
            trainers: self.trainers.len(),
            pools: self.pools.len(),
            sets: self.sets.len(),
            missing_sets,
        })
    }
}
