use crate::{EntityId, PoolId, TrainerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A stored Pokemon set. The serving layer never interprets these beyond
/// picking a few display fields, so they stay as raw JSON.
pub type SetRecord = serde_json::Value;

/// Language code -> localized string. Missing translations are `null`.
pub type LocalizedNames = BTreeMap<String, Option<String>>;

/// One trainer entry of `subway_trainers_set45.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerRecord {
    pub trainer_id: TrainerId,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_es: Option<String>,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub pool_global_ids: Vec<EntityId>,
    #[serde(default)]
    pub names: Option<LocalizedNames>,
    #[serde(default)]
    pub classes: Option<LocalizedNames>,
}

impl TrainerRecord {
    /// Spanish full name when present, English full name otherwise.
    pub fn display_name(&self) -> String {
        match self.name_es.as_deref().map(str::trim) {
            Some(name_es) if !name_es.is_empty() => name_es.to_string(),
            _ => self.name_en.trim().to_string(),
        }
    }
}

/// Top level of `subway_trainers_set45.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainersFile {
    #[serde(default)]
    pub trainers: Vec<TrainerRecord>,
}

/// One deduplicated pool of `subway_pools_set45.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub pool_id: PoolId,
    #[serde(default)]
    pub pool_global_ids: Vec<EntityId>,
}

/// Top level of `subway_pools_set45.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolsFile {
    #[serde(default)]
    pub pools: Vec<PoolRecord>,
}

/// `subway_pools_index_set45.json`: the lookup tables built next to the pools file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolsIndex {
    #[serde(default)]
    pub trainer_to_pool: HashMap<TrainerId, PoolId>,
    #[serde(default)]
    pub global_id_to_setfile: HashMap<EntityId, String>,
}
