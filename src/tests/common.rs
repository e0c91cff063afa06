use crate::combinations::Strategy;
use crate::repository::{Pool, Repository};
use crate::service::LookupService;
use schema::{EntityId, PoolId, SetRecord, TrainerId, TrainerRecord};
use serde_json::json;
use std::collections::{BTreeSet, HashMap};

pub fn ids(values: &[u32]) -> BTreeSet<EntityId> {
    values.iter().copied().map(EntityId).collect()
}

pub fn set_record(global_id: u32, species: &str) -> SetRecord {
    json!({
        "global_id": global_id,
        "species": species,
        "nature": "Jolly",
        "item": "Choice Scarf",
        "move1": "Earthquake",
        "move2": "Stone Edge",
        "move3": "Outrage",
        "move4": "Fire Fang",
    })
}

pub fn trainer_record(trainer_id: &str, name_en: &str, name_es: Option<&str>) -> TrainerRecord {
    TrainerRecord {
        trainer_id: TrainerId::new(trainer_id),
        name_en: name_en.to_string(),
        name_es: name_es.map(str::to_string),
        section: "Super Set 4".to_string(),
        pool_global_ids: vec![],
        names: None,
        classes: None,
    }
}

/// Two pools:
/// - `pool_a` = 101..=106, shared by Allen and Ximena; 106 has no set record.
/// - `pool_b` = 201..=203, smaller than a team, used by Galena.
///
/// `set5-orphan` exists but has no pool mapping.
pub fn sample_repository() -> Repository {
    let mut galena = trainer_record("set5-galena", "Lady Galena", Some("Dama Galena"));
    galena.section = "Super Set 5".to_string();
    let mut orphan = trainer_record("set5-orphan", "Worker Orphan", None);
    orphan.section = "Super Set 5".to_string();

    let trainers = vec![
        trainer_record("set4-allen", "Ace Trainer Allen", Some("Entrenador Guay Allen")),
        trainer_record("set4-ximena", "Pokemon Breeder Ximena", Some("Criadora Pokémon Ximena")),
        galena,
        orphan,
    ];

    let trainer_to_pool = HashMap::from([
        (TrainerId::new("set4-allen"), PoolId::new("pool_a")),
        (TrainerId::new("set4-ximena"), PoolId::new("pool_a")),
        (TrainerId::new("set5-galena"), PoolId::new("pool_b")),
    ]);

    let pools = vec![
        Pool::new(PoolId::new("pool_a"), ids(&[101, 102, 103, 104, 105, 106])),
        Pool::new(PoolId::new("pool_b"), ids(&[201, 202, 203])),
    ];

    let species = [
        (101, "Metagross"),
        (102, "Garchomp"),
        (103, "Salamence"),
        (104, "Tyranitar"),
        (105, "Lucario"),
        (201, "Milotic"),
        (202, "Gengar"),
        (203, "Scizor"),
    ];
    let sets = species
        .iter()
        .map(|&(id, name)| (EntityId(id), set_record(id, name)))
        .collect();

    Repository::new(trainers, trainer_to_pool, pools, sets)
}

pub fn sample_service() -> LookupService {
    LookupService::new(sample_repository(), Strategy::ClosedForm)
}

pub fn sample_service_with(strategy: Strategy) -> LookupService {
    LookupService::new(sample_repository(), strategy)
}
