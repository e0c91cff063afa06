//! Reads the data directory produced by the offline pipeline into a [`Repository`].

use crate::combinations::Strategy;
use crate::config::DataPaths;
use crate::errors::{LoadError, LoadResult};
use crate::repository::{Pool, Repository};
use crate::service::LookupService;
use schema::{EntityId, PoolsFile, PoolsIndex, SetRecord, TrainersFile};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const TRAINERS_HINT: &str = "run the trainer scraper (fetch_subway_trainers_smogon) first";
const POOLS_HINT: &str = "run the pool deduplication step (dedupe_trainer_pools) first";
const POOLS_INDEX_HINT: &str = "run the pool index builder (build_pools_index) first";

/// Parse one JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

fn require_file(path: &Path, hint: &'static str) -> LoadResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::MissingFile {
            path: path.to_path_buf(),
            hint,
        })
    }
}

/// Load trainers, pools, the pool index and every indexed set file.
///
/// Missing or unreadable set files are logged and left out; the affected
/// ids are then skipped when hydrating responses.
pub fn load_repository(paths: &DataPaths) -> LoadResult<Repository> {
    require_file(&paths.trainers_file, TRAINERS_HINT)?;
    require_file(&paths.pools_file, POOLS_HINT)?;
    require_file(&paths.pools_index_file, POOLS_INDEX_HINT)?;

    let trainers: TrainersFile = read_json(&paths.trainers_file)?;
    let pools: PoolsFile = read_json(&paths.pools_file)?;
    let index: PoolsIndex = read_json(&paths.pools_index_file)?;

    let sets = load_sets(&paths.sets_dir, &index.global_id_to_setfile);

    info!(
        trainers = trainers.trainers.len(),
        pools = pools.pools.len(),
        sets = sets.len(),
        data_dir = %paths.data_dir.display(),
        "loaded data files"
    );

    Ok(Repository::new(
        trainers.trainers,
        index.trainer_to_pool,
        pools.pools.into_iter().map(Pool::from),
        sets,
    ))
}

/// Load the data directory, run the integrity check and build the service.
///
/// A trainer without a usable pool aborts startup. Pool members without a
/// set record only produce a warning.
pub fn load_service(paths: &DataPaths, strategy: Strategy) -> LoadResult<LookupService> {
    let repository = load_repository(paths)?;
    let report = repository.check_integrity()?;
    if !report.missing_sets.is_empty() {
        warn!(
            missing = report.missing_sets.len(),
            first = ?report.missing_sets.first(),
            "pool members without a set record"
        );
    }
    info!(
        trainers = report.trainers,
        pools = report.pools,
        sets = report.sets,
        strategy = %strategy,
        "data ready"
    );
    Ok(LookupService::new(repository, strategy))
}

/// Read every set file named by the index, keyed by global id.
pub fn load_sets(sets_dir: &Path, setfiles: &HashMap<EntityId, String>) -> HashMap<EntityId, SetRecord> {
    let mut entries: Vec<(&EntityId, &String)> = setfiles.iter().collect();
    entries.sort();

    let mut sets = HashMap::with_capacity(entries.len());
    for (&id, filename) in entries {
        let path = sets_dir.join(filename);
        match read_json::<SetRecord>(&path) {
            Ok(record) => {
                debug!(global_id = %id, file = %filename, "loaded set");
                sets.insert(id, record);
            }
            Err(err) => warn!(global_id = %id, "skipping set file: {}", err),
        }
    }
    sets
}
