//! Text rendering of service results for the MCP server.
//!
//! Each tool answers with a short human-readable summary; the raw JSON
//! payload is appended by the server so clients can also parse it.

use crate::errors::LookupResult;
use crate::service::{FilterResult, LookupService, PoolSummary, SearchResult, TrainerDetail};
use schema::{EntityId, SetRecord};

fn field<'a>(record: &'a SetRecord, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// One line per set: `#102 Garchomp @ Choice Scarf (Jolly): Earthquake / ...`
pub fn describe_set(record: &SetRecord) -> String {
    let global_id = match record.get("global_id") {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => "?".to_string(),
    };
    let mut line = format!("#{} {}", global_id, field(record, "species").unwrap_or("Unknown"));
    if let Some(item) = field(record, "item") {
        line.push_str(&format!(" @ {}", item));
    }
    if let Some(nature) = field(record, "nature") {
        line.push_str(&format!(" ({})", nature));
    }
    let moves: Vec<&str> = ["move1", "move2", "move3", "move4"]
        .iter()
        .filter_map(|key| field(record, key))
        .collect();
    if !moves.is_empty() {
        line.push_str(&format!(": {}", moves.join(" / ")));
    }
    line
}

fn id_list(ids: &[EntityId]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter().map(EntityId::to_string).collect::<Vec<_>>().join(", ")
}

pub fn display_search_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No trainers match '{}'.", query);
    }
    let mut output = format!("Trainers matching '{}':\n", query);
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} [{}] - {}\n",
            i + 1,
            result.display_name,
            result.section,
            result.trainer_id
        ));
    }
    output
}

pub fn display_trainer_detail(detail: &TrainerDetail) -> String {
    let mut output = format!(
        "--- {} ({}) ---\nTrainer id: {}\nPool: {} ({} candidate sets)\n",
        detail.display_name, detail.section, detail.trainer_id, detail.pool_id, detail.pool_size
    );
    for record in &detail.sets {
        output.push_str(&format!("  {}\n", describe_set(record)));
    }
    output
}

pub fn display_filter_result(result: &FilterResult) -> String {
    let mut output = format!(
        "Pool {} | seen: {}\n",
        result.pool_id,
        id_list(&result.seen_global_ids)
    );
    if result.num_possible_teams == 0 {
        output.push_str("No team in this pool is consistent with what was seen.\n");
        return output;
    }
    output.push_str(&format!(
        "{} possible team(s) remain.\n",
        result.num_possible_teams
    ));
    if result.possible_remaining_global_ids.is_empty() {
        output.push_str("The whole team has been seen.\n");
        return output;
    }
    output.push_str("Still possible:\n");
    for record in &result.possible_remaining_sets {
        output.push_str(&format!("  {}\n", describe_set(record)));
    }
    let hydrated = result.possible_remaining_sets.len();
    let total = result.possible_remaining_global_ids.len();
    if hydrated < total {
        output.push_str(&format!("  (+{} set(s) without stored details)\n", total - hydrated));
    }
    output
}

pub fn display_pool_summary(summary: &PoolSummary) -> String {
    format!(
        "--- Pool {} ---\nSize: {}\nPossible teams: {}\nMembers: {}\nTrainers: {}\n",
        summary.pool_id,
        summary.pool_size,
        summary.num_possible_teams,
        id_list(&summary.pool_global_ids),
        summary
            .trainer_ids
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

pub fn search_trainers_text(service: &LookupService, query: &str, limit: usize) -> LookupResult<(String, String)> {
    let results = service.search(query, limit)?;
    Ok((display_search_results(query, &results), to_json(&results)))
}

pub fn trainer_detail_text(service: &LookupService, trainer_id: &str) -> LookupResult<(String, String)> {
    let detail = service.trainer_detail(trainer_id)?;
    Ok((display_trainer_detail(&detail), to_json(&detail)))
}

pub fn filter_pool_text(
    service: &LookupService,
    pool_id: &str,
    seen: &[EntityId],
) -> LookupResult<(String, String)> {
    let result = service.filter(pool_id, seen)?;
    Ok((display_filter_result(&result), to_json(&result)))
}

pub fn pool_summary_text(service: &LookupService, pool_id: &str) -> LookupResult<(String, String)> {
    let summary = service.pool_summary(pool_id)?;
    Ok((display_pool_summary(&summary), to_json(&summary)))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    // Response types are plain data; serialization cannot fail for them.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
