//! Battle Subway Helper MCP Server
//!
//! Exposes trainer search, trainer detail, pool summaries and team
//! narrowing as MCP tools over stdio. Logs go to stderr.

use std::borrow::Cow;
use std::sync::Arc;

use battle_subway_helper::config::Settings;
use battle_subway_helper::errors::{LookupError, LookupResult};
use battle_subway_helper::loader::load_service;
use battle_subway_helper::logging::init_tracing;
use battle_subway_helper::mcp_interface::*;
use battle_subway_helper::search::{clamp_limit, DEFAULT_SEARCH_LIMIT};
use battle_subway_helper::service::LookupService;
use battle_subway_helper::EntityId;
use clap::Parser;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SubwayHelperService {
    tool_router: ToolRouter<SubwayHelperService>,
    lookup: Arc<LookupService>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchTrainersRequest {
    #[schemars(description = "Part of the trainer's name, in English or Spanish")]
    pub query: String,
    #[schemars(description = "Maximum number of results (1-50, default 20)")]
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TrainerDetailRequest {
    #[schemars(description = "Trainer id as returned by search_trainers, e.g. 'set4-allen'")]
    pub trainer_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FilterPoolRequest {
    #[schemars(description = "Pool id of the trainer being faced")]
    pub pool_id: String,
    #[schemars(description = "Global ids of the sets already seen in battle")]
    #[serde(default)]
    pub seen_global_ids: Vec<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPoolRequest {
    #[schemars(description = "Pool id to describe")]
    pub pool_id: String,
}

/// Summary text first, JSON payload second.
fn tool_output(result: LookupResult<(String, String)>) -> Result<CallToolResult, McpError> {
    match result {
        Ok((text, json)) => Ok(CallToolResult::success(vec![
            Content::text(text),
            Content::text(json),
        ])),
        Err(err) => {
            let code = match &err {
                LookupError::DataIntegrity(_) => {
                    warn!("{}", err);
                    ErrorCode(-32603)
                }
                _ => ErrorCode(-32602),
            };
            Err(McpError {
                code,
                message: Cow::from(err.to_string()),
                data: None,
            })
        }
    }
}

#[tool_router]
impl SubwayHelperService {
    pub fn new(lookup: Arc<LookupService>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            lookup,
        }
    }

    #[tool(description = "Search Battle Subway trainers by name (English or Spanish, accents optional)")]
    async fn search_trainers(
        &self,
        Parameters(request): Parameters<SearchTrainersRequest>,
    ) -> Result<CallToolResult, McpError> {
        let limit = request.limit.map_or(DEFAULT_SEARCH_LIMIT, clamp_limit);
        tool_output(search_trainers_text(&self.lookup, &request.query, limit))
    }

    #[tool(description = "Show a trainer with every set in their candidate pool")]
    async fn trainer_detail(
        &self,
        Parameters(request): Parameters<TrainerDetailRequest>,
    ) -> Result<CallToolResult, McpError> {
        tool_output(trainer_detail_text(&self.lookup, &request.trainer_id))
    }

    #[tool(description = "Narrow a pool to the teams still possible after seeing some sets")]
    async fn filter_pool(
        &self,
        Parameters(request): Parameters<FilterPoolRequest>,
    ) -> Result<CallToolResult, McpError> {
        let seen: Vec<EntityId> = request.seen_global_ids.into_iter().map(EntityId).collect();
        tool_output(filter_pool_text(&self.lookup, &request.pool_id, &seen))
    }

    #[tool(description = "Describe a pool: its members, trainers and number of possible teams")]
    async fn get_pool(
        &self,
        Parameters(request): Parameters<GetPoolRequest>,
    ) -> Result<CallToolResult, McpError> {
        tool_output(pool_summary_text(&self.lookup, &request.pool_id))
    }
}

#[tool_handler]
impl ServerHandler for SubwayHelperService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();
    init_tracing(&settings.log_level);

    let lookup = load_service(&settings.paths(), settings.strategy)?;
    let service = SubwayHelperService::new(Arc::new(lookup));

    info!("starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    info!(?quit_reason, "MCP server exiting");
    Ok(())
}
