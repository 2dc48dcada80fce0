use std::sync::Arc;

use nerve_core::{SessionItem, format_variations};
use nerve_store::StoreError;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::workspace::Workspace;

const DEFAULT_TOP: usize = 5;

#[derive(Clone)]
pub struct NerveServer {
    state: Arc<Mutex<ServerState>>,
    tool_router: ToolRouter<Self>,
}

struct ServerState {
    workspace: Workspace,
    rng: SmallRng,
}

impl NerveServer {
    pub fn new(workspace: Workspace) -> Self {
        Self::with_rng(workspace, SmallRng::from_os_rng())
    }

    pub fn with_rng(workspace: Workspace, rng: SmallRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServerState { workspace, rng })),
            tool_router: Self::tool_router(),
        }
    }
}

/// Missing sessions and rejected settings are the caller's fault; anything
/// else is ours.
fn to_mcp_error(e: anyhow::Error) -> McpError {
    match e.downcast_ref::<StoreError>() {
        Some(StoreError::NotFound(_) | StoreError::InvalidData(_)) => {
            McpError::invalid_params(format!("{e:#}"), None)
        }
        _ => McpError::internal_error(format!("{e:#}"), None),
    }
}

fn json_result(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&value).unwrap_or_default(),
    )]))
}

fn indexed_items(items: &[(usize, SessionItem)]) -> Vec<serde_json::Value> {
    items
        .iter()
        .map(|(index, item)| serde_json::json!({ "index": index, "item": item }))
        .collect()
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct PromptRequest {
    /// Free-text prompt to classify
    prompt: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct VariationsRequest {
    /// Free-text prompt to classify
    prompt: String,
    /// Number of variations; defaults to the `steps` setting
    steps: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct NewSessionRequest {
    /// Free-text prompt to classify into a session
    prompt: String,
    /// Optional session id; a random one is assigned otherwise
    id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TopRequest {
    /// Session id
    session: String,
    /// How many unexplored items to return (default 5)
    n: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ExpandRequest {
    /// Session id
    session: String,
    /// Normalized variable name, e.g. `electron_configuration`
    variable: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MarkExploredRequest {
    /// Session id
    session: String,
    /// Item position as reported by nerve_top
    index: usize,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConjectureRequest {
    /// Prompt to classify; ignored when `session` is given
    prompt: Option<String>,
    /// Session id to draw taxa from
    session: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SettingsRequest {
    /// Setting to change; omit to read all settings
    key: Option<String>,
    /// New value for `key`
    value: Option<String>,
    /// Flip boolean `key` instead of setting a value
    #[serde(default)]
    toggle: bool,
}

#[tool_router]
impl NerveServer {
    #[tool(
        description = "Classify a prompt against the loaded dictionaries. Returns per-fragment keywords and taxa (kingdom/phylum/family/order/variable/type/value with score), the deduplicated ranking, and a rendered summary."
    )]
    async fn nerve_analyze(
        &self,
        Parameters(req): Parameters<PromptRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let ServerState { workspace, rng } = &mut *state;

        let analysis = workspace.analyze(&req.prompt).map_err(to_mcp_error)?;
        let summary = workspace.summarize(&analysis, rng).map_err(to_mcp_error)?;
        json_result(serde_json::json!({
            "prompt": analysis.prompt,
            "fragments": analysis.fragments,
            "ranked": analysis.ranked(),
            "summary": summary,
        }))
    }

    #[tool(
        description = "Render phase-swept variations of a prompt's classification. Each variation foregrounds one variable chosen by a cosine sweep over the distinct variables."
    )]
    async fn nerve_variations(
        &self,
        Parameters(req): Parameters<VariationsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let ServerState { workspace, rng } = &mut *state;

        let analysis = workspace.analyze(&req.prompt).map_err(to_mcp_error)?;
        let variations = workspace
            .variations(&analysis, req.steps, rng)
            .map_err(to_mcp_error)?;
        json_result(serde_json::json!({
            "text": format_variations(&analysis, &variations),
            "variations": variations,
        }))
    }

    #[tool(
        description = "Classify a prompt and store the scored items as a new exploration session. Returns the session id and its top unexplored items."
    )]
    async fn nerve_new_session(
        &self,
        Parameters(req): Parameters<NewSessionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let ws = &state.workspace;

        let session = ws
            .new_session(&req.prompt, req.id.as_deref())
            .map_err(to_mcp_error)?;
        let top = ws.top(&session.id, DEFAULT_TOP).map_err(to_mcp_error)?;
        json_result(serde_json::json!({
            "id": session.id,
            "created": session.created,
            "items": session.items.len(),
            "top": indexed_items(&top),
        }))
    }

    #[tool(description = "List the first n unexplored items of a session, in score order.")]
    async fn nerve_top(
        &self,
        Parameters(req): Parameters<TopRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let top = state
            .workspace
            .top(&req.session, req.n.unwrap_or(DEFAULT_TOP))
            .map_err(to_mcp_error)?;
        json_result(serde_json::json!({
            "session": req.session,
            "items": indexed_items(&top),
        }))
    }

    #[tool(
        description = "Mark every item of a variable explored and return related items: the variable's own items, then those sharing its phylum and family."
    )]
    async fn nerve_expand(
        &self,
        Parameters(req): Parameters<ExpandRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let related = state
            .workspace
            .expand(&req.session, &req.variable)
            .map_err(to_mcp_error)?;
        json_result(serde_json::json!({
            "session": req.session,
            "variable": req.variable,
            "related": related,
        }))
    }

    #[tool(description = "Mark one session item explored by its index.")]
    async fn nerve_mark_explored(
        &self,
        Parameters(req): Parameters<MarkExploredRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let item = state
            .workspace
            .explore(&req.session, req.index)
            .map_err(to_mcp_error)?;
        json_result(serde_json::json!({
            "session": req.session,
            "index": req.index,
            "item": item,
        }))
    }

    #[tool(description = "List stored sessions, newest first, with item and explored counts.")]
    async fn nerve_list_sessions(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let sessions = state.workspace.list_sessions().map_err(to_mcp_error)?;
        json_result(serde_json::json!({ "sessions": sessions }))
    }

    #[tool(
        description = "Propose a one-sentence link between the strongest taxon and one from a different phylum, for a prompt or a stored session."
    )]
    async fn nerve_conjecture(
        &self,
        Parameters(req): Parameters<ConjectureRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let ws = &state.workspace;
        let text = match (req.session.as_deref(), req.prompt.as_deref()) {
            (Some(id), _) => ws.conjecture_for_session(id),
            (None, Some(prompt)) => ws.conjecture_for_prompt(prompt),
            (None, None) => {
                return Err(McpError::invalid_params(
                    "either 'prompt' or 'session' is required".to_string(),
                    None,
                ));
            }
        }
        .map_err(to_mcp_error)?;
        json_result(serde_json::json!({ "conjecture": text }))
    }

    #[tool(
        description = "Read render settings, or change one: pass key and value to set, or key with toggle=true to flip a boolean."
    )]
    async fn nerve_settings(
        &self,
        Parameters(req): Parameters<SettingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let ws = &state.workspace;
        match (req.key.as_deref(), req.value.as_deref(), req.toggle) {
            (None, _, _) => {}
            (Some(key), _, true) => {
                ws.toggle_setting(key).map_err(to_mcp_error)?;
            }
            (Some(key), Some(value), false) => {
                ws.set_setting(key, value).map_err(to_mcp_error)?;
            }
            (Some(_), None, false) => {
                return Err(McpError::invalid_params(
                    "'value' is required unless 'toggle' is set".to_string(),
                    None,
                ));
            }
        }
        let settings = ws.settings().map_err(to_mcp_error)?;
        json_result(serde_json::json!({ "settings": settings }))
    }
}

#[tool_handler]
impl ServerHandler for NerveServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Taxonomic classification over local JSON term dictionaries.\n\n\
                 WORKFLOW:\n\
                 1. CLASSIFY: call nerve_analyze with a prompt to see which dictionary entries it \
                    touches and how they rank.\n\
                 2. EXPLORE: call nerve_new_session to freeze the ranking, then walk it with \
                    nerve_top, nerve_mark_explored and nerve_expand. Sessions persist on disk; \
                    nerve_list_sessions finds earlier ones.\n\
                 3. VARY: nerve_variations renders the classification several ways, each \
                    foregrounding a different variable. nerve_conjecture links two distant taxa.\n\n\
                 \"No matches found\" is a normal outcome when no dictionary covers the prompt."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
