//! Gauge MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdin/stdout. Logs go to stderr.
//!
//! Tools:
//! - convert: Set category, units and input of a converter form
//! - swap: Swap source and target units
//! - reset: Clear a form's input and result
//! - validate: Check whether text is a convertible number
//! - list_units / list_categories: Browse the unit registry
//! - preferences / clear_preferences: Inspect or forget remembered state
//! - help: Function documentation

use std::sync::Arc;
use gauge::{Category, Config, ConverterForm, ConverterSession, Gauge, CATEGORIES};
use gauge_core::Value;
use gauge_prefs::{clear_user_preferences, load_user_preferences, PreferenceStore};
use gauge_units::{CategoryError, ConversionError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "gauge";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    jsonrpc: String,
    /// `None` only when the key is absent; `"id": null` is still a request
    #[serde(default, deserialize_with = "present_id")]
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

impl McpResponse {
    fn ok(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    fn err(id: Option<JsonValue>, error: McpError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }
}

/// Server state: the function engine plus the converter session it drives
struct Server {
    gauge: Gauge,
    session: ConverterSession,
}

impl Server {
    fn new(gauge: Gauge, store: Arc<dyn PreferenceStore>) -> Self {
        let session = gauge.session(store);
        Self { gauge, session }
    }

    /// Handle one input line. `None` when nothing should be written back.
    fn handle_line(&mut self, line: &str) -> Option<McpResponse> {
        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return Some(McpResponse::err(Some(JsonValue::Null), McpError::new(PARSE_ERROR, format!("Parse error: {}", e))));
            }
        };

        debug!(method = %request.method, "processing request");
        let response = self.handle_request(&request);

        // Notifications (no id) get no response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            return None;
        }
        Some(response)
    }

    fn handle_request(&mut self, request: &McpRequest) -> McpResponse {
        if request.jsonrpc != "2.0" {
            return McpResponse::err(
                request.id.clone(),
                McpError::new(INVALID_REQUEST, format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
            );
        }

        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(&request.params),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => handle_tools_list(),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError::new(METHOD_NOT_FOUND, format!("Method not found: {}", request.method))),
        };

        match result {
            Ok(r) => McpResponse::ok(request.id.clone(), r),
            Err(e) => McpResponse::err(request.id.clone(), e),
        }
    }

    fn handle_tool_call(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        match name {
            "convert" => self.tool_convert(&args),
            "swap" => self.tool_swap(&args),
            "reset" => self.tool_reset(&args),
            "validate" => self.tool_validate(&args),
            "list_units" => self.tool_list_units(&args),
            "list_categories" => Ok(value_result(self.gauge.call("list_categories", &[]))),
            "preferences" => self.tool_preferences(),
            "clear_preferences" => self.tool_clear_preferences(),
            "help" => Ok(value_result(self.gauge.help(arg_str(&args, "name")))),
            _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }

    /// Category named in the arguments (which becomes the active tab), else the active one
    fn select_category(&mut self, args: &JsonValue) -> Result<Category, McpError> {
        match requested_category(args)? {
            Some(category) => self.activate(category),
            None => Ok(self.session.active_category()),
        }
    }

    fn activate(&mut self, category: Category) -> Result<Category, McpError> {
        self.session.set_active_category(category.id()).map_err(category_error)
    }

    fn tool_convert(&mut self, args: &JsonValue) -> Result<JsonValue, McpError> {
        // Every argument is checked before the session changes
        let requested = requested_category(args)?;
        let category = requested.unwrap_or_else(|| self.session.active_category());
        let from = arg_str(args, "from");
        let to = arg_str(args, "to");
        for unit in [from, to].into_iter().flatten() {
            check_unit(category, unit)?;
        }
        let text = match args.get("value") {
            None => None,
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            Some(JsonValue::Null) => Some(String::new()),
            Some(_) => return Err(McpError::invalid_params("value must be a string or number")),
        };

        if let Some(category) = requested {
            self.activate(category)?;
        }
        let form = self.session.form_mut(category);
        if let Some(from) = from {
            form.set_from_unit(from).map_err(unit_error)?;
        }
        if let Some(to) = to {
            form.set_to_unit(to).map_err(unit_error)?;
        }
        if let Some(text) = text {
            form.set_from_value(text);
        }

        Ok(form_result(form))
    }

    fn tool_swap(&mut self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let category = self.select_category(args)?;
        let form = self.session.form_mut(category);
        form.swap();
        Ok(form_result(form))
    }

    fn tool_reset(&mut self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let category = self.select_category(args)?;
        let form = self.session.form_mut(category);
        form.reset();
        Ok(form_result(form))
    }

    fn tool_validate(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let text = match args.get("value") {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Number(n)) => n.to_string(),
            _ => return Err(McpError::invalid_params("Missing value argument")),
        };
        Ok(value_result(self.gauge.call("validate_input", &[Value::Text(text)])))
    }

    fn tool_list_units(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let call_args: Vec<Value> = match arg_str(args, "category") {
            Some(id) => {
                // The registry lookup falls back to length; the tool reports the typo instead
                let category: Category = id.parse().map_err(category_error)?;
                vec![Value::from(category.id())]
            }
            None => vec![],
        };
        Ok(value_result(self.gauge.call("list_units", &call_args)))
    }

    fn tool_preferences(&self) -> Result<JsonValue, McpError> {
        let prefs = load_user_preferences(self.session.store().as_ref());
        let data = json!(prefs);
        let text = match &prefs {
            Some(_) => pretty(&data),
            None => "No saved preferences".to_string(),
        };
        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "data": data,
            "isError": false
        }))
    }

    fn tool_clear_preferences(&self) -> Result<JsonValue, McpError> {
        clear_user_preferences(self.session.store().as_ref());
        info!("preferences cleared");
        Ok(json!({
            "content": [{ "type": "text", "text": "Preferences cleared" }],
            "isError": false
        }))
    }
}

/// Parse the `category` argument without switching tabs
fn requested_category(args: &JsonValue) -> Result<Option<Category>, McpError> {
    arg_str(args, "category")
        .map(|id| id.parse::<Category>().map_err(category_error))
        .transpose()
}

fn category_error(e: CategoryError) -> McpError {
    McpError::invalid_params(e.to_string())
        .with_data(json!({ "available": CATEGORIES.iter().map(|c| c.id()).collect::<Vec<_>>() }))
}

fn check_unit(category: Category, unit: &str) -> Result<(), McpError> {
    if category.units().contains(unit) {
        return Ok(());
    }
    Err(unit_error(ConversionError::UnknownUnit {
        unit: unit.to_string(),
        category,
    }))
}

fn unit_error(e: ConversionError) -> McpError {
    McpError::invalid_params(e.to_string())
        .with_data(json!({ "available": form_unit_ids(e.category()) }))
}

fn arg_str<'a>(args: &'a JsonValue, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn form_unit_ids(category: Category) -> Vec<&'static str> {
    category.units().ids().collect()
}

fn pretty(data: &JsonValue) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

/// Tool result for a converter form
fn form_result(form: &ConverterForm) -> JsonValue {
    let state = form.state();
    let text = match &state.error {
        Some(reason) => reason.clone(),
        None if state.to_value.is_empty() => format!("{} → {}: enter a value", state.from_unit, state.to_unit),
        None => format!("{} {} = {} {}", state.from_value, state.from_unit, state.to_value, state.to_unit),
    };
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": state,
        "isError": state.error.is_some()
    })
}

/// Tool result for a registry value
fn value_result(value: Value) -> JsonValue {
    let data = value.to_json();
    let text = match &value {
        Value::Text(s) => s.clone(),
        Value::Error(e) => e.to_string(),
        _ => pretty(&data),
    };
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": data,
        "isError": value.is_error()
    })
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit converter for length, weight, temperature and volume"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Gauge converts between units of length, weight, temperature and volume. Use 'list_categories' and 'list_units' to discover unit ids, then 'convert'. The last conversion per category is remembered."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let category_ids: Vec<&str> = CATEGORIES.iter().map(|c| c.id()).collect();
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value. Omitted fields keep the form's current (or remembered) state.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": ["string", "number"],
                            "description": "Number to convert, e.g. \"12.5\" or \"1e3\""
                        },
                        "from": { "type": "string", "description": "Source unit id" },
                        "to": { "type": "string", "description": "Target unit id" },
                        "category": {
                            "type": "string",
                            "description": "Category; becomes the active one",
                            "enum": category_ids
                        }
                    }
                }
            },
            {
                "name": "swap",
                "description": "Swap source and target units; a valid result becomes the new input.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": category_ids }
                    }
                }
            },
            {
                "name": "reset",
                "description": "Clear a form's input, result and error.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": category_ids }
                    }
                }
            },
            {
                "name": "validate",
                "description": "Check whether text is a number that can be converted.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "string", "description": "Raw input text" }
                    },
                    "required": ["value"]
                }
            },
            {
                "name": "list_units",
                "description": "List the units of a category (default: length).",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": category_ids }
                    }
                }
            },
            {
                "name": "list_categories",
                "description": "List the unit categories.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "preferences",
                "description": "Show the remembered category and per-category conversions.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "clear_preferences",
                "description": "Forget all remembered conversions.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "help",
                "description": "Documentation for a function, or an overview when name is omitted.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Function name" }
                    }
                }
            }
        ]
    }))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

async fn run_stdio(server: &mut Server) -> std::io::Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            info!("client disconnected");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(response) = server.handle_line(trimmed) else {
            continue;
        };

        let response_json = match serde_json::to_string(&response) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                continue;
            }
        };
        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Gauge MCP server starting");
    let gauge = Gauge::with_standard_library().with_decimals(config.decimals);
    let mut server = Server::new(gauge, config.open_store());

    if let Err(e) = run_stdio(&mut server).await {
        error!(error = %e, "stdio transport failed");
        std::process::exit(1);
    }
    info!("server shutting down");
}
