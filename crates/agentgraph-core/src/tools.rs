// Tool Abstraction
//
// Tools are defined using the `Tool` trait and registered with a
// `ToolRegistry` for execution by the tool node.
//
// Design decisions:
// - Tools are defined via a trait for flexibility (function-style tools)
// - Agent-recoverable failures (unknown tool, bad arguments, tool-level
//   errors) are absorbed into error-carrying ToolResults so the model can
//   decide how to proceed
// - Internal errors are logged but not exposed to the model (security)

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

use crate::error::{EngineError, Result};
use crate::tool_types::{ToolCall, ToolDefinition, ToolResult};

// ============================================================================
// Tool Outcome - Error Handling Contract
// ============================================================================

/// Result of a tool execution.
///
/// - `Success`: tool executed, result is returned to the model
/// - `ToolError`: tool-level error that is safe to show to the model
///   (e.g., "city not found", "invalid date format")
/// - `InternalError`: system-level error that must NOT be exposed to the
///   model; logged and replaced with a generic message
#[derive(Debug)]
pub enum ToolOutcome {
    /// Successful execution with a JSON result
    Success(Value),

    /// Tool-level error that is safe to show to the model
    ToolError(String),

    /// Internal/system error hidden from the model
    InternalError(String),
}

impl ToolOutcome {
    /// Create a successful outcome
    pub fn success(value: impl Into<Value>) -> Self {
        ToolOutcome::Success(value.into())
    }

    /// Create a tool-level error (safe to show to the model)
    pub fn tool_error(message: impl Into<String>) -> Self {
        ToolOutcome::ToolError(message.into())
    }

    /// Create an internal error (hidden from the model)
    pub fn internal_error(message: impl Into<String>) -> Self {
        ToolOutcome::InternalError(message.into())
    }

    /// Convert to a ToolResult for the message log.
    ///
    /// Internal errors are logged with full detail and replaced with a
    /// generic message before they reach the log.
    pub fn into_tool_result(self, tool_call_id: &str, tool_name: &str) -> ToolResult {
        match self {
            ToolOutcome::Success(value) => ToolResult {
                tool_call_id: tool_call_id.to_string(),
                result: Some(value),
                error: None,
            },
            ToolOutcome::ToolError(message) => ToolResult {
                tool_call_id: tool_call_id.to_string(),
                result: None,
                error: Some(message),
            },
            ToolOutcome::InternalError(message) => {
                error!(
                    tool_name = %tool_name,
                    tool_call_id = %tool_call_id,
                    error = %message,
                    "Tool internal error (details hidden from model)"
                );
                ToolResult {
                    tool_call_id: tool_call_id.to_string(),
                    result: None,
                    error: Some("an internal error occurred while executing the tool".to_string()),
                }
            }
        }
    }
}

// ============================================================================
// Argument Validation
// ============================================================================

/// Validate call arguments against a minimal JSON schema: the arguments
/// must be an object containing every key listed in `schema["required"]`.
pub fn validate_arguments(tool: &str, schema: &Value, arguments: &Value) -> Result<()> {
    let Some(object) = arguments.as_object() else {
        return Err(EngineError::invalid_arguments(
            tool,
            "arguments must be an object",
        ));
    };
    let Some(required) = schema.get("required").and_then(|r| r.as_array()) else {
        return Ok(());
    };
    for key in required.iter().filter_map(|k| k.as_str()) {
        if !object.contains_key(key) {
            return Err(EngineError::invalid_arguments(
                tool,
                format!("missing required field: {key}"),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Tool Trait
// ============================================================================

/// Trait for implementing tools executable by the tool node.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name, used by the model to invoke it
    fn name(&self) -> &str;

    /// Description provided to the model
    fn description(&self) -> &str;

    /// JSON schema describing the expected arguments
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with validated arguments
    async fn execute(&self, arguments: Value) -> ToolOutcome;

    /// Convert this tool to a definition for the model provider
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

// ============================================================================
// ToolRegistry
// ============================================================================

/// A registry holding callable tools by name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Register an Arc-wrapped tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Resolve a tool by name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::tool(format!("tool not registered: {name}")))
    }

    /// Check if a tool is registered
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for all registered tools, for the model provider
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute one call, absorbing agent-recoverable failures.
    ///
    /// Unknown tool names and schema-invalid arguments become
    /// error-carrying results rather than raised errors, keeping the
    /// conversation log self-describing.
    pub async fn execute_call(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.resolve(&call.name) {
            Ok(tool) => tool,
            Err(_) => {
                return ToolResult {
                    tool_call_id: call.id.clone(),
                    result: None,
                    error: Some(format!("tool not registered: {}", call.name)),
                }
            }
        };

        if let Err(err) = validate_arguments(&call.name, &tool.parameters_schema(), &call.arguments)
        {
            return ToolResult {
                tool_call_id: call.id.clone(),
                result: None,
                error: Some(err.to_string()),
            };
        }

        tool.execute(call.arguments.clone())
            .await
            .into_tool_result(&call.id, &call.name)
    }

    /// Create a builder for fluent tool registration
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for creating a ToolRegistry with a fluent API.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    registry: ToolRegistry,
}

impl ToolRegistryBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
        }
    }

    /// Add a tool to the registry
    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.registry.register(tool);
        self
    }

    /// Build the registry
    pub fn build(self) -> ToolRegistry {
        self.registry
    }
}

// ============================================================================
// Built-in Tools
// ============================================================================

/// A tool that echoes back its arguments (useful for testing)
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo back the provided message. Useful for testing tool execution."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "The message to echo back"
                }
            },
            "required": ["message"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: Value) -> ToolOutcome {
        let message = arguments
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        ToolOutcome::success(serde_json::json!({
            "echoed": message,
            "length": message.len()
        }))
    }
}

/// A tool that always fails (useful for testing error handling)
pub struct FailingTool {
    error_message: String,
    use_internal_error: bool,
}

impl FailingTool {
    /// Create a failing tool with a tool-level error
    pub fn with_tool_error(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            use_internal_error: false,
        }
    }

    /// Create a failing tool with an internal error
    pub fn with_internal_error(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            use_internal_error: true,
        }
    }
}

impl Default for FailingTool {
    fn default() -> Self {
        Self::with_tool_error("tool execution failed")
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "failing_tool"
    }

    fn description(&self) -> &str {
        "A tool that always fails (for testing error handling)"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn execute(&self, _arguments: Value) -> ToolOutcome {
        if self.use_internal_error {
            ToolOutcome::internal_error(&self.error_message)
        } else {
            ToolOutcome::tool_error(&self.error_message)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
