// Weather Agent Example
//
// Demonstrates the reason/act loop end to end with a scripted model and a
// real tool: the model requests a weather lookup, the tool node executes
// it, and the model turns the result into a final answer.
// Run with: cargo run --example weather_agent

use std::sync::Arc;

use agentgraph_core::{
    InMemoryCheckpointStore, Message, MessageRole, ScriptedModel, ScriptedResponse, StateUpdate,
    Tool, ToolCall, ToolOutcome, ToolRegistry,
};
use agentgraph_runtime::{agent_graph, ExecutionEngine};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_stream::StreamExt;

/// A canned weather lookup. A real deployment would call an HTTP API here.
struct GetWeatherTool;

#[async_trait]
impl Tool for GetWeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g. 'San Francisco'"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, arguments: Value) -> ToolOutcome {
        let Some(city) = arguments.get("city").and_then(|v| v.as_str()) else {
            return ToolOutcome::tool_error("city must be a string");
        };
        match city.to_lowercase().as_str() {
            "san francisco" => ToolOutcome::success(json!({
                "city": city,
                "temperature_f": 60,
                "conditions": "foggy"
            })),
            _ => ToolOutcome::tool_error(format!("no forecast available for '{city}'")),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,agentgraph_runtime=debug")
        .init();

    println!("=== Weather Agent Example ===\n");

    // Scripted model: first requests the tool, then answers from its result
    let model = Arc::new(ScriptedModel::with_responses(vec![
        ScriptedResponse::with_tools(vec![ToolCall {
            id: "call_1".to_string(),
            name: "get_weather".to_string(),
            arguments: json!({ "city": "San Francisco" }),
        }]),
        ScriptedResponse::text("It's 60°F and foggy in San Francisco right now."),
    ]));

    let registry = ToolRegistry::builder().tool(GetWeatherTool).build();
    let graph = agent_graph(model, registry)?;

    let store = Arc::new(InMemoryCheckpointStore::new());
    let engine = ExecutionEngine::new(Arc::new(graph), store);

    // Stream the run so each committed step is visible as it happens
    println!("User: What's the weather in San Francisco?\n");
    let mut stream = engine.stream(
        "weather-demo",
        StateUpdate::message(Message::user("What's the weather in San Francisco?")),
    );
    while let Some(step) = stream.next().await {
        let step = step?;
        println!(
            "[step {}] node '{}' appended {} message(s)",
            step.seq,
            step.node,
            step.update.messages.len()
        );
    }

    // Replay the conversation from the checkpoint history
    let history = engine.history("weather-demo").await?;
    let final_state = &history.last().expect("run produced checkpoints").state;

    println!("\n=== Conversation ===");
    for msg in &final_state.messages {
        let role = match msg.role {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
            MessageRole::System => "System",
            MessageRole::Tool => "Tool",
        };
        if msg.has_tool_calls() {
            let names: Vec<_> = msg.tool_calls.iter().map(|c| c.name.as_str()).collect();
            println!("{}: (requesting tools: {})", role, names.join(", "));
        } else {
            println!("{}: {}", role, msg.content);
        }
    }

    println!("\n{} checkpoints persisted", history.len());
    Ok(())
}
