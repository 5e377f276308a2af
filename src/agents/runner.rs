use anyhow::{Context, Result};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::llm::{LlmProvider, Message, ToolCall};
use crate::tools::ToolRegistry;

const PLANNING_PROMPT: &str = "Before acting, write a short numbered plan for the remaining work \
based on the task and everything observed so far. Do not call any tools in this step; \
answer with the plan only.";

const FINAL_ANSWER_PROMPT: &str = "You have reached the maximum number of steps. \
Do not call any more tools. Give your final answer now, summarizing what was done and \
where the results are.";

fn planning_due(step: usize, interval: Option<usize>) -> bool {
    match interval {
        Some(n) if n > 0 => step % n == 0,
        _ => false,
    }
}

/// Shared agent execution loop.
///
/// Each step optionally refreshes the plan, then lets the model call tools.
/// The loop ends when the model answers without tool calls. After
/// `max_steps` tool rounds the model is asked once more for its final answer.
///
/// Tools are offered on every request, including the planning and final
/// answer requests: once the conversation carries tool calls and results,
/// backends reject requests that do not define tools. Tool calls returned by
/// those two requests are ignored.
pub async fn agent_loop(
    agent_name: &str,
    system_prompt: &str,
    mut messages: Vec<Message>,
    provider: &dyn LlmProvider,
    tools: &ToolRegistry,
    settings: &AgentConfig,
) -> Result<String> {
    let tool_refs = tools.all();

    for step in 0..settings.max_steps {
        debug!(agent = agent_name, step, "agent step");

        // Avoid hammering the API
        if step > 0 {
            sleep(Duration::from_millis(100)).await;
        }

        if planning_due(step, settings.planning_interval) {
            let mut planning = messages.clone();
            planning.push(Message::user(PLANNING_PROMPT));
            let plan = provider
                .chat(system_prompt, &planning, &tool_refs)
                .await
                .with_context(|| format!("{} agent: planning failed", agent_name))?;
            if !plan.tool_calls.is_empty() {
                debug!(agent = agent_name, step, "ignoring tool calls in planning response");
            }
            info!(agent = agent_name, step, plan = %plan.message.content, "plan updated");
            messages.push(Message::assistant(format!(
                "Plan:\n{}",
                plan.message.content
            )));
        }

        let response = provider
            .chat(system_prompt, &messages, &tool_refs)
            .await
            .with_context(|| format!("{} agent: LLM chat failed", agent_name))?;

        debug!(agent = agent_name, content = %response.message.content, "llm response");

        let tool_calls = response.tool_calls;
        if tool_calls.is_empty() {
            info!(agent = agent_name, step, "agent completed (no more tool calls)");
            return Ok(response.message.content);
        }

        let mut tool_results = Vec::with_capacity(tool_calls.len());
        for tool_call in &tool_calls {
            info!(agent = agent_name, tool = %tool_call.name, "executing tool");
            let result = execute_tool_call(tools, tool_call).await;
            debug!(agent = agent_name, tool = %tool_call.name, result = %result, "tool result");
            tool_results.push((tool_call.id.clone(), result));
        }

        messages.push(Message::assistant_with_tools(
            &response.message.content,
            tool_calls,
        ));
        for (id, result) in tool_results {
            messages.push(Message::tool_result(id, result));
        }
    }

    warn!(
        agent = agent_name,
        max_steps = settings.max_steps,
        "step limit reached, requesting final answer"
    );
    messages.push(Message::user(FINAL_ANSWER_PROMPT));
    let response = provider
        .chat(system_prompt, &messages, &tool_refs)
        .await
        .with_context(|| format!("{} agent: final answer request failed", agent_name))?;
    if !response.tool_calls.is_empty() {
        debug!(agent = agent_name, "ignoring tool calls in final answer response");
    }
    Ok(response.message.content)
}

async fn execute_tool_call(tools: &ToolRegistry, tool_call: &ToolCall) -> String {
    if let Some(tool) = tools.get(&tool_call.name) {
        match tool.execute(tool_call.arguments.clone()).await {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        }
    } else {
        format!("Error: unknown tool '{}'", tool_call.name)
    }
}
