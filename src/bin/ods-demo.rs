//! Interactive agent that answers questions with the tools of a running
//! `ods-server`.

use ods::cli::output::Output;
use ods::cli::DemoCli;
use ods::llm::{FinishReason, OpenAIClient, ToolCallingConfig, ToolCoordinator};
use ods::tools::McpConnection;
use ods::types::ConversationMessage;
use ods::utils::logging::init_tracing;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const SYSTEM_PROMPT: &str = "You are a research assistant. Use search_tool for questions about \
current events or facts you are unsure of, and calculate for arithmetic, unit conversions and \
quantitative questions. Cite sources when search results support your answer.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv_override();

    let cli = DemoCli::parse_args();
    init_tracing(cli.verbose);

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };
    output.banner();

    let connection = match McpConnection::connect(&cli.server_url).await {
        Ok(connection) => connection,
        Err(e) => {
            output.error(&format!("Connection failed: {}", e));
            std::process::exit(1);
        }
    };

    let registry = match connection.registry().await {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            output.error(&format!("Connection failed: {}", e));
            std::process::exit(1);
        }
    };

    output.success(&format!("Connected to {}", cli.server_url));
    for name in registry.tool_names() {
        output.list_item(&name);
    }

    let llm_config = cli.llm_config();
    if llm_config.api_key.is_empty() {
        output.warning("No API key set (--api-key or OPENROUTER_API_KEY); model calls will likely fail");
    }
    output.kv("model", &llm_config.model);

    let client = Arc::new(OpenAIClient::from_config(&llm_config));
    let coordinator = ToolCoordinator::new(
        client,
        registry,
        ToolCallingConfig {
            max_iterations: cli.max_iterations,
            ..Default::default()
        },
    );

    output.hint("Ask a question, or type 'exit' to quit.");

    let mut history = vec![ConversationMessage::system(SYSTEM_PROMPT)];
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        output.prompt();
        let Some(line) = lines.next_line().await? else {
            output.newline();
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }

        let mut messages = history.clone();
        messages.push(ConversationMessage::user(question));

        match coordinator.execute_with_history(messages).await {
            Ok(result) => {
                for call in &result.tool_calls {
                    let shown = match &call.result {
                        serde_json::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    output.tool_call(&call.name, &call.arguments.to_string(), &shown);
                }
                output.answer(&result.content);
                tracing::debug!(
                    iterations = result.iterations,
                    finish_reason = %result.finish_reason,
                    "turn complete"
                );
                // A dangling call to an unknown tool would poison the next request.
                if !matches!(result.finish_reason, FinishReason::UnknownTool(_)) {
                    history = result.message_history;
                }
            }
            Err(e) => output.error(&e.to_string()),
        }
    }

    connection.close().await?;
    Ok(())
}
