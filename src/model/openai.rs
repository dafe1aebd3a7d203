//! OpenAI-Compatible Chat Completions Client
//!
//! Talks to any endpoint implementing the `/chat/completions` contract.
//! Tool calls returned by the service are translated directly into
//! [`Action`] values; there is no shared "current action" slot to mutate.

use serde::{Deserialize, Serialize};

use super::ModelClient;
use crate::action::{Action, DebugMode};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::history::{History, Role};

/// Build the system prompt seeded into a fresh conversation
pub fn starter_prompt(shell_program: &str) -> String {
    format!(
        "You are ShellPilot, a command-line assistant who guides users with the {} shell and executes commands on their behalf.\n\
         You will provide commands, scripts, configuration files and explanations to the user.\n\
         Call the run_command tool when the user is asking about a shell or CLI command. Ask the user for missing parameters.\n\
         Call the generate_file tool when you need to produce code, a script or a file for the user. Explain the file but do not repeat its content in the explanation.",
        shell_program
    )
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallPayload>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallPayload {
    function: FunctionPayload,
}

#[derive(Debug, Deserialize)]
struct FunctionPayload {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct RunCommandArgs {
    command: String,
}

#[derive(Debug, Deserialize)]
struct GenerateFileArgs {
    #[serde(default)]
    file_name: String,
    content: String,
    #[serde(default)]
    description: String,
}

/// Client for an OpenAI-compatible chat-completions service
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    history: History,
}

impl OpenAiClient {
    /// Create a client and seed its history with the system prompt
    pub fn new(config: &ModelConfig, system_prompt: &str) -> Self {
        let mut history = History::new(config.history_window);
        history.push(Role::System, system_prompt);

        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            history,
        }
    }

    /// The function tools offered to the model when actions are allowed
    fn tool_definitions() -> serde_json::Value {
        serde_json::json!([
            {
                "type": "function",
                "function": {
                    "name": "run_command",
                    "description": "Execute a command in the user's shell. Ask the user for missing parameters.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "command": { "type": "string", "description": "The command text" }
                        },
                        "required": ["command"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "generate_file",
                    "description": "Generate a file, template or script based on the prompt.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "file_name": { "type": "string", "description": "The file name" },
                            "content": { "type": "string", "description": "The content of the file" },
                            "description": { "type": "string", "description": "A plain-text explanation of the file and how it works" }
                        },
                        "required": ["content"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "enable_debug",
                    "description": "Enable debug mode",
                    "parameters": { "type": "object", "properties": {} }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "disable_debug",
                    "description": "Disable debug mode",
                    "parameters": { "type": "object", "properties": {} }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "toggle_debug",
                    "description": "Toggle debug mode on or off",
                    "parameters": { "type": "object", "properties": {} }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "quit",
                    "description": "Exit the assistant",
                    "parameters": { "type": "object", "properties": {} }
                }
            }
        ])
    }

    /// Translate one tool call into an action.
    ///
    /// Malformed arguments are a model-response error, which the recovery
    /// loop treats as retryable.
    fn action_from_tool_call(name: &str, arguments: &str) -> Result<Action> {
        match name {
            "run_command" => {
                let args: RunCommandArgs =
                    serde_json::from_str(arguments).map_err(|e| Error::ModelResponse {
                        reason: format!("bad run_command arguments: {}", e),
                    })?;
                Ok(Action::RunCommand {
                    command: args.command,
                })
            }
            "generate_file" => {
                let args: GenerateFileArgs =
                    serde_json::from_str(arguments).map_err(|e| Error::ModelResponse {
                        reason: format!("bad generate_file arguments: {}", e),
                    })?;
                Ok(Action::GenerateFile {
                    file_name: args.file_name,
                    content: args.content,
                    description: args.description,
                })
            }
            "enable_debug" => Ok(Action::SetDebug {
                mode: DebugMode::On,
            }),
            "disable_debug" => Ok(Action::SetDebug {
                mode: DebugMode::Off,
            }),
            "toggle_debug" => Ok(Action::SetDebug {
                mode: DebugMode::Toggle,
            }),
            "quit" => Ok(Action::Quit),
            other => Err(Error::ModelResponse {
                reason: format!("unknown tool call '{}'", other),
            }),
        }
    }

    fn request_messages(&self) -> Vec<serde_json::Value> {
        self.history
            .windowed()
            .into_iter()
            .map(|entry| {
                serde_json::to_value(RequestMessage {
                    role: entry.role.as_str(),
                    content: &entry.text,
                })
                .unwrap_or_default()
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ModelClient for OpenAiClient {
    async fn respond(&mut self, prompt: &str, use_tools: bool) -> Result<Action> {
        self.history.push(Role::User, prompt);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": self.request_messages(),
        });
        if use_tools {
            body["tools"] = Self::tool_definitions();
        }

        debug!(use_tools, "sending chat-completions request");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ModelRequest {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::ModelRequest {
                reason: format!("service returned {}: {}", status, detail.trim()),
            });
        }

        let completion: ChatCompletion =
            response.json().await.map_err(|e| Error::ModelResponse {
                reason: e.to_string(),
            })?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| Error::ModelResponse {
                reason: "response contained no choices".to_string(),
            })?;

        if let Some(call) = message
            .tool_calls
            .as_ref()
            .and_then(|calls| calls.first())
        {
            debug!(tool = %call.function.name, "model requested a tool call");
            return Self::action_from_tool_call(&call.function.name, &call.function.arguments);
        }

        let text = message.content.unwrap_or_default();
        if text.is_empty() {
            return Err(Error::ModelResponse {
                reason: "response had neither text nor a tool call".to_string(),
            });
        }

        self.history.push(Role::Assistant, &text);
        Ok(Action::DisplayMessage { text })
    }

    fn record_outcome(&mut self, text: &str) {
        self.history.push(Role::Assistant, text);
    }
}
