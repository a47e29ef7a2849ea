// crates/review_code/src/lib.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};

use analyze_code_block::analyze_code_block;
use extract_code_blocks::extract_code_blocks;
use format_report::format_report;

pub mod config;
pub mod services;

use services::ChatRuntime;

/// Sent when the conversation has no messages yet.
pub const GREETING: &str = "Hello! I'm your code analysis assistant. Share some code with me, and I'll check for TODOs and incomplete functions!";

/// Sent when the latest user message has no complete fenced block.
pub const NO_CODE_PROMPT: &str = "Please share your code inside triple backticks (```) so I can check it for TODOs and incomplete functions.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What a single turn produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// One entry per reply message, in send order.
    pub replies: Vec<String>,
    /// Always `true`: every turn ends by handing control back to the user.
    pub wait_for_input: bool,
}

/// Decides the replies for one turn from the full history.
///
/// * empty history: the greeting
/// * no complete fenced block in the latest user message: the fence prompt
/// * otherwise: one report per block, each analyzed on its own
pub fn process_turn(history: &[Message]) -> TurnOutcome {
    let replies = if history.is_empty() {
        vec![GREETING.to_string()]
    } else {
        let latest = history
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.content.as_str())
            .unwrap_or_default();

        let blocks = extract_code_blocks(latest);
        if blocks.is_empty() {
            vec![NO_CODE_PROMPT.to_string()]
        } else {
            blocks
                .iter()
                .map(|block| format_report(&analyze_code_block(&block.content)))
                .collect()
        }
    };

    TurnOutcome {
        replies,
        wait_for_input: true,
    }
}

/// Runs one turn against a runtime. Returns whether the runtime has more
/// input to process.
pub fn run_turn(runtime: &mut impl ChatRuntime) -> Result<bool> {
    let history = runtime.fetch_history()?;
    log::debug!("turn start: {} message(s) in history", history.len());

    let outcome = process_turn(&history);
    for reply in &outcome.replies {
        runtime.send_reply(reply)?;
    }
    log::debug!("turn end: {} reply(ies) sent", outcome.replies.len());

    if outcome.wait_for_input {
        runtime.request_user_input()
    } else {
        Ok(false)
    }
}

/// Keeps running turns until the runtime runs out of input.
pub fn run_session(runtime: &mut impl ChatRuntime) -> Result<()> {
    while run_turn(runtime)? {}
    Ok(())
}
