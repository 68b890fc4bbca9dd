//! Two-pass turn loop: completion, tool dispatch, completion, composition

use crate::config::ModelParams;
use crate::error::{Error, Result};
use crate::llm::{ChatClient, ChatMessage, ChatOptions, ContentBlock, ToolChoice};
use crate::orchestrator::ComposedAnswer;
use crate::tools::{ToolCall, ToolRegistry};
use std::sync::Arc;

/// Synthetic assistant note appended after a successful image generation.
/// The URL travels as a side artifact; the model must not restate it.
const IMAGE_NOTE: &str = "The image has been generated and will be delivered \
    alongside this reply. Do not include or restate the image URL in the \
    answer text.";

/// Synthetic assistant instruction appended after a URL fetch, shaping the
/// second-pass summary.
const SUMMARY_INSTRUCTION: &str = "Summarize the fetched content as: a \
    one-line gist, 3-5 bulleted key points, and a short list of topic tags.";

/// Drives one conversational turn: a first completion pass with the tool
/// catalog, in-order dispatch of whatever tools the model requested, and a
/// second pass over the augmented conversation.
pub struct Orchestrator {
    llm: Arc<dyn ChatClient>,
    registry: ToolRegistry,
    defaults: ModelParams,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn ChatClient>, registry: ToolRegistry, defaults: ModelParams) -> Self {
        Self {
            llm,
            registry,
            defaults,
        }
    }

    /// Run one turn over `messages`, mutating it in place: the assistant's
    /// tool requests, the correlated tool results and any synthetic notes are
    /// all appended, followed by the final assistant answer.
    ///
    /// `overrides` carries per-call model/sampling overrides; unset fields
    /// fall back to the orchestrator's defaults. Tool choice is forced to
    /// `auto` on both passes.
    pub async fn run_turn(
        &self,
        messages: &mut Vec<ChatMessage>,
        overrides: Option<ChatOptions>,
    ) -> Result<ComposedAnswer> {
        let mut options = overrides.unwrap_or_default().merge_params(&self.defaults);
        options.tool_choice = Some(ToolChoice::Auto);

        let specs = self.registry.specs();
        let first = self
            .llm
            .chat_completion(messages.clone(), Some(specs.clone()), Some(options.clone()))
            .await?;

        if !first.message.has_tool_use() {
            // Fast path: the model answered directly.
            let text = first.message.get_text().unwrap_or_default();
            messages.push(first.message);
            return Ok(ComposedAnswer::text_only(text));
        }

        let calls: Vec<ToolCall> = first
            .message
            .get_tool_uses()
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    arguments: input.clone(),
                }),
                _ => None,
            })
            .collect();
        messages.push(first.message);

        let mut pending_image: Option<String> = None;
        let mut dispatched = 0usize;
        let expected = calls.len();

        for call in calls {
            let name = call.name.clone();
            tracing::info!(tool = %name, id = %call.id, "dispatching tool call");
            let result = self.registry.execute(call).await?;
            dispatched += 1;
            messages.push(ChatMessage::tool_result(
                result.tool_call_id.clone(),
                name.clone(),
                result.content.clone(),
                !result.success,
            ));

            match name.as_str() {
                "draw_image" if result.success => {
                    if pending_image.is_none() {
                        messages.push(ChatMessage::assistant(IMAGE_NOTE));
                    }
                    pending_image = Some(result.content);
                }
                "summarize_url" => {
                    messages.push(ChatMessage::assistant(SUMMARY_INSTRUCTION));
                }
                _ => {}
            }
        }

        if dispatched != expected {
            return Err(Error::Generic(format!(
                "dispatched {dispatched} tool results for {expected} tool calls"
            )));
        }

        let second = self
            .llm
            .chat_completion(messages.clone(), Some(specs), Some(options))
            .await?;
        let text = second.message.get_text().unwrap_or_default();
        messages.push(second.message);

        Ok(ComposedAnswer::compose(text, pending_image))
    }
}
