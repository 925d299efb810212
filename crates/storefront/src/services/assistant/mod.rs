//! Store assistant.
//!
//! Chat goes to the Anthropic Messages API when a key is configured and to
//! the built-in keyword responder otherwise. Insights are always computed
//! locally from the catalog.

mod client;
mod error;
pub mod rules;
pub mod types;

pub use client::AnthropicClient;
pub use error::AssistantError;
pub use rules::{ProductGap, Recommendation, Recommendations, StoreInsights};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AssistantConfig;
use types::{Message, Role};

/// Store details attached to a chat when the store belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreContext {
    pub name: String,
    pub product_count: usize,
}

/// Everything the assistant knows about the person asking.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub user_name: String,
    pub store: Option<StoreContext>,
}

/// A previous turn supplied by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

/// Reply to `POST /api/ai/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub response: String,
    /// Reserved; always null.
    pub suggested_products: Option<Vec<String>>,
    pub action_items: Vec<String>,
}

impl ChatReply {
    fn new(response: String) -> Self {
        Self {
            response,
            suggested_products: None,
            action_items: rules::ACTION_ITEMS.map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Remote(AnthropicClient),
    Rules,
}

/// Chat front door shared through `AppState`.
#[derive(Debug, Clone)]
pub struct AssistantService {
    backend: Backend,
}

impl AssistantService {
    /// Remote when `config` is present, built-in otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote client cannot be built.
    pub fn from_config(config: Option<&AssistantConfig>) -> Result<Self, AssistantError> {
        let backend = match config {
            Some(config) => Backend::Remote(AnthropicClient::new(config)?),
            None => Backend::Rules,
        };
        Ok(Self { backend })
    }

    /// Keyword responder only.
    #[must_use]
    pub const fn built_in() -> Self {
        Self {
            backend: Backend::Rules,
        }
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    /// Answer `message`. The remote reply is returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns an `AssistantError` when the remote call fails. The built-in
    /// responder never fails.
    #[instrument(skip(self, context, message, history), fields(remote = self.is_remote()))]
    pub async fn chat(
        &self,
        context: &ChatContext,
        message: &str,
        history: &[HistoryTurn],
    ) -> Result<ChatReply, AssistantError> {
        match &self.backend {
            Backend::Rules => Ok(ChatReply::new(rules::keyword_reply(
                &context.user_name,
                message,
            ))),
            Backend::Remote(client) => {
                let mut messages: Vec<Message> = history
                    .iter()
                    .map(|turn| Message {
                        role: turn.role,
                        content: turn.content.clone(),
                    })
                    .collect();
                messages.push(Message::user(message));
                let text = client.complete(messages, Some(system_prompt(context))).await?;
                Ok(ChatReply::new(text))
            }
        }
    }
}

fn system_prompt(context: &ChatContext) -> String {
    let mut prompt = format!(
        "You are a concise ecommerce coach helping {} run an online store built from a \
         shared product catalog. Give practical advice on products, pricing and marketing.",
        context.user_name
    );
    if let Some(store) = &context.store {
        prompt.push_str(&format!(
            " Their store is called '{}' and currently lists {} products.",
            store.name, store.product_count
        ));
    }
    prompt
}
