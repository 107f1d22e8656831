//! Agent Application Service (Use Case)
//!
//! One call to [`AgentService::run_turn`] handles one user message:
//! history and memory are loaded, lookups may short-circuit straight to
//! `global_search`, everything else goes through at most two LLM
//! completions with a round of tool calls in between.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use aperture::domain::services::{clean_query, is_search_request, render_system_prompt};
use aperture::{
    AgentContext, AgentFailure, ChatMessage, ChatSession, CompletionOptions, ConversationMessage,
    DomainError, FunctionTool, LlmProvider, MessageRole, SessionRepository, StudioRepository,
    ToolRegistry,
};

use super::tool_executor::{execute_tool_call, surface_tool_errors};
use crate::config::AgentConfig;
use crate::tools::global_search;

pub const NO_RESPONSE_FALLBACK: &str = "I apologize, but I couldn't generate a response.";
pub const NO_DETAIL_FALLBACK: &str = "Task completed but no detailed response generated.";

/// Tunables for the turn loop
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub history_limit: usize,
    pub prompt_window: usize,
    pub tool_warn_threshold: usize,
    pub completion: CompletionOptions,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from(&AgentConfig::default())
    }
}

impl From<&AgentConfig> for AgentSettings {
    fn from(config: &AgentConfig) -> Self {
        Self {
            history_limit: config.history_limit,
            prompt_window: config.prompt_window,
            tool_warn_threshold: config.tool_warn_threshold,
            completion: CompletionOptions::default(),
        }
    }
}

/// Outcome of one agent turn
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub session_id: Uuid,
    pub response: String,
    /// Tools whose handler ran during the turn, in call order
    pub tools_used: Vec<String>,
    /// Whether the search shortcut answered without the LLM
    pub shortcut: bool,
}

/// Application service for agent conversations
pub struct AgentService<S: SessionRepository + ?Sized, T: StudioRepository + ?Sized> {
    sessions: Arc<S>,
    studios: Arc<T>,
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    settings: AgentSettings,
}

impl<S: SessionRepository + ?Sized, T: StudioRepository + ?Sized> AgentService<S, T> {
    pub fn new(
        sessions: Arc<S>,
        studios: Arc<T>,
        llm: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            sessions,
            studios,
            llm,
            tools,
            settings,
        }
    }

    /// Function-calling schemas of every registered tool
    pub fn tool_schemas(&self) -> Vec<FunctionTool> {
        self.tools.function_tools()
    }

    /// Load studio policy and the user's active session
    ///
    /// Fails with `NotFound` for an unknown studio. A new session is
    /// created when the user has none for this studio.
    pub async fn create_context(
        &self,
        studio_id: Uuid,
        user_id: Uuid,
    ) -> Result<AgentContext, DomainError> {
        let studio = self
            .studios
            .load_context(studio_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Studio", studio_id))?;

        let session = match self.sessions.find_latest(studio_id, user_id).await? {
            Some(session) => session,
            None => {
                let session = self
                    .sessions
                    .create(&ChatSession::new(studio_id, user_id))
                    .await?;
                tracing::info!("🆕 Created chat session {} for user {}", session.id, user_id);
                session
            }
        };

        Ok(AgentContext {
            studio,
            user_id,
            session_id: session.id,
            memory: session.memory,
        })
    }

    /// Context creation plus turn, with every failure reported as `AgentFailure`
    pub async fn chat(
        &self,
        studio_id: Uuid,
        user_id: Uuid,
        message: &str,
    ) -> Result<AgentReply, AgentFailure> {
        let ctx = self.create_context(studio_id, user_id).await?;
        self.run_turn(ctx, message).await
    }

    /// Handle one user message in an existing context
    pub async fn run_turn(
        &self,
        ctx: AgentContext,
        message: &str,
    ) -> Result<AgentReply, AgentFailure> {
        tracing::info!(
            "🤖 Agent turn for studio {} session {}",
            ctx.studio_id(),
            ctx.session_id
        );

        self.turn(ctx, message).await.map_err(|e| {
            tracing::error!("Agent execution error: {}", e);
            AgentFailure::from(e)
        })
    }

    /// Stored messages of a session, oldest first
    pub async fn history(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>, DomainError> {
        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(DomainError::not_found("ChatSession", session_id));
        }
        self.sessions.recent_messages(session_id, limit).await
    }

    async fn turn(&self, mut ctx: AgentContext, message: &str) -> Result<AgentReply, DomainError> {
        let history = self
            .sessions
            .recent_messages(ctx.session_id, self.settings.history_limit)
            .await?;
        ctx.memory.annotate_interaction(history.len());

        if let Some(reply) = self.try_search_shortcut(&mut ctx, message).await? {
            return Ok(reply);
        }

        let system_prompt = render_system_prompt(&ctx.studio, &ctx.memory);
        let tools = self.tools.function_tools();
        tracing::debug!("🔧 Using {} tools for agent execution", tools.len());
        if tools.len() > self.settings.tool_warn_threshold {
            tracing::warn!(
                "⚠️ High tool count ({}) may cause token limit issues",
                tools.len()
            );
        }

        let window_start = history.len().saturating_sub(self.settings.prompt_window);
        let mut messages = Vec::with_capacity(self.settings.prompt_window + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(history[window_start..].iter().filter_map(to_chat_message));
        messages.push(ChatMessage::user(message));

        self.sessions
            .append_message(&ConversationMessage::user(ctx.session_id, message))
            .await?;

        let completion = self
            .llm
            .complete(&messages, &tools, &self.settings.completion)
            .await?;

        let mut tools_used = Vec::new();
        let response = if completion.has_tool_calls() {
            let mut outcomes = Vec::with_capacity(completion.tool_calls.len());
            for call in &completion.tool_calls {
                let outcome = execute_tool_call(&self.tools, call, &mut ctx).await;
                if outcome.executed {
                    tools_used.push(outcome.name.clone());
                }
                outcomes.push(outcome);
            }

            let errors = surface_tool_errors(&outcomes);
            if let Some(errors) = &errors {
                tracing::error!("❌ Tool execution errors detected: {}", errors);
            }

            messages.push(ChatMessage::assistant_tool_calls(
                completion.content.clone(),
                completion.tool_calls.clone(),
            ));
            messages.extend(outcomes.iter().map(|o| o.to_message()));

            let followup = self
                .llm
                .complete(&messages, &tools, &self.settings.completion)
                .await?;

            match followup.content {
                Some(content) if !is_apology(&content) => content,
                _ => match errors {
                    Some(errors) => format!(
                        "Error details: {errors}. Please check the requirements and try again."
                    ),
                    None => NO_DETAIL_FALLBACK.to_string(),
                },
            }
        } else {
            completion
                .content
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string())
        };

        self.sessions
            .append_message(&ConversationMessage::assistant(ctx.session_id, &response))
            .await?;
        ctx.memory
            .record_action(tools_used.last().map(String::as_str));
        self.sessions
            .update_memory(ctx.session_id, &ctx.memory)
            .await?;

        tracing::info!(
            "✅ Agent turn complete (session {}, {} tool(s))",
            ctx.session_id,
            tools_used.len()
        );

        Ok(AgentReply {
            session_id: ctx.session_id,
            response,
            tools_used,
            shortcut: false,
        })
    }

    /// Answer lookups directly with `global_search`
    ///
    /// `Ok(None)` means the message is not a lookup (or no search tool is
    /// registered) and the regular LLM path should run.
    async fn try_search_shortcut(
        &self,
        ctx: &mut AgentContext,
        message: &str,
    ) -> Result<Option<AgentReply>, DomainError> {
        if !is_search_request(message) {
            return Ok(None);
        }
        let Some(term) = clean_query(message) else {
            return Ok(None);
        };
        let Some(tool) = self.tools.get(global_search::NAME) else {
            return Ok(None);
        };

        tracing::info!("🔍 Detected search request, searching for '{}'", term);
        let result = match tool.call(json!({ "term": term }), ctx).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("❌ Shortcut search failed: {}", e);
                return Ok(Some(AgentReply {
                    session_id: ctx.session_id,
                    response: format!("❌ Search failed: {e}"),
                    tools_used: vec![],
                    shortcut: true,
                }));
            }
        };

        let summary = summarize_leads(&result, &term);

        self.sessions
            .append_message(&ConversationMessage::user(ctx.session_id, message))
            .await?;
        self.sessions
            .append_message(&ConversationMessage::assistant(ctx.session_id, &summary))
            .await?;
        ctx.memory.record_action(Some(global_search::NAME));
        self.sessions
            .update_memory(ctx.session_id, &ctx.memory)
            .await?;

        Ok(Some(AgentReply {
            session_id: ctx.session_id,
            response: summary,
            tools_used: vec![global_search::NAME.to_string()],
            shortcut: true,
        }))
    }
}

fn to_chat_message(message: &ConversationMessage) -> Option<ChatMessage> {
    match message.role {
        MessageRole::User => Some(ChatMessage::user(&message.content)),
        MessageRole::Assistant => Some(ChatMessage::assistant(&message.content)),
        MessageRole::System => Some(ChatMessage::system(&message.content)),
        // Stored tool output has no call id to answer
        MessageRole::Tool => None,
    }
}

fn is_apology(content: &str) -> bool {
    content.trim().is_empty()
        || content.contains("I apologize")
        || content.contains("I couldn't complete")
}

fn summarize_leads(result: &Value, term: &str) -> String {
    let leads = result["leads"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    if leads.is_empty() {
        return format!("✅ Found 0 leads for \"{term}\"");
    }

    let mut summary = format!("✅ Found {} leads:\n", leads.len());
    for lead in leads {
        let name = lead["name"].as_str().unwrap_or("Unnamed");
        let email = lead["email"].as_str().unwrap_or("no email");
        summary.push_str(&format!("• {name} ({email})\n"));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{studio, FixedStudios, InMemorySessions, ScriptedLlm, StaticSearch};
    use crate::tools::builtin_registry;
    use aperture::{Authority, StudioContext, ToolCall};

    struct Harness {
        service: AgentService<InMemorySessions, FixedStudios>,
        sessions: Arc<InMemorySessions>,
        llm: Arc<ScriptedLlm>,
        studio: StudioContext,
        user_id: Uuid,
    }

    fn harness_with(
        authorities: Vec<Authority>,
        search: StaticSearch,
        sessions: InMemorySessions,
        script: Vec<Result<aperture::CompletionResponse, DomainError>>,
    ) -> Harness {
        let studio = studio(authorities);
        let sessions = Arc::new(sessions);
        let llm = Arc::new(ScriptedLlm::new(script));
        let service = AgentService::new(
            sessions.clone(),
            Arc::new(FixedStudios::with(studio.clone())),
            llm.clone(),
            Arc::new(builtin_registry(Arc::new(search), 10)),
            AgentSettings::default(),
        );
        Harness {
            service,
            sessions,
            llm,
            studio,
            user_id: Uuid::new_v4(),
        }
    }

    fn harness(script: Vec<Result<aperture::CompletionResponse, DomainError>>) -> Harness {
        harness_with(
            vec![Authority::ReadCrm],
            StaticSearch::with_lead("Maria Lopez", "maria@example.com"),
            InMemorySessions::default(),
            script,
        )
    }

    impl Harness {
        async fn chat(&self, message: &str) -> Result<AgentReply, AgentFailure> {
            self.service
                .chat(self.studio.studio_id, self.user_id, message)
                .await
        }
    }

    #[tokio::test]
    async fn test_search_shortcut_skips_llm() {
        let h = harness(vec![]);

        let reply = h.chat("Find Maria").await.unwrap();

        assert!(reply.shortcut);
        assert_eq!(reply.response, "✅ Found 1 leads:\n• Maria Lopez (maria@example.com)\n");
        assert_eq!(reply.tools_used, vec!["global_search"]);
        assert_eq!(h.llm.request_count(), 0);

        assert_eq!(
            h.sessions.contents(reply.session_id),
            vec![
                ("user".to_string(), "Find Maria".to_string()),
                ("assistant".to_string(), reply.response.clone()),
            ]
        );
        let memory = h.sessions.memory_of(reply.session_id).unwrap();
        assert_eq!(memory.last_action.as_deref(), Some("global_search"));
        assert!(memory.last_interaction.is_some());
    }

    #[tokio::test]
    async fn test_search_shortcut_with_no_matches() {
        let h = harness_with(
            vec![Authority::ReadCrm],
            StaticSearch::default(),
            InMemorySessions::default(),
            vec![],
        );

        let reply = h.chat("search for Jensen").await.unwrap();

        assert_eq!(reply.response, "✅ Found 0 leads for \"jensen\"");
    }

    #[tokio::test]
    async fn test_search_shortcut_failure_is_a_reply() {
        let h = harness_with(
            vec![],
            StaticSearch::default(),
            InMemorySessions::default(),
            vec![],
        );

        let reply = h.chat("find Maria").await.unwrap();

        assert!(reply.shortcut);
        assert_eq!(
            reply.response,
            format!(
                "❌ Search failed: Authority READ_CRM not granted for studio {}",
                h.studio.studio_id
            )
        );
        assert!(h.sessions.contents(reply.session_id).is_empty());
    }

    #[tokio::test]
    async fn test_plain_reply_goes_through_llm() {
        let h = harness(vec![ScriptedLlm::text("Your next shoot is Saturday.")]);

        let reply = h.chat("What's on my calendar?").await.unwrap();

        assert!(!reply.shortcut);
        assert_eq!(reply.response, "Your next shoot is Saturday.");
        assert!(reply.tools_used.is_empty());

        let requests = h.llm.requests.lock().unwrap();
        let (messages, tool_count) = &requests[0];
        assert_eq!(*tool_count, 2);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0]
            .content
            .as_deref()
            .unwrap()
            .contains("Golden Hour Studio"));
        assert_eq!(messages[1].content.as_deref(), Some("What's on my calendar?"));
    }

    #[tokio::test]
    async fn test_empty_completion_falls_back() {
        let h = harness(vec![Ok(Default::default())]);

        let reply = h.chat("Hello there").await.unwrap();

        assert_eq!(reply.response, NO_RESPONSE_FALLBACK);
        let memory = h.sessions.memory_of(reply.session_id).unwrap();
        assert_eq!(memory.last_action, None);
        assert!(memory.last_interaction.is_some());
    }

    #[tokio::test]
    async fn test_tool_round_sends_results_back() {
        let h = harness(vec![
            ScriptedLlm::calls(vec![ToolCall::new(
                "call_1",
                "update_memory",
                r#"{"current_goal":"book the Lopez engagement"}"#,
            )]),
            ScriptedLlm::text("Noted, working on the Lopez engagement."),
        ]);

        let reply = h.chat("Let's book the Lopez engagement").await.unwrap();

        assert_eq!(reply.response, "Noted, working on the Lopez engagement.");
        assert_eq!(reply.tools_used, vec!["update_memory"]);

        let requests = h.llm.requests.lock().unwrap();
        let (second, _) = &requests[1];
        let n = second.len();
        assert_eq!(second[n - 2].role, MessageRole::Assistant);
        assert!(second[n - 2].tool_calls.is_some());
        assert_eq!(second[n - 1].role, MessageRole::Tool);
        assert_eq!(second[n - 1].tool_call_id.as_deref(), Some("call_1"));

        let memory = h.sessions.memory_of(reply.session_id).unwrap();
        assert_eq!(
            memory.current_goal.as_deref(),
            Some("book the Lopez engagement")
        );
        assert_eq!(memory.last_action.as_deref(), Some("update_memory"));
    }

    #[tokio::test]
    async fn test_apology_is_replaced_with_tool_errors() {
        let h = harness(vec![
            ScriptedLlm::calls(vec![
                ToolCall::new("call_1", "send_invoice", "{}"),
                ToolCall::new("call_2", "global_search", "not json"),
            ]),
            ScriptedLlm::text("I apologize, I couldn't do that."),
        ]);

        let reply = h.chat("Invoice the Lopez wedding").await.unwrap();

        assert!(reply
            .response
            .starts_with("Error details: send_invoice: Tool not found: send_invoice; global_search: Tool global_search failed: invalid arguments"));
        assert!(reply
            .response
            .ends_with(". Please check the requirements and try again."));
        assert!(reply.tools_used.is_empty());
        let memory = h.sessions.memory_of(reply.session_id).unwrap();
        assert_eq!(memory.last_action, None);

        let requests = h.llm.requests.lock().unwrap();
        let (second, _) = &requests[1];
        let payload: Value =
            serde_json::from_str(second.last().unwrap().content.as_deref().unwrap()).unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["tool"], "global_search");
    }

    #[tokio::test]
    async fn test_failing_handler_is_still_last_action() {
        let h = harness_with(
            vec![],
            StaticSearch::default(),
            InMemorySessions::default(),
            vec![
                ScriptedLlm::calls(vec![
                    ToolCall::new("call_1", "update_memory", "{}"),
                    ToolCall::new("call_2", "global_search", r#"{"term":"lopez"}"#),
                    ToolCall::new("call_3", "update_memory", "oops"),
                ]),
                ScriptedLlm::text("I couldn't search the CRM for you."),
            ],
        );

        let reply = h.chat("Who is Lopez?").await.unwrap();

        assert_eq!(reply.tools_used, vec!["update_memory", "global_search"]);
        let memory = h.sessions.memory_of(reply.session_id).unwrap();
        assert_eq!(memory.last_action.as_deref(), Some("global_search"));
    }

    #[tokio::test]
    async fn test_missing_final_content_without_errors() {
        let h = harness(vec![
            ScriptedLlm::calls(vec![ToolCall::new("call_1", "update_memory", "{}")]),
            Ok(Default::default()),
        ]);

        let reply = h.chat("Remember this conversation").await.unwrap();

        assert_eq!(reply.response, NO_DETAIL_FALLBACK);
    }

    #[tokio::test]
    async fn test_llm_failure_is_agent_failure() {
        let h = harness(vec![Err(DomainError::ExternalService(
            "LLM API error (500): upstream".to_string(),
        ))]);

        let err = h.chat("Draft a welcome email").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Agent failed: External service error: LLM API error (500): upstream"
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_agent_failure() {
        let h = harness_with(
            vec![Authority::ReadCrm],
            StaticSearch::default(),
            InMemorySessions::failing_appends(),
            vec![ScriptedLlm::text("unused")],
        );

        let err = h.chat("Hello").await.unwrap_err();

        assert_eq!(err.to_string(), "Agent failed: Repository error: connection reset");
        assert_eq!(h.llm.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_studio_is_not_found() {
        let h = harness(vec![]);

        let err = h
            .service
            .create_context(Uuid::new_v4(), h.user_id)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_session_is_reused_and_prompt_window_applies() {
        let script = (0..8)
            .map(|i| ScriptedLlm::text(&format!("reply {i}")))
            .collect();
        let h = harness(script);

        let mut session_ids = Vec::new();
        for i in 0..8 {
            let reply = h.chat(&format!("note number {i}")).await.unwrap();
            session_ids.push(reply.session_id);
        }
        session_ids.dedup();
        assert_eq!(session_ids.len(), 1);

        let requests = h.llm.requests.lock().unwrap();
        // system + last 10 of 14 stored messages + new user message
        assert_eq!(requests[7].0.len(), 12);
        assert_eq!(requests[7].0[1].content.as_deref(), Some("note number 2"));

        let memory = h.sessions.memory_of(session_ids[0]).unwrap();
        assert!(matches!(
            memory.context,
            Some(aperture::InteractionContext::Returning {
                previous_interactions: 14,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_history_is_oldest_first_and_limited() {
        let h = harness(vec![ScriptedLlm::text("hi"), ScriptedLlm::text("again")]);
        let first = h.chat("hello").await.unwrap();
        h.chat("hello again").await.unwrap();

        let history = h.service.history(first.session_id, 3).await.unwrap();
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hello again", "again"]);

        let missing = h.service.history(Uuid::new_v4(), 3).await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn test_apology_detection() {
        assert!(is_apology(""));
        assert!(is_apology("I apologize for the trouble"));
        assert!(is_apology("Sorry, I couldn't complete the task"));
        assert!(!is_apology("Invoice sent to Maria."));
    }
}
