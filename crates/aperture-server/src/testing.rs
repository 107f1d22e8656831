//! In-memory fakes for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use aperture::{
    AgentContext, Authority, ChatMessage, ChatSession, CompletionOptions, CompletionResponse,
    ConversationMessage, CrmSearch, DomainError, FunctionTool, LeadSummary, LlmProvider,
    PolicyMode, SearchResults, SessionRepository, StudioContext, StudioPolicy, StudioRepository,
    ToolCall, WorkingMemory,
};

pub fn studio(authorities: Vec<Authority>) -> StudioContext {
    StudioContext {
        studio_id: Uuid::new_v4(),
        studio_name: "Golden Hour Studio".to_string(),
        currency: "USD".to_string(),
        policy: StudioPolicy {
            mode: PolicyMode::Propose,
            authorities,
            approval_required_over_amount: 500.0,
        },
    }
}

pub fn agent_context(authorities: Vec<Authority>) -> AgentContext {
    AgentContext {
        studio: studio(authorities),
        user_id: Uuid::new_v4(),
        session_id: Uuid::new_v4(),
        memory: WorkingMemory::default(),
    }
}

// ---------------------------------------------------------------------------
// CRM search
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StaticSearch {
    results: SearchResults,
    failure: Option<String>,
    last_query: Mutex<Option<(String, usize)>>,
}

impl StaticSearch {
    pub fn with_lead(name: &str, email: &str) -> Self {
        Self {
            results: SearchResults {
                leads: vec![LeadSummary {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    email: Some(email.to_string()),
                    status: Some("new".to_string()),
                }],
                clients: vec![],
            },
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn last_query(&self) -> Option<(String, usize)> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl CrmSearch for StaticSearch {
    async fn global_search(
        &self,
        _studio_id: Uuid,
        term: &str,
        limit: usize,
    ) -> Result<SearchResults, DomainError> {
        *self.last_query.lock().unwrap() = Some((term.to_string(), limit));
        match &self.failure {
            Some(message) => Err(DomainError::Repository(message.clone())),
            None => Ok(self.results.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemorySessions {
    pub sessions: Mutex<Vec<ChatSession>>,
    pub messages: Mutex<Vec<ConversationMessage>>,
    pub fail_appends: bool,
}

impl InMemorySessions {
    pub fn failing_appends() -> Self {
        Self {
            fail_appends: true,
            ..Default::default()
        }
    }

    pub fn memory_of(&self, session_id: Uuid) -> Option<WorkingMemory> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == session_id)
            .map(|s| s.memory.clone())
    }

    pub fn contents(&self, session_id: Uuid) -> Vec<(String, String)> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .map(|m| (m.role.to_string(), m.content.clone()))
            .collect()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessions {
    async fn find_latest(
        &self,
        studio_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ChatSession>, DomainError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.studio_id == studio_id && s.user_id == user_id)
            .max_by_key(|s| s.updated_at)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChatSession>, DomainError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn create(&self, session: &ChatSession) -> Result<ChatSession, DomainError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session.clone())
    }

    async fn update_memory(
        &self,
        session_id: Uuid,
        memory: &WorkingMemory,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| DomainError::not_found("ChatSession", session_id))?;
        session.memory = memory.clone();
        session.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn append_message(&self, message: &ConversationMessage) -> Result<(), DomainError> {
        if self.fail_appends {
            return Err(DomainError::Repository("connection reset".to_string()));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>, DomainError> {
        let all: Vec<_> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }
}

#[derive(Default)]
pub struct FixedStudios {
    studios: HashMap<Uuid, StudioContext>,
}

impl FixedStudios {
    pub fn with(studio: StudioContext) -> Self {
        let mut studios = HashMap::new();
        studios.insert(studio.studio_id, studio);
        Self { studios }
    }
}

#[async_trait]
impl StudioRepository for FixedStudios {
    async fn load_context(&self, studio_id: Uuid) -> Result<Option<StudioContext>, DomainError> {
        Ok(self.studios.get(&studio_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// LLM
// ---------------------------------------------------------------------------

/// Replays queued responses and records every request
#[derive(Default)]
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<CompletionResponse, DomainError>>>,
    pub requests: Mutex<Vec<(Vec<ChatMessage>, usize)>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<Result<CompletionResponse, DomainError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        }
    }

    pub fn text(content: &str) -> Result<CompletionResponse, DomainError> {
        Ok(CompletionResponse {
            content: Some(content.to_string()),
            ..Default::default()
        })
    }

    pub fn calls(tool_calls: Vec<ToolCall>) -> Result<CompletionResponse, DomainError> {
        Ok(CompletionResponse {
            tool_calls,
            ..Default::default()
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[FunctionTool],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), tools.len()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::ExternalService("script exhausted".to_string())))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-1"
    }
}
