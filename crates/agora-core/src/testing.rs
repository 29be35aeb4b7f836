//! Hand-written fakes for the core ports, shared by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use agora_types::agent::Agent;
use agora_types::error::{MemoryError, RepositoryError};
use agora_types::id::{AgentId, RoomId};
use agora_types::llm::{GenerationOptions, LlmError};
use agora_types::message::Message;
use agora_types::room::Room;
use chrono::Utc;

use crate::llm::client::GenerationClient;
use crate::memory::store::MemoryStore;
use crate::repository::agent::AgentRepository;
use crate::repository::message::MessageRepository;
use crate::repository::room::RoomRepository;

#[derive(Default)]
struct Tables {
    rooms: Vec<Room>,
    agents: Vec<Agent>,
    messages: Vec<Message>,
}

/// In-memory store implementing all three repository ports. Clones share
/// the same tables.
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a room with the given scenario and personas, returning both.
    pub fn seed_room(&self, scenario: &str, personas: &[(&str, &str)]) -> (Room, Vec<Agent>) {
        let room = Room {
            id: RoomId::new(),
            name: format!("{scenario} room"),
            scenario: scenario.to_string(),
            created_at: Utc::now(),
        };
        let agents: Vec<Agent> = personas
            .iter()
            .map(|(name, role)| Agent {
                id: AgentId::new(),
                room_id: room.id,
                name: name.to_string(),
                role: role.to_string(),
                goal: format!("Speak as {name}."),
            })
            .collect();

        let mut tables = self.tables.lock().unwrap();
        tables.rooms.push(room.clone());
        tables.agents.extend(agents.iter().cloned());
        (room, agents)
    }

    pub fn push_message(&self, message: Message) {
        self.tables.lock().unwrap().messages.push(message);
    }

    pub fn messages(&self, room_id: &RoomId) -> Vec<Message> {
        self.tables
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.room_id == *room_id)
            .cloned()
            .collect()
    }
}

impl RoomRepository for InMemoryRepo {
    async fn create(&self, room: &Room) -> Result<Room, RepositoryError> {
        self.tables.lock().unwrap().rooms.push(room.clone());
        Ok(room.clone())
    }

    async fn get_by_id(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .rooms
            .iter()
            .find(|r| r.id == *id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Room>, RepositoryError> {
        let mut rooms = self.tables.lock().unwrap().rooms.clone();
        rooms.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rooms)
    }

    async fn delete(&self, id: &RoomId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.rooms.len();
        tables.rooms.retain(|r| r.id != *id);
        if tables.rooms.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.agents.retain(|a| a.room_id != *id);
        tables.messages.retain(|m| m.room_id != *id);
        Ok(())
    }
}

impl AgentRepository for InMemoryRepo {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        self.tables.lock().unwrap().agents.push(agent.clone());
        Ok(agent.clone())
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .agents
            .iter()
            .find(|a| a.id == *id)
            .cloned())
    }

    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<Agent>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .agents
            .iter()
            .filter(|a| a.room_id == *room_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.agents.len();
        tables.agents.retain(|a| a.id != *id);
        if tables.agents.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl MessageRepository for InMemoryRepo {
    async fn create(&self, message: &Message) -> Result<Message, RepositoryError> {
        self.tables.lock().unwrap().messages.push(message.clone());
        Ok(message.clone())
    }

    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<Message>, RepositoryError> {
        Ok(self.messages(room_id))
    }

    async fn delete_by_room(&self, room_id: &RoomId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.messages.len();
        tables.messages.retain(|m| m.room_id != *room_id);
        Ok((before - tables.messages.len()) as u64)
    }
}

/// Memory store fake: keeps added texts per agent, recalls the newest
/// `top_k`, and can be told to fail either direction.
#[derive(Clone, Default)]
pub struct FakeMemoryStore {
    items: Arc<Mutex<HashMap<AgentId, Vec<String>>>>,
    queries: Arc<Mutex<Vec<(AgentId, String)>>>,
    fail_recall: bool,
    fail_add: bool,
}

impl FakeMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_recall() -> Self {
        Self {
            fail_recall: true,
            ..Self::default()
        }
    }

    pub fn failing_add() -> Self {
        Self {
            fail_add: true,
            ..Self::default()
        }
    }

    pub fn remember(&self, agent_id: AgentId, text: &str) {
        self.items
            .lock()
            .unwrap()
            .entry(agent_id)
            .or_default()
            .push(text.to_string());
    }

    pub fn items(&self, agent_id: &AgentId) -> Vec<String> {
        self.items
            .lock()
            .unwrap()
            .get(agent_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn queries(&self) -> Vec<(AgentId, String)> {
        self.queries.lock().unwrap().clone()
    }
}

impl MemoryStore for FakeMemoryStore {
    async fn recall(
        &self,
        agent_id: &AgentId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>, MemoryError> {
        self.queries
            .lock()
            .unwrap()
            .push((*agent_id, query.to_string()));
        if self.fail_recall {
            return Err(MemoryError::Storage("store unreachable".to_string()));
        }
        Ok(self
            .items(agent_id)
            .into_iter()
            .rev()
            .take(top_k)
            .collect())
    }

    async fn add(&self, agent_id: &AgentId, text: &str) -> Result<(), MemoryError> {
        if self.fail_add {
            return Err(MemoryError::Embedding("embedder offline".to_string()));
        }
        self.remember(*agent_id, text);
        Ok(())
    }

    async fn wipe(&self, agent_id: &AgentId) -> Result<u64, MemoryError> {
        let removed = self.items.lock().unwrap().remove(agent_id);
        Ok(removed.map(|v| v.len() as u64).unwrap_or(0))
    }

    async fn count(&self, agent_id: &AgentId) -> Result<u64, MemoryError> {
        Ok(self.items(agent_id).len() as u64)
    }
}

/// A recorded `generate` call.
#[derive(Debug, Clone)]
pub struct GenerateCall {
    pub system: String,
    pub prompt: String,
    pub options: Option<GenerationOptions>,
}

/// Generation fake returning scripted replies in order, then repeating the
/// last one. An empty script makes every call fail.
#[derive(Clone)]
pub struct ScriptedGenerator {
    replies: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<GenerateCall>>>,
}

impl ScriptedGenerator {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.iter().map(|r| r.to_string()).collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self::new(&[])
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl GenerationClient for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(GenerateCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            options: options.copied(),
        });
        let mut replies = self.replies.lock().unwrap();
        match replies.len() {
            0 => Err(LlmError::Provider {
                message: "connection refused".to_string(),
            }),
            1 => Ok(replies[0].clone()),
            _ => Ok(replies.remove(0)),
        }
    }
}
