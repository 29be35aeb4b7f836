//! Room management service.
//!
//! Creates rooms seeded from the scenario catalog, manages their agents,
//! takes human input into the transcript, wipes agent memory and exports
//! transcripts. Turn-taking itself lives in
//! [`TurnOrchestrator`](crate::simulation::orchestrator::TurnOrchestrator).

use agora_types::agent::{Agent, CreateAgentRequest};
use agora_types::error::{RepositoryError, RoomError};
use agora_types::id::{AgentId, RoomId};
use agora_types::message::{CreateMessageRequest, Message};
use agora_types::room::{CreateRoomRequest, Room};
use agora_types::scenario::find_scenario;
use tracing::{info, warn};

use crate::export::render_markdown;
use crate::memory::store::MemoryStore;
use crate::repository::agent::AgentRepository;
use crate::repository::message::MessageRepository;
use crate::repository::room::RoomRepository;

/// Service for everything around a room except running turns.
///
/// Generic over the repository and memory ports; agora-core never depends
/// on agora-infra.
pub struct RoomService<R, A, M, S>
where
    R: RoomRepository,
    A: AgentRepository,
    M: MessageRepository,
    S: MemoryStore,
{
    rooms: R,
    agents: A,
    messages: M,
    memory: S,
}

impl<R, A, M, S> RoomService<R, A, M, S>
where
    R: RoomRepository,
    A: AgentRepository,
    M: MessageRepository,
    S: MemoryStore,
{
    pub fn new(rooms: R, agents: A, messages: M, memory: S) -> Self {
        Self {
            rooms,
            agents,
            messages,
            memory,
        }
    }

    /// Create a room and, unless disabled, seed it with the scenario's
    /// personas in catalog order.
    pub async fn create_room(&self, request: CreateRoomRequest) -> Result<(Room, Vec<Agent>), RoomError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(RoomError::InvalidName("room name cannot be empty".to_string()));
        }

        let scenario_key = request.scenario.trim();
        let scenario = find_scenario(scenario_key)
            .ok_or_else(|| RoomError::UnknownScenario(scenario_key.to_string()))?;

        let room = self
            .rooms
            .create(&Room {
                id: RoomId::new(),
                name,
                scenario: scenario.key.to_string(),
                created_at: chrono::Utc::now(),
            })
            .await?;

        let mut seeded = Vec::new();
        if request.seed_agents {
            for persona in scenario.agents {
                let agent = Agent {
                    id: AgentId::new(),
                    room_id: room.id,
                    name: persona.name.to_string(),
                    role: persona.role.to_string(),
                    goal: persona.goal.to_string(),
                };
                seeded.push(self.agents.create(&agent).await?);
            }
        }

        info!(room_id = %room.id, scenario = %room.scenario, agents = seeded.len(), "room created");
        Ok((room, seeded))
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, RoomError> {
        Ok(self.rooms.list().await?)
    }

    pub async fn get_room(&self, room_id: &RoomId) -> Result<Room, RoomError> {
        self.rooms.get_by_id(room_id).await?.ok_or(RoomError::NotFound)
    }

    /// Delete a room with its agents, transcript and agent memories.
    pub async fn delete_room(&self, room_id: &RoomId) -> Result<(), RoomError> {
        let agents = self.list_agents(room_id).await?;
        for agent in &agents {
            self.forget_quietly(&agent.id).await;
        }
        self.rooms.delete(room_id).await.map_err(not_found_as(RoomError::NotFound))?;
        info!(room_id = %room_id, agents = agents.len(), "room deleted");
        Ok(())
    }

    pub async fn add_agent(&self, room_id: &RoomId, request: CreateAgentRequest) -> Result<Agent, RoomError> {
        let room = self.get_room(room_id).await?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(RoomError::InvalidName("agent name cannot be empty".to_string()));
        }

        let agent = self
            .agents
            .create(&Agent {
                id: AgentId::new(),
                room_id: room.id,
                name,
                role: request.role.trim().to_string(),
                goal: request.goal.trim().to_string(),
            })
            .await?;

        info!(room_id = %room.id, agent_id = %agent.id, name = %agent.name, "agent added");
        Ok(agent)
    }

    pub async fn get_agent(&self, agent_id: &AgentId) -> Result<Agent, RoomError> {
        self.agents
            .get_by_id(agent_id)
            .await?
            .ok_or(RoomError::AgentNotFound)
    }

    /// Roster in speaking order.
    pub async fn list_agents(&self, room_id: &RoomId) -> Result<Vec<Agent>, RoomError> {
        self.get_room(room_id).await?;
        Ok(self.agents.list_by_room(room_id).await?)
    }

    /// Remove an agent and its memories. Its past messages keep their
    /// author id, so rotation wraps to the first agent and exports label
    /// them `Former agent`.
    pub async fn remove_agent(&self, agent_id: &AgentId) -> Result<Agent, RoomError> {
        let agent = self.get_agent(agent_id).await?;
        self.forget_quietly(agent_id).await;
        self.agents
            .delete(agent_id)
            .await
            .map_err(not_found_as(RoomError::AgentNotFound))?;
        info!(room_id = %agent.room_id, agent_id = %agent_id, "agent removed");
        Ok(agent)
    }

    pub async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, RoomError> {
        self.get_room(room_id).await?;
        Ok(self.messages.list_by_room(room_id).await?)
    }

    /// Append a human-authored message to the transcript.
    pub async fn post_message(
        &self,
        room_id: &RoomId,
        request: CreateMessageRequest,
    ) -> Result<Message, RoomError> {
        let room = self.get_room(room_id).await?;
        let content = request.content.trim();
        if content.is_empty() {
            return Err(RoomError::EmptyMessage);
        }
        Ok(self
            .messages
            .create(&Message::new(room.id, None, content))
            .await?)
    }

    /// Delete every message in the room. Agent memories are untouched.
    pub async fn clear_transcript(&self, room_id: &RoomId) -> Result<u64, RoomError> {
        self.get_room(room_id).await?;
        let removed = self.messages.delete_by_room(room_id).await?;
        info!(room_id = %room_id, removed, "transcript cleared");
        Ok(removed)
    }

    /// Delete every memory item of one agent.
    pub async fn wipe_agent_memory(&self, agent_id: &AgentId) -> Result<u64, RoomError> {
        self.get_agent(agent_id).await?;
        let removed = self.memory.wipe(agent_id).await?;
        info!(agent_id = %agent_id, removed, "agent memory wiped");
        Ok(removed)
    }

    pub async fn memory_count(&self, agent_id: &AgentId) -> Result<u64, RoomError> {
        self.get_agent(agent_id).await?;
        Ok(self.memory.count(agent_id).await?)
    }

    pub async fn export_markdown(&self, room_id: &RoomId) -> Result<String, RoomError> {
        let room = self.get_room(room_id).await?;
        let agents = self.agents.list_by_room(room_id).await?;
        let transcript = self.messages.list_by_room(room_id).await?;
        Ok(render_markdown(&room, &agents, &transcript))
    }

    async fn forget_quietly(&self, agent_id: &AgentId) {
        if let Err(e) = self.memory.wipe(agent_id).await {
            warn!(agent_id = %agent_id, error = %e, "failed to wipe agent memory");
        }
    }
}

fn not_found_as(not_found: RoomError) -> impl FnOnce(RepositoryError) -> RoomError {
    move |e| match e {
        RepositoryError::NotFound => not_found,
        other => RoomError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMemoryStore, InMemoryRepo};

    fn service(
        repo: &InMemoryRepo,
        memory: &FakeMemoryStore,
    ) -> RoomService<InMemoryRepo, InMemoryRepo, InMemoryRepo, FakeMemoryStore> {
        RoomService::new(repo.clone(), repo.clone(), repo.clone(), memory.clone())
    }

    fn request(name: &str, scenario: &str) -> CreateRoomRequest {
        CreateRoomRequest {
            name: name.to_string(),
            scenario: scenario.to_string(),
            seed_agents: true,
        }
    }

    #[tokio::test]
    async fn test_create_room_seeds_personas_in_order() {
        let repo = InMemoryRepo::new();
        let svc = service(&repo, &FakeMemoryStore::new());

        let (room, agents) = svc.create_room(request("Plan", "startup_planning")).await.unwrap();

        assert_eq!(room.scenario, "startup_planning");
        let names: Vec<_> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ava", "Ben", "Mia"]);
        let listed = svc.list_agents(&room.id).await.unwrap();
        assert_eq!(listed, agents);
    }

    #[tokio::test]
    async fn test_create_room_without_seeding() {
        let repo = InMemoryRepo::new();
        let svc = service(&repo, &FakeMemoryStore::new());
        let mut req = request("Empty debate", "debate");
        req.seed_agents = false;

        let (room, agents) = svc.create_room(req).await.unwrap();
        assert!(agents.is_empty());
        assert!(svc.list_agents(&room.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_room_validation() {
        let repo = InMemoryRepo::new();
        let svc = service(&repo, &FakeMemoryStore::new());

        assert!(matches!(
            svc.create_room(request("   ", "debate")).await,
            Err(RoomError::InvalidName(_))
        ));
        assert!(matches!(
            svc.create_room(request("Room", "karaoke")).await,
            Err(RoomError::UnknownScenario(key)) if key == "karaoke"
        ));
    }

    #[tokio::test]
    async fn test_add_agent_requires_room() {
        let repo = InMemoryRepo::new();
        let svc = service(&repo, &FakeMemoryStore::new());
        let req = CreateAgentRequest {
            name: "Sam".to_string(),
            role: "Moderator".to_string(),
            goal: "Keep order.".to_string(),
        };

        assert!(matches!(
            svc.add_agent(&RoomId::new(), req.clone()).await,
            Err(RoomError::NotFound)
        ));

        let (room, _) = svc.create_room(request("Open", "freeplay")).await.unwrap();
        let agent = svc.add_agent(&room.id, req).await.unwrap();
        assert_eq!(agent.room_id, room.id);
        assert_eq!(svc.get_agent(&agent.id).await.unwrap().name, "Sam");
    }

    #[tokio::test]
    async fn test_post_message_is_agentless_and_trimmed() {
        let repo = InMemoryRepo::new();
        let svc = service(&repo, &FakeMemoryStore::new());
        let (room, _) = svc.create_room(request("Debate", "debate")).await.unwrap();

        let msg = svc
            .post_message(
                &room.id,
                CreateMessageRequest {
                    content: "  TOPIC: Universal basic income ".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(msg.agent_id.is_none());
        assert_eq!(msg.content, "TOPIC: Universal basic income");

        assert!(matches!(
            svc.post_message(&room.id, CreateMessageRequest { content: " ".to_string() })
                .await,
            Err(RoomError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn test_remove_agent_wipes_memory_and_keeps_authorship() {
        let repo = InMemoryRepo::new();
        let memory = FakeMemoryStore::new();
        let svc = service(&repo, &memory);
        let (room, agents) = svc.create_room(request("Debate", "debate")).await.unwrap();
        memory.remember(agents[0].id, "I said UBI works");
        repo.push_message(Message::new(room.id, Some(agents[0].id), "UBI works"));

        svc.remove_agent(&agents[0].id).await.unwrap();

        assert!(memory.items(&agents[0].id).is_empty());
        let remaining = svc.list_agents(&room.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            svc.list_messages(&room.id).await.unwrap()[0].agent_id,
            Some(agents[0].id)
        );
        assert!(matches!(
            svc.remove_agent(&agents[0].id).await,
            Err(RoomError::AgentNotFound)
        ));
    }

    #[tokio::test]
    async fn test_clear_transcript_keeps_memories() {
        let repo = InMemoryRepo::new();
        let memory = FakeMemoryStore::new();
        let svc = service(&repo, &memory);
        let (room, agents) = svc.create_room(request("Story", "story_writing")).await.unwrap();
        memory.remember(agents[0].id, "a lighthouse keeper");
        repo.push_message(Message::new(room.id, Some(agents[0].id), "a lighthouse keeper"));
        repo.push_message(Message::new(room.id, None, "more please"));

        assert_eq!(svc.clear_transcript(&room.id).await.unwrap(), 2);
        assert!(svc.list_messages(&room.id).await.unwrap().is_empty());
        assert_eq!(svc.memory_count(&agents[0].id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_wipe_agent_memory() {
        let repo = InMemoryRepo::new();
        let memory = FakeMemoryStore::new();
        let svc = service(&repo, &memory);
        let (_, agents) = svc.create_room(request("Debate", "debate")).await.unwrap();
        memory.remember(agents[1].id, "one");
        memory.remember(agents[1].id, "two");

        assert_eq!(svc.wipe_agent_memory(&agents[1].id).await.unwrap(), 2);
        assert_eq!(svc.memory_count(&agents[1].id).await.unwrap(), 0);
        assert!(matches!(
            svc.wipe_agent_memory(&AgentId::new()).await,
            Err(RoomError::AgentNotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_room() {
        let repo = InMemoryRepo::new();
        let memory = FakeMemoryStore::new();
        let svc = service(&repo, &memory);
        let (room, agents) = svc.create_room(request("Debate", "debate")).await.unwrap();
        memory.remember(agents[0].id, "remember me");

        svc.delete_room(&room.id).await.unwrap();

        assert!(matches!(svc.get_room(&room.id).await, Err(RoomError::NotFound)));
        assert!(memory.items(&agents[0].id).is_empty());
        assert!(matches!(svc.delete_room(&room.id).await, Err(RoomError::NotFound)));
    }

    #[tokio::test]
    async fn test_export_markdown() {
        let repo = InMemoryRepo::new();
        let svc = service(&repo, &FakeMemoryStore::new());
        let (room, agents) = svc.create_room(request("UBI", "debate")).await.unwrap();
        repo.push_message(Message::new(room.id, Some(agents[1].id), "It is too costly."));

        let md = svc.export_markdown(&room.id).await.unwrap();
        assert!(md.starts_with("# UBI"));
        assert!(md.contains("**Blake**"));
        assert!(md.contains("It is too costly."));
    }

    #[tokio::test]
    async fn test_export_labels_removed_agent() {
        let repo = InMemoryRepo::new();
        let svc = service(&repo, &FakeMemoryStore::new());
        let (room, agents) = svc.create_room(request("UBI", "debate")).await.unwrap();
        repo.push_message(Message::new(room.id, Some(agents[1].id), "It is too costly."));

        svc.remove_agent(&agents[1].id).await.unwrap();

        let md = svc.export_markdown(&room.id).await.unwrap();
        assert!(md.contains("**Former agent**"));
        assert!(!md.contains("**Blake**"));
        assert!(md.contains("It is too costly."));
    }
}
