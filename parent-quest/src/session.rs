use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::models::Turn;

/// Append-only log of turns for one chat session.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Starts with a single assistant turn when a greeting is given.
    pub fn new(greeting: Option<&str>) -> Self {
        let turns = greeting.map(Turn::assistant).into_iter().collect();
        Self { turns }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

pub type SharedConversation = Arc<Mutex<Conversation>>;

#[derive(Default)]
struct Sessions {
    by_id: HashMap<Uuid, SharedConversation>,
    // Creation order, oldest first.
    order: VecDeque<Uuid>,
}

/// In-memory sessions, bounded to `max_sessions`. Creating a session past
/// the bound drops the oldest one.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<Sessions>>,
    greeting: Option<String>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(greeting: Option<String>, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(Sessions::default())),
            greeting,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn create(&self) -> (Uuid, SharedConversation) {
        let id = Uuid::new_v4();
        let conversation = Arc::new(Mutex::new(Conversation::new(self.greeting.as_deref())));

        let mut sessions = self.sessions.write().await;
        while sessions.order.len() >= self.max_sessions {
            if let Some(oldest) = sessions.order.pop_front() {
                sessions.by_id.remove(&oldest);
                info!("Evicted session {}", oldest);
            }
        }
        sessions.by_id.insert(id, conversation.clone());
        sessions.order.push_back(id);

        (id, conversation)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedConversation> {
        self.sessions.read().await.by_id.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn greeting_seeds_one_assistant_turn() {
        let convo = Conversation::new(Some("How can I help you?"));
        assert_eq!(convo.turns().len(), 1);
        assert_eq!(convo.turns()[0].role, Role::Assistant);
        assert_eq!(convo.turns()[0].content, "How can I help you?");

        assert!(Conversation::new(None).turns().is_empty());
    }

    #[test]
    fn turns_keep_insertion_order() {
        let mut convo = Conversation::new(None);
        convo.push(Turn::user("q1"));
        convo.push(Turn::assistant("a1"));
        convo.push(Turn::user("q2"));

        let contents: Vec<&str> = convo.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2"]);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = SessionStore::new(None, 16);
        let (a, convo_a) = store.create().await;
        let (b, _) = store.create().await;
        assert_ne!(a, b);

        convo_a.lock().await.push(Turn::user("only in a"));

        let b_convo = store.get(&b).await.unwrap();
        assert!(b_convo.lock().await.turns().is_empty());
        assert_eq!(store.get(&a).await.unwrap().lock().await.turns().len(), 1);
        assert!(store.get(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn oldest_session_is_dropped_at_capacity() {
        let store = SessionStore::new(None, 2);
        let (first, _) = store.create().await;
        let (second, _) = store.create().await;
        let (third, _) = store.create().await;

        assert!(store.get(&first).await.is_none());
        assert!(store.get(&second).await.is_some());
        assert!(store.get(&third).await.is_some());
    }
}
