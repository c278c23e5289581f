//! Quest Pool
//!
//! Holds the quests currently offered to a session and tracks which one
//! is being attempted. At most one quest is active at a time; a completed
//! quest can never become active again.

use super::definition::Quest;

/// The set of quests offered to a session, plus the single active quest.
#[derive(Debug, Clone, Default)]
pub struct QuestPool {
    quests: Vec<Quest>,
    /// Id of the quest currently being attempted
    active_id: Option<String>,
}

impl QuestPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole pool with freshly generated quests.
    ///
    /// Any active quest is cleared; the previous offering is discarded.
    pub fn replace(&mut self, quests: Vec<Quest>) {
        self.quests = quests;
        self.active_id = None;
    }

    /// Make a quest the sole active quest.
    ///
    /// Returns the started quest, or `None` when the id does not resolve
    /// to an existing, non-completed quest (no state changes in that case).
    /// Starting a quest while another is active replaces the active quest.
    pub fn start(&mut self, quest_id: &str) -> Option<&Quest> {
        let quest = self.quests.iter().find(|q| q.id == quest_id && !q.completed)?;
        self.active_id = Some(quest.id.clone());
        Some(quest)
    }

    /// The quest currently being attempted, if any
    pub fn active(&self) -> Option<&Quest> {
        let id = self.active_id.as_deref()?;
        self.quests.iter().find(|q| q.id == id)
    }

    /// Mark the active quest completed and clear the active slot.
    ///
    /// Returns the finished quest, or `None` when nothing is active.
    pub fn finish_active(&mut self) -> Option<Quest> {
        let id = self.active_id.take()?;
        let quest = self.quests.iter_mut().find(|q| q.id == id)?;
        quest.completed = true;
        Some(quest.clone())
    }

    /// True when the pool is non-empty and every quest has been completed
    pub fn all_completed(&self) -> bool {
        !self.quests.is_empty() && self.quests.iter().all(|q| q.completed)
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn get(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::definition::{Difficulty, Quest, QuestSpec};

    fn quest(title: &str) -> Quest {
        Quest::from_spec(QuestSpec {
            title: title.to_string(),
            description: format!("{} description", title),
            reward: "Test Sword".to_string(),
            difficulty: Difficulty::Easy,
        })
    }

    fn pool_of(n: usize) -> QuestPool {
        let mut pool = QuestPool::new();
        pool.replace((0..n).map(|i| quest(&format!("Quest {}", i))).collect());
        pool
    }

    #[test]
    fn test_replace_clears_active() {
        let mut pool = pool_of(3);
        let id = pool.quests()[0].id.clone();
        pool.start(&id);
        assert!(pool.active().is_some());

        pool.replace(vec![quest("Fresh")]);
        assert!(pool.active().is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_start_unknown_id_is_noop() {
        let mut pool = pool_of(2);
        assert!(pool.start("quest-nope").is_none());
        assert!(pool.active().is_none());
    }

    #[test]
    fn test_start_replaces_active() {
        let mut pool = pool_of(2);
        let a = pool.quests()[0].id.clone();
        let b = pool.quests()[1].id.clone();

        pool.start(&a);
        pool.start(&b);

        // Only B is active; A is back to unstarted, not completed
        assert_eq!(pool.active().unwrap().id, b);
        assert!(!pool.get(&a).unwrap().completed);
    }

    #[test]
    fn test_completed_quest_cannot_restart() {
        let mut pool = pool_of(1);
        let id = pool.quests()[0].id.clone();

        pool.start(&id);
        let finished = pool.finish_active().unwrap();
        assert!(finished.completed);
        assert!(pool.active().is_none());

        // No transition leaves the completed state
        assert!(pool.start(&id).is_none());
        assert!(pool.active().is_none());
    }

    #[test]
    fn test_finish_without_active() {
        let mut pool = pool_of(2);
        assert!(pool.finish_active().is_none());
        assert!(pool.quests().iter().all(|q| !q.completed));
    }

    #[test]
    fn test_all_completed() {
        let mut pool = pool_of(2);
        assert!(!pool.all_completed());

        let ids: Vec<String> = pool.quests().iter().map(|q| q.id.clone()).collect();
        for id in &ids {
            pool.start(id);
            pool.finish_active();
        }
        assert!(pool.all_completed());

        // An empty pool is not "all completed"
        assert!(!QuestPool::new().all_completed());
    }
}
