//! Player Progression
//!
//! Cumulative stats derived from quest-completion events. Counters only
//! ever increase; there is no decrement operation.

use serde::Serialize;

use crate::quest::Difficulty;

/// Milestone reached by a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdNotice {
    /// Fifth quest completed this session
    FifthQuest,
    /// Third dragon slain this session
    ThirdDragon,
}

impl ThresholdNotice {
    /// User-visible notification text
    pub fn message(&self) -> &'static str {
        match self {
            ThresholdNotice::FifthQuest => {
                "You've completed 5 quests! A special sword has appeared!"
            }
            ThresholdNotice::ThirdDragon => {
                "You've slain 3 dragons! Your reputation is growing in the realm!"
            }
        }
    }
}

/// Cumulative session stats for one player
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub level: u32,
    pub experience: u64,
    pub quests_completed: u64,
    pub dragons_slain: u64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            quests_completed: 0,
            dragons_slain: 0,
        }
    }
}

impl PlayerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful quest completion.
    ///
    /// A quest counts as a dragon slaying when its free-text description
    /// contains "dragon", case-insensitively. Deliberately a substring
    /// match on content, not a structured tag.
    ///
    /// Milestone checks compare for equality, not `>=`: each fires exactly
    /// once because completions increment the counters by exactly 1.
    pub fn record_completion(
        &mut self,
        difficulty: Difficulty,
        description: &str,
    ) -> Vec<ThresholdNotice> {
        self.experience += difficulty.experience();
        self.quests_completed += 1;
        if description.to_lowercase().contains("dragon") {
            self.dragons_slain += 1;
        }

        let mut notices = Vec::new();
        if self.quests_completed == 5 {
            notices.push(ThresholdNotice::FifthQuest);
        }
        if self.dragons_slain == 3 {
            notices.push(ThresholdNotice::ThirdDragon);
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_by_difficulty() {
        let mut stats = PlayerStats::new();
        stats.record_completion(Difficulty::Easy, "A simple errand.");
        assert_eq!(stats.experience, 10);
        stats.record_completion(Difficulty::Medium, "A trickier errand.");
        assert_eq!(stats.experience, 30);
        stats.record_completion(Difficulty::Hard, "A grim errand.");
        assert_eq!(stats.experience, 60);
        assert_eq!(stats.quests_completed, 3);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_dragon_detection_is_case_insensitive() {
        let mut stats = PlayerStats::new();
        stats.record_completion(Difficulty::Hard, "Sneak past the sleeping Dragon.");
        assert_eq!(stats.dragons_slain, 1);
        assert_eq!(stats.experience, 30);

        stats.record_completion(Difficulty::Easy, "Fetch water from the well.");
        assert_eq!(stats.dragons_slain, 1);

        stats.record_completion(Difficulty::Easy, "Polish the DRAGONBONE gate.");
        assert_eq!(stats.dragons_slain, 2);
    }

    #[test]
    fn test_fifth_quest_notice_fires_once() {
        // Relies on the fixed +1 per completion: the counter passes through
        // every value, so the equality check cannot be skipped over.
        let mut stats = PlayerStats::new();
        let mut fired = 0;
        for _ in 0..8 {
            let notices = stats.record_completion(Difficulty::Easy, "An errand.");
            fired += notices
                .iter()
                .filter(|n| **n == ThresholdNotice::FifthQuest)
                .count();
        }
        assert_eq!(fired, 1);
        assert_eq!(stats.quests_completed, 8);
    }

    #[test]
    fn test_third_dragon_notice() {
        let mut stats = PlayerStats::new();
        assert!(stats
            .record_completion(Difficulty::Hard, "dragon hunt")
            .is_empty());
        assert!(stats
            .record_completion(Difficulty::Hard, "dragon hunt")
            .is_empty());
        let notices = stats.record_completion(Difficulty::Hard, "dragon hunt");
        assert_eq!(notices, vec![ThresholdNotice::ThirdDragon]);

        // Fourth dragon: nothing fires
        assert!(stats
            .record_completion(Difficulty::Hard, "dragon hunt")
            .is_empty());
    }

    #[test]
    fn test_both_notices_in_one_completion() {
        let mut stats = PlayerStats::new();
        stats.record_completion(Difficulty::Easy, "dragon errand");
        stats.record_completion(Difficulty::Easy, "dragon errand");
        stats.record_completion(Difficulty::Easy, "plain errand");
        stats.record_completion(Difficulty::Easy, "plain errand");
        let notices = stats.record_completion(Difficulty::Easy, "dragon errand");
        assert_eq!(
            notices,
            vec![ThresholdNotice::FifthQuest, ThresholdNotice::ThirdDragon]
        );
    }
}
