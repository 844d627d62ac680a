//! Achievement definitions and the unlock evaluation pass.
//!
//! The registry is an injected slice rather than global state so tests can
//! substitute a minimal one. Only unlock EVENTS are persisted (on the user);
//! the definitions themselves live in code.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::progression::{SessionOutcome, UserProgress};

/// A static achievement definition: identity, display copy, point value,
/// and the unlock condition evaluated against the post-update user and the
/// just-completed session.
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points: i32,
    pub condition: fn(&UserProgress, &SessionOutcome) -> bool,
}

/// The built-in registry, in display order.
pub const REGISTRY: &[AchievementDef] = &[
    AchievementDef {
        id: "first_session",
        title: "First Steps",
        description: "Complete your first practice session",
        points: 10,
        condition: |user, _session| user.total_sessions == 1,
    },
    AchievementDef {
        id: "consistency",
        title: "Consistent Learner",
        description: "Practice for 3 consecutive days",
        points: 25,
        condition: |user, _session| user.streak >= 3,
    },
    AchievementDef {
        id: "confidence_boost",
        title: "Confidence Builder",
        description: "Reach 50% confidence score",
        points: 50,
        condition: |user, _session| user.confidence_score >= 50,
    },
    AchievementDef {
        id: "level_master",
        title: "Level Master",
        description: "Complete all sessions in one level",
        points: 100,
        condition: |user, _session| user.levels.any_complete(),
    },
];

/// Result of one evaluation pass.
pub struct UnlockOutcome<'a> {
    /// Definitions whose conditions newly hold, in registry order.
    pub unlocked: Vec<&'a AchievementDef>,
    /// Ids whose condition panicked; evaluation of the rest continued.
    pub failed: Vec<&'static str>,
}

/// Evaluate the registry against a post-progression user snapshot.
///
/// Already-unlocked ids are skipped, so re-running the pass against an
/// unchanged user yields nothing: unlocking is idempotent. A panicking
/// condition is isolated and reported in `failed` without affecting the
/// other definitions.
pub fn check_unlocks<'a>(
    registry: &'a [AchievementDef],
    user: &UserProgress,
    session: &SessionOutcome,
    already_unlocked: &HashSet<String>,
) -> UnlockOutcome<'a> {
    let mut unlocked = Vec::new();
    let mut failed = Vec::new();

    for def in registry {
        if already_unlocked.contains(def.id) {
            continue;
        }
        match catch_unwind(AssertUnwindSafe(|| (def.condition)(user, session))) {
            Ok(true) => unlocked.push(def),
            Ok(false) => {}
            Err(_) => failed.push(def.id),
        }
    }

    UnlockOutcome { unlocked, failed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DifficultyLevel;

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            level: DifficultyLevel::Easy,
            confidence_score: 90,
            duration_secs: 60,
        }
    }

    fn user_after_first_session() -> UserProgress {
        UserProgress {
            total_sessions: 1,
            confidence_score: 90,
            streak: 1,
            max_streak: 1,
            ..UserProgress::default()
        }
    }

    #[test]
    fn first_session_and_confidence_unlock_together() {
        let user = user_after_first_session();
        let result = check_unlocks(REGISTRY, &user, &outcome(), &HashSet::new());
        let ids: Vec<_> = result.unlocked.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["first_session", "confidence_boost"]);
        assert!(result.failed.is_empty());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let user = user_after_first_session();
        let first = check_unlocks(REGISTRY, &user, &outcome(), &HashSet::new());

        let already: HashSet<String> =
            first.unlocked.iter().map(|d| d.id.to_string()).collect();
        let second = check_unlocks(REGISTRY, &user, &outcome(), &already);
        assert!(second.unlocked.is_empty());
    }

    #[test]
    fn consistency_unlocks_at_three_day_streak() {
        let mut user = user_after_first_session();
        user.streak = 2;
        let result = check_unlocks(REGISTRY, &user, &outcome(), &HashSet::new());
        assert!(!result.unlocked.iter().any(|d| d.id == "consistency"));

        user.streak = 3;
        let result = check_unlocks(REGISTRY, &user, &outcome(), &HashSet::new());
        assert!(result.unlocked.iter().any(|d| d.id == "consistency"));
    }

    #[test]
    fn level_master_requires_a_full_bucket() {
        let mut user = user_after_first_session();
        user.levels.easy.progress = 100;
        let result = check_unlocks(REGISTRY, &user, &outcome(), &HashSet::new());
        assert!(result.unlocked.iter().any(|d| d.id == "level_master"));
    }

    #[test]
    fn panicking_condition_does_not_block_the_rest() {
        let registry = [
            AchievementDef {
                id: "broken",
                title: "Broken",
                description: "always panics",
                points: 1,
                condition: |_, _| panic!("boom"),
            },
            AchievementDef {
                id: "fine",
                title: "Fine",
                description: "always unlocks",
                points: 1,
                condition: |_, _| true,
            },
        ];
        let user = user_after_first_session();
        let result = check_unlocks(&registry, &user, &outcome(), &HashSet::new());
        assert_eq!(result.failed, vec!["broken"]);
        assert_eq!(result.unlocked.len(), 1);
        assert_eq!(result.unlocked[0].id, "fine");
    }

    #[test]
    fn registry_ids_are_unique() {
        let mut seen = HashSet::new();
        for def in REGISTRY {
            assert!(seen.insert(def.id), "duplicate achievement id {}", def.id);
        }
    }
}
