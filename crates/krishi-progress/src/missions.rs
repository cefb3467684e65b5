//! The mission tracker.
//!
//! Missions are checklist-style side quests. Their requirement lists are
//! display text only: the player reports completion, and the tracker's job
//! is to make sure each reward is granted exactly once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use krishi_types::{Difficulty, Mission, MissionId};

use crate::error::ProgressError;

/// Reward granted by a successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionCompletion {
    /// The completed mission.
    pub mission_id: MissionId,
    /// Its title, for notifications.
    pub title: String,
    /// Coins to credit.
    pub reward: u64,
}

/// All missions of a farm, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionTracker {
    missions: Vec<Mission>,
}

impl MissionTracker {
    /// Wrap an explicit mission list.
    pub const fn new(missions: Vec<Mission>) -> Self {
        Self { missions }
    }

    /// The three missions every farm starts with, with deadlines counted
    /// from `now`.
    pub fn builtin(now: DateTime<Utc>) -> Self {
        Self::new(vec![
            Mission {
                id: MissionId::from("crop-rotation"),
                title: "Practice Crop Rotation".to_owned(),
                description: "Plant different types of crops in rotation to improve soil health"
                    .to_owned(),
                requirements: vec![
                    "Plant 2 different crop types".to_owned(),
                    "Use organic fertilizer".to_owned(),
                ],
                reward: 250,
                completed: false,
                difficulty: Difficulty::Medium,
                deadline: days_after(now, 7),
                requires_photo_proof: false,
                photo_submitted: false,
            },
            Mission {
                id: MissionId::from("organic-farming"),
                title: "Go Completely Organic".to_owned(),
                description: "Farm without any chemical fertilizers for one complete cycle"
                    .to_owned(),
                requirements: vec![
                    "Use only organic fertilizers".to_owned(),
                    "Complete harvest cycle".to_owned(),
                ],
                reward: 500,
                completed: false,
                difficulty: Difficulty::Hard,
                deadline: days_after(now, 14),
                requires_photo_proof: true,
                photo_submitted: false,
            },
            Mission {
                id: MissionId::from("water-conservation"),
                title: "Water Conservation Master".to_owned(),
                description: "Use drip irrigation and mulching to save water".to_owned(),
                requirements: vec![
                    "Install drip irrigation".to_owned(),
                    "Apply mulching".to_owned(),
                ],
                reward: 300,
                completed: false,
                difficulty: Difficulty::Medium,
                deadline: days_after(now, 10),
                requires_photo_proof: true,
                photo_submitted: false,
            },
        ])
    }

    /// All missions.
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    /// Look up one mission.
    pub fn get(&self, id: &MissionId) -> Result<&Mission, ProgressError> {
        self.missions
            .iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| ProgressError::UnknownMission(id.clone()))
    }

    fn get_mut(&mut self, id: &MissionId) -> Result<&mut Mission, ProgressError> {
        self.missions
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| ProgressError::UnknownMission(id.clone()))
    }

    /// The mission the dashboard highlights: the first incomplete one.
    pub fn active_mission(&self) -> Option<&Mission> {
        self.missions.iter().find(|m| !m.completed)
    }

    /// Mark a mission completed and return its reward.
    ///
    /// Fails if the mission is unknown, already completed, or still waiting
    /// for its photo proof.
    pub fn complete(&mut self, id: &MissionId) -> Result<MissionCompletion, ProgressError> {
        let mission = self.get_mut(id)?;
        if mission.completed {
            return Err(ProgressError::MissionAlreadyCompleted(id.clone()));
        }
        if mission.requires_photo_proof && !mission.photo_submitted {
            return Err(ProgressError::PhotoProofRequired(id.clone()));
        }

        mission.completed = true;
        info!(mission = %id, reward = mission.reward, "mission completed");

        Ok(MissionCompletion {
            mission_id: id.clone(),
            title: mission.title.clone(),
            reward: mission.reward,
        })
    }

    /// Record photo proof for a mission that takes one.
    ///
    /// Returns `bonus` the first time; later submissions are rejected.
    pub fn submit_photo_proof(&mut self, id: &MissionId, bonus: u64) -> Result<u64, ProgressError> {
        let mission = self.get_mut(id)?;
        if !mission.requires_photo_proof {
            return Err(ProgressError::PhotoNotRequired(id.clone()));
        }
        if mission.completed {
            return Err(ProgressError::MissionAlreadyCompleted(id.clone()));
        }
        if mission.photo_submitted {
            return Err(ProgressError::PhotoAlreadySubmitted(id.clone()));
        }

        mission.photo_submitted = true;
        info!(mission = %id, bonus, "photo proof accepted");
        Ok(bonus)
    }
}

fn days_after(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(days)).unwrap_or(now)
}

/// Whether an incomplete mission has passed its deadline. Informational
/// only; overdue missions can still be completed.
pub fn is_overdue(mission: &Mission, now: DateTime<Utc>) -> bool {
    !mission.completed && now > mission.deadline
}
