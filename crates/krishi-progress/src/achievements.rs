//! The achievement evaluator.
//!
//! Each achievement carries a threshold over [`FarmStats`]. Evaluation
//! unlocks every locked achievement whose threshold is met and reports the
//! rewards to credit. Unlocking is irreversible, so repeated evaluation
//! over the same stats grants nothing new.

use serde::{Deserialize, Serialize};
use tracing::info;

use krishi_types::{Achievement, AchievementCondition, AchievementId, FarmStats};

/// Coins granted by each built-in achievement.
pub const DEFAULT_ACHIEVEMENT_REWARD: u64 = 100;

/// An achievement that unlocked during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unlocked {
    /// Achievement key.
    pub achievement_id: AchievementId,
    /// Display name.
    pub name: String,
    /// Coins to credit.
    pub reward: u64,
}

/// Whether `stats` satisfies `condition`.
pub const fn condition_met(condition: AchievementCondition, stats: &FarmStats) -> bool {
    match condition {
        AchievementCondition::CropsGrown(n) => stats.crops_grown >= n,
        AchievementCondition::PlantsWatered(n) => stats.plants_watered >= n,
        AchievementCondition::SoilHealth(n) => stats.soil_health >= n,
        AchievementCondition::Co2ReducedGrams(n) => stats.co2_reduced_g >= n,
    }
}

/// All achievements of a farm, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementBoard {
    achievements: Vec<Achievement>,
}

impl AchievementBoard {
    /// Wrap an explicit achievement list.
    pub const fn new(achievements: Vec<Achievement>) -> Self {
        Self { achievements }
    }

    /// The four built-in achievements, each worth `reward` coins.
    pub fn builtin(reward: u64) -> Self {
        let entry = |id: &str, name: &str, description: &str, condition| Achievement {
            id: AchievementId::from(id),
            name: name.to_owned(),
            description: description.to_owned(),
            condition,
            unlocked: false,
            reward,
        };
        Self::new(vec![
            entry(
                "green-thumb",
                "Green Thumb",
                "Grew 100 plants",
                AchievementCondition::CropsGrown(100),
            ),
            entry(
                "water-wise",
                "Water Wise",
                "Watered plants 500 times",
                AchievementCondition::PlantsWatered(500),
            ),
            entry(
                "soil-master",
                "Soil Master",
                "Raised farm soil health to 95",
                AchievementCondition::SoilHealth(95),
            ),
            entry(
                "eco-warrior",
                "Eco Warrior",
                "Reduced CO2 by 5kg",
                AchievementCondition::Co2ReducedGrams(5000),
            ),
        ])
    }

    /// All achievements.
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Number of unlocked achievements.
    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Unlock every locked achievement whose condition now holds.
    ///
    /// Returns the newly unlocked achievements; empty when nothing changed.
    pub fn evaluate(&mut self, stats: &FarmStats) -> Vec<Unlocked> {
        let mut unlocked = Vec::new();
        for achievement in &mut self.achievements {
            if achievement.unlocked || !condition_met(achievement.condition, stats) {
                continue;
            }
            achievement.unlocked = true;
            info!(
                achievement = %achievement.id,
                reward = achievement.reward,
                "achievement unlocked"
            );
            unlocked.push(Unlocked {
                achievement_id: achievement.id.clone(),
                name: achievement.name.clone(),
                reward: achievement.reward,
            });
        }
        unlocked
    }
}
