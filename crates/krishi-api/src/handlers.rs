//! REST endpoint handlers for the command API.
//!
//! Reads return a [`StateSnapshot`] or part of one. Commands run one store
//! method under the session lock and return the affected entities plus the
//! new coin balance.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/state` | Full game snapshot |
//! | `GET` | `/api/plots` | All plots |
//! | `POST` | `/api/plots/{id}/plant` | Plant a crop |
//! | `POST` | `/api/plots/{id}/water` | Water a plot |
//! | `POST` | `/api/plots/{id}/fertilize` | Apply fertilizer |
//! | `POST` | `/api/plots/{id}/harvest` | Harvest a ready plot |
//! | `POST` | `/api/quizzes/{id}/submit` | Score a quiz |
//! | `POST` | `/api/achievements/evaluate` | Re-check achievements |
//! | `POST` | `/api/missions/{id}/complete` | Complete a mission |
//! | `POST` | `/api/missions/{id}/photo` | Submit mission photo proof |
//! | `POST` | `/api/store/purchase` | Buy store items |

// Axum handlers must be async even when the store call is synchronous.
#![allow(clippy::unused_async)]

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use krishi_core::StateSnapshot;
use krishi_types::{
    AchievementId, CropId, FertilizerKind, LedgerEntry, MissionId, Plot, PlotId, PurchaseItem, QuizAnswers, QuizId,
};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/plots/{id}/plant`.
#[derive(Debug, Deserialize)]
pub struct PlantRequest {
    /// Crop to plant.
    pub crop_id: CropId,
}

/// Body of `POST /api/plots/{id}/fertilize`.
#[derive(Debug, Deserialize)]
pub struct FertilizeRequest {
    /// `organic` or `chemical`.
    pub kind: FertilizerKind,
}

/// Body of `POST /api/quizzes/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    /// Selected option index per question id.
    pub answers: QuizAnswers,
}

/// Body of `POST /api/store/purchase`.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Items in the cart.
    pub items: Vec<PurchaseItem>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A plot after a command, with the resulting balance.
#[derive(Debug, Serialize)]
pub struct PlotResponse {
    /// The updated plot.
    pub plot: Plot,
    /// Coin balance afterwards.
    pub coins: u64,
}

/// Result of a harvest.
#[derive(Debug, Serialize)]
pub struct HarvestResponse {
    /// The reset plot.
    pub plot: Plot,
    /// Crop that was harvested.
    pub crop_id: Option<CropId>,
    /// Coins and experience earned.
    pub harvest_yield: u64,
    /// Farmer level afterwards.
    pub level: u64,
    /// Coin balance afterwards.
    pub coins: u64,
}

/// Result of a quiz submission.
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    /// Quiz key.
    pub quiz_id: QuizId,
    /// Correct answers.
    pub correct: usize,
    /// Questions in the quiz.
    pub total: usize,
    /// Floor percentage.
    pub score: u32,
    /// Whether the threshold was met.
    pub passed: bool,
    /// Coins granted by this attempt.
    pub reward: u64,
    /// Coin balance afterwards.
    pub coins: u64,
}

/// One achievement unlocked by an evaluation.
#[derive(Debug, Serialize)]
pub struct UnlockedAchievement {
    /// Achievement key.
    pub achievement_id: AchievementId,
    /// Display name.
    pub name: String,
    /// Coins granted.
    pub reward: u64,
}

/// Result of an achievement evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    /// Newly unlocked achievements.
    pub unlocked: Vec<UnlockedAchievement>,
    /// Coin balance afterwards.
    pub coins: u64,
}

/// Result of a mission command.
#[derive(Debug, Serialize)]
pub struct MissionResponse {
    /// Mission key.
    pub mission_id: MissionId,
    /// Coins granted.
    pub reward: u64,
    /// Coin balance afterwards.
    pub coins: u64,
}

/// Result of a purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// The debit recorded in the ledger.
    pub entry: LedgerEntry,
    /// Coin balance afterwards.
    pub coins: u64,
}

fn parse_plot_id(raw: &str) -> Result<PlotId, ApiError> {
    Uuid::parse_str(raw)
        .map(PlotId::from)
        .map_err(|e| ApiError::InvalidUuid(format!("{raw}: {e}")))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Full game snapshot.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateSnapshot> {
    Json(state.session.snapshot())
}

/// All plots.
pub async fn list_plots(State(state): State<Arc<AppState>>) -> Json<Vec<Plot>> {
    let plots = state
        .session
        .with_store(|store| store.state().plots.plots().to_vec());
    Json(plots)
}

// ---------------------------------------------------------------------------
// Plot commands
// ---------------------------------------------------------------------------

/// Plant a crop in an empty plot.
pub async fn plant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<PlantRequest>,
) -> Result<Json<PlotResponse>, ApiError> {
    let plot_id = parse_plot_id(&id)?;
    let response = state.session.with_store(|store| {
        store.plant(plot_id, &body.crop_id).map(|plot| PlotResponse {
            plot,
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}

/// Water a planted plot.
pub async fn water(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlotResponse>, ApiError> {
    let plot_id = parse_plot_id(&id)?;
    let response = state.session.with_store(|store| {
        store.water(plot_id).map(|plot| PlotResponse {
            plot,
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}

/// Apply fertilizer to a planted plot.
pub async fn fertilize(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<FertilizeRequest>,
) -> Result<Json<PlotResponse>, ApiError> {
    let plot_id = parse_plot_id(&id)?;
    let response = state.session.with_store(|store| {
        store.apply_fertilizer(plot_id, body.kind).map(|plot| PlotResponse {
            plot,
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}

/// Harvest a ready plot.
pub async fn harvest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HarvestResponse>, ApiError> {
    let plot_id = parse_plot_id(&id)?;
    let response = state.session.with_store(|store| {
        store.harvest(plot_id).map(|outcome| HarvestResponse {
            plot: outcome.plot,
            crop_id: outcome.crop,
            harvest_yield: outcome.harvest_yield,
            level: store.state().stats.level(),
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Progression commands
// ---------------------------------------------------------------------------

/// Score a quiz submission.
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz_id = QuizId::from(id);
    let response = state.session.with_store(|store| {
        store.submit_quiz(&quiz_id, &body.answers).map(|outcome| QuizResponse {
            quiz_id: outcome.quiz_id,
            correct: outcome.correct,
            total: outcome.total,
            score: outcome.score,
            passed: outcome.passed,
            reward: outcome.reward,
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}

/// Unlock any achievements whose thresholds are met.
pub async fn evaluate_achievements(State(state): State<Arc<AppState>>) -> Json<EvaluateResponse> {
    let response = state.session.with_store(|store| {
        let unlocked = store
            .evaluate_achievements()
            .into_iter()
            .map(|u| UnlockedAchievement {
                achievement_id: u.achievement_id,
                name: u.name,
                reward: u.reward,
            })
            .collect();
        EvaluateResponse {
            unlocked,
            coins: store.coins(),
        }
    });
    Json(response)
}

/// Complete a mission.
pub async fn complete_mission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MissionResponse>, ApiError> {
    let mission_id = MissionId::from(id);
    let response = state.session.with_store(|store| {
        store.complete_mission(&mission_id).map(|done| MissionResponse {
            mission_id: done.mission_id,
            reward: done.reward,
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}

/// Submit photo proof for a mission.
pub async fn submit_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MissionResponse>, ApiError> {
    let mission_id = MissionId::from(id);
    let response = state.session.with_store(|store| {
        store.submit_photo_proof(&mission_id).map(|bonus| MissionResponse {
            mission_id: mission_id.clone(),
            reward: bonus,
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}

/// Buy store items.
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let response = state.session.with_store(|store| {
        store.purchase(&body.items).map(|entry| PurchaseResponse {
            entry,
            coins: store.coins(),
        })
    })?;
    Ok(Json(response))
}
