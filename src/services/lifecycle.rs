//! Item lifecycle engine
//!
//! Encodes how an item moves between board stages and what data each move
//! carries. Moves into `executed` and `closed` carry a stage payload that is
//! merged onto the item; every other move only rewrites `status`. Nothing is
//! hard-blocked: any status can reach any other, and stage data captured
//! earlier is never cleared by a later move.

use serde::{Deserialize, Serialize};

use crate::error::ItemError;
use crate::models::investment::{AnalysisPoint, InvestmentItem, ItemPatch, ItemStatus};

/// Data captured when an idea is executed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayload {
    pub executed_date: String,
    #[serde(default)]
    pub open_price: String,
    #[serde(default)]
    pub open_reason: String,
    #[serde(default)]
    pub executed_follow_up_date: String,
    #[serde(default)]
    pub executed_follow_up_time: String,
    #[serde(default)]
    pub executed_image: Option<String>,
    #[serde(default)]
    pub executed_analysis: Vec<AnalysisPoint>,
}

/// Data captured when a position is closed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingPayload {
    pub closed_date: String,
    #[serde(default)]
    pub close_price: String,
    #[serde(default)]
    pub close_reason: String,
    #[serde(default)]
    pub closed_image: Option<String>,
    #[serde(default)]
    pub closed_analysis: Vec<AnalysisPoint>,
}

/// A requested stage change
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Execute(ExecutionPayload),
    Close(ClosingPayload),
    /// Status-only move; leaves every stage field as it is
    Move(ItemStatus),
}

impl Transition {
    pub fn target(&self) -> ItemStatus {
        match self {
            Transition::Execute(_) => ItemStatus::Executed,
            Transition::Close(_) => ItemStatus::Closed,
            Transition::Move(status) => *status,
        }
    }

    /// Validate the payload and turn it into the patch that performs the move.
    ///
    /// Blank analysis entries are dropped here, so the resulting list may be
    /// empty.
    pub fn to_patch(&self) -> Result<ItemPatch, ItemError> {
        match self {
            Transition::Execute(payload) => {
                require_date("executedDate", &payload.executed_date)?;
                Ok(ItemPatch {
                    status: Some(ItemStatus::Executed),
                    executed_date: Some(payload.executed_date.clone()),
                    open_price: Some(payload.open_price.clone()),
                    open_reason: Some(payload.open_reason.clone()),
                    executed_follow_up_date: Some(payload.executed_follow_up_date.clone()),
                    executed_follow_up_time: Some(payload.executed_follow_up_time.clone()),
                    executed_image: Some(payload.executed_image.clone()),
                    executed_analysis: Some(discard_blank(&payload.executed_analysis)),
                    ..Default::default()
                })
            }
            Transition::Close(payload) => {
                require_date("closedDate", &payload.closed_date)?;
                Ok(ItemPatch {
                    status: Some(ItemStatus::Closed),
                    closed_date: Some(payload.closed_date.clone()),
                    close_price: Some(payload.close_price.clone()),
                    close_reason: Some(payload.close_reason.clone()),
                    closed_image: Some(payload.closed_image.clone()),
                    closed_analysis: Some(discard_blank(&payload.closed_analysis)),
                    ..Default::default()
                })
            }
            Transition::Move(status) => Ok(ItemPatch {
                status: Some(*status),
                ..Default::default()
            }),
        }
    }
}

/// What a client must do before a move can be committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePlan {
    /// Already in the target column
    Unchanged,
    /// Commit as a status-only move
    Direct,
    /// Ask the user for execution details first
    CollectExecution,
    /// Ask the user for closing details first
    CollectClosing,
}

/// Decide how a move from `current` to `target` proceeds.
///
/// Items leaving the archive go straight back without re-collecting stage
/// data; whatever was captured before is reused.
pub fn plan_move(current: ItemStatus, target: ItemStatus) -> MovePlan {
    if current == target {
        return MovePlan::Unchanged;
    }

    match (current, target) {
        (ItemStatus::Archive, _) => MovePlan::Direct,
        (_, ItemStatus::Executed) => MovePlan::CollectExecution,
        (_, ItemStatus::Closed) => MovePlan::CollectClosing,
        _ => MovePlan::Direct,
    }
}

/// Apply a transition to a copy of `item`. Fails without touching anything
/// when the payload is invalid.
pub fn apply(item: &InvestmentItem, transition: &Transition) -> Result<InvestmentItem, ItemError> {
    let patch = transition.to_patch()?;
    let mut merged = item.clone();
    merge_patch(&mut merged, &patch);
    Ok(merged)
}

/// Shallow merge: every field present in the patch replaces the stored one.
pub fn merge_patch(item: &mut InvestmentItem, patch: &ItemPatch) {
    if let Some(instrument) = &patch.instrument {
        item.instrument = instrument.clone();
    }
    if let Some(points) = &patch.analysis_points {
        item.analysis_points = points.clone();
    }
    if let Some(date) = &patch.follow_up_date {
        item.follow_up_date = date.clone();
    }
    if let Some(time) = &patch.follow_up_time {
        item.follow_up_time = time.clone();
    }
    if let Some(image) = &patch.image {
        item.image = image.clone();
    }
    if let Some(status) = patch.status {
        item.status = status;
    }

    replace(&mut item.executed_date, &patch.executed_date);
    replace(&mut item.open_price, &patch.open_price);
    replace(&mut item.open_reason, &patch.open_reason);
    replace(&mut item.executed_follow_up_date, &patch.executed_follow_up_date);
    replace(&mut item.executed_follow_up_time, &patch.executed_follow_up_time);
    if let Some(image) = &patch.executed_image {
        item.executed_image = image.clone();
    }
    if let Some(analysis) = &patch.executed_analysis {
        item.executed_analysis = Some(discard_blank(analysis));
    }

    replace(&mut item.closed_date, &patch.closed_date);
    replace(&mut item.close_price, &patch.close_price);
    replace(&mut item.close_reason, &patch.close_reason);
    if let Some(image) = &patch.closed_image {
        item.closed_image = image.clone();
    }
    if let Some(analysis) = &patch.closed_analysis {
        item.closed_analysis = Some(discard_blank(analysis));
    }
}

fn replace(field: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *field = Some(value.clone());
    }
}

/// Drop entries whose headline and description are both empty
pub fn discard_blank(points: &[AnalysisPoint]) -> Vec<AnalysisPoint> {
    points.iter().filter(|p| !p.is_blank()).cloned().collect()
}

fn require_date(field: &str, value: &str) -> Result<(), ItemError> {
    if value.trim().is_empty() {
        return Err(ItemError::validation(format!("{} is required", field)));
    }
    Ok(())
}
