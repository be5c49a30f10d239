//! Client-side board state
//!
//! `BoardSync` owns the last-known grouped view and keeps it in step with
//! the server. Moves and edits are applied locally first and queued as
//! pending operations; `flush` sends them and either reconciles the local
//! copy with the server's answer or rolls the change back. Creates and
//! deletes are awaited, and a delete only leaves the view once the server
//! confirms it.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::client::api::{ClientError, InvestmentApi};
use crate::error::ItemError;
use crate::models::investment::{GroupedItems, InvestmentItem, ItemPatch, ItemStatus, NewItem};
use crate::services::lifecycle::{self, ClosingPayload, ExecutionPayload, MovePlan, Transition};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Item {0} is not on the board")]
    UnknownItem(String),

    #[error("No move is waiting for stage details")]
    NoPendingStage,

    #[error(transparent)]
    Invalid(#[from] ItemError),

    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Result of asking for a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Already in the target column
    Unchanged,
    /// Applied locally and queued for the server
    Committed,
    /// Waiting for the stage form; see [`BoardSync::pending_stage`]
    AwaitingDetails(PendingStage),
}

/// A move into `executed` or `closed` that is on hold until the user
/// supplies the stage details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStage {
    pub item_id: String,
    pub target: ItemStatus,
}

#[derive(Debug, Clone, PartialEq)]
enum PendingRequest {
    Update(ItemPatch),
    UpdateStatus(ItemStatus),
}

/// An optimistic change that has not reached the server yet
#[derive(Debug, Clone)]
struct PendingOp {
    item_id: String,
    request: PendingRequest,
    /// Item as it was before the change, and where it sat
    previous: InvestmentItem,
    previous_index: usize,
}

/// Outcome of one flushed operation
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Server accepted; local copy replaced by the server's
    Reconciled { id: String },
    /// Server refused or was unreachable; local change undone
    RolledBack { id: String, error: String },
}

pub struct BoardSync<A: InvestmentApi> {
    api: A,
    board: GroupedItems,
    pending: VecDeque<PendingOp>,
    stage: Option<PendingStage>,
    banner: Option<String>,
    authenticated: bool,
}

impl<A: InvestmentApi> BoardSync<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            board: GroupedItems::default(),
            pending: VecDeque::new(),
            stage: None,
            banner: None,
            authenticated: false,
        }
    }

    pub fn board(&self) -> &GroupedItems {
        &self.board
    }

    /// Last user-visible error, if any
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn pending_stage(&self) -> Option<&PendingStage> {
        self.stage.as_ref()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn login(&mut self, password: &str) -> Result<bool, SyncError> {
        let accepted = self.api.login(password).await.map_err(|e| {
            error!(error = %e, "Login request failed");
            SyncError::from(e)
        })?;
        self.authenticated = accepted;
        Ok(accepted)
    }

    /// Forget the session and the cached board
    pub fn sign_out(&mut self) {
        self.authenticated = false;
        self.board = GroupedItems::default();
        self.pending.clear();
        self.stage = None;
        self.banner = None;
    }

    /// Replace the cached board with the server's grouped view.
    ///
    /// On failure the previous board is kept and the banner is set.
    pub async fn load(&mut self) -> bool {
        match self.api.get_all().await {
            Ok(board) => {
                self.board = board;
                self.banner = None;
                true
            }
            Err(e) => {
                error!(error = %e, "Error loading items");
                self.banner = Some(e.to_string());
                false
            }
        }
    }

    /// Create on the server, then put the new card at the top of followUp
    pub async fn create(&mut self, item: NewItem) -> Result<InvestmentItem, SyncError> {
        match self.api.create(&item).await {
            Ok(created) => {
                self.banner = None;
                self.board.prepend(created.clone());
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "Error creating item");
                self.banner = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Start moving `id` to `target`.
    ///
    /// Moves into executed or closed are held until
    /// [`confirm_execution`](Self::confirm_execution) or
    /// [`confirm_closing`](Self::confirm_closing); other moves are committed
    /// straight away.
    pub fn request_move(&mut self, id: &str, target: ItemStatus) -> Result<MoveOutcome, SyncError> {
        let current = self
            .board
            .find(id)
            .map(|item| item.status)
            .ok_or_else(|| SyncError::UnknownItem(id.to_string()))?;

        match lifecycle::plan_move(current, target) {
            MovePlan::Unchanged => Ok(MoveOutcome::Unchanged),
            MovePlan::Direct => {
                self.commit(id, Transition::Move(target))?;
                Ok(MoveOutcome::Committed)
            }
            MovePlan::CollectExecution | MovePlan::CollectClosing => {
                let stage = PendingStage {
                    item_id: id.to_string(),
                    target,
                };
                self.stage = Some(stage.clone());
                Ok(MoveOutcome::AwaitingDetails(stage))
            }
        }
    }

    /// Abandon the held move; the board is left as it was
    pub fn cancel_stage(&mut self) {
        self.stage = None;
    }

    pub fn confirm_execution(&mut self, payload: ExecutionPayload) -> Result<(), SyncError> {
        self.confirm_stage(ItemStatus::Executed, Transition::Execute(payload))
    }

    pub fn confirm_closing(&mut self, payload: ClosingPayload) -> Result<(), SyncError> {
        self.confirm_stage(ItemStatus::Closed, Transition::Close(payload))
    }

    /// An invalid payload keeps the form open; an item that has left the
    /// board closes it.
    fn confirm_stage(&mut self, target: ItemStatus, transition: Transition) -> Result<(), SyncError> {
        let stage = match &self.stage {
            Some(stage) if stage.target == target => stage.clone(),
            _ => return Err(SyncError::NoPendingStage),
        };

        match self.commit(&stage.item_id, transition) {
            Ok(()) => {
                self.stage = None;
                Ok(())
            }
            Err(e @ SyncError::UnknownItem(_)) => {
                self.stage = None;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Edit core fields in place and queue the save
    pub fn edit_item(&mut self, id: &str, patch: ItemPatch) -> Result<(), SyncError> {
        if patch.instrument.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(ItemError::validation("instrument is required").into());
        }
        if patch.analysis_points.as_ref().is_some_and(|p| p.is_empty()) {
            return Err(ItemError::validation("at least one analysis point is required").into());
        }

        let (status, index) = self
            .board
            .position(id)
            .ok_or_else(|| SyncError::UnknownItem(id.to_string()))?;

        let column = self.board.partition_mut(status);
        let previous = column[index].clone();
        lifecycle::merge_patch(&mut column[index], &patch);

        if column[index].status != status {
            let moved = column.remove(index);
            self.board.prepend(moved);
        }

        self.pending.push_back(PendingOp {
            item_id: id.to_string(),
            request: PendingRequest::Update(patch),
            previous,
            previous_index: index,
        });
        Ok(())
    }

    /// Apply locally, move to the top of the destination column, queue the
    /// matching server call
    fn commit(&mut self, id: &str, transition: Transition) -> Result<(), SyncError> {
        let source = self
            .board
            .find(id)
            .ok_or_else(|| SyncError::UnknownItem(id.to_string()))?;

        let merged = lifecycle::apply(source, &transition)?;
        let request = match transition {
            Transition::Move(status) => PendingRequest::UpdateStatus(status),
            other => PendingRequest::Update(other.to_patch()?),
        };

        let Some((_, previous_index, previous)) = self.board.remove(id) else {
            return Err(SyncError::UnknownItem(id.to_string()));
        };
        info!(id = %id, from = %previous.status, to = %merged.status, "Moved item");
        self.board.prepend(merged);

        self.pending.push_back(PendingOp {
            item_id: id.to_string(),
            request,
            previous,
            previous_index,
        });
        Ok(())
    }

    /// Send every queued change in order. Failures are logged and rolled
    /// back, never retried.
    pub async fn flush(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::with_capacity(self.pending.len());

        while let Some(op) = self.pending.pop_front() {
            let result = match &op.request {
                PendingRequest::Update(patch) => self.api.update(&op.item_id, patch).await,
                PendingRequest::UpdateStatus(status) => {
                    self.api.update_status(&op.item_id, *status).await
                }
            };

            match result {
                Ok(server_item) => {
                    // A later queued change to the same item is newer than this answer
                    if !self.pending.iter().any(|p| p.item_id == op.item_id) {
                        self.reconcile(server_item);
                    }
                    events.push(SyncEvent::Reconciled { id: op.item_id });
                }
                Err(e) => {
                    warn!(id = %op.item_id, error = %e, "Error syncing item, rolling back");
                    let error = e.to_string();

                    // Later changes to the same item were built on this one
                    let (dropped, kept): (Vec<_>, Vec<_>) = self
                        .pending
                        .drain(..)
                        .partition(|p| p.item_id == op.item_id);
                    self.pending = kept.into();

                    let id = op.item_id.clone();
                    self.roll_back(op);
                    events.push(SyncEvent::RolledBack {
                        id,
                        error: error.clone(),
                    });
                    events.extend(dropped.into_iter().map(|p| SyncEvent::RolledBack {
                        id: p.item_id,
                        error: error.clone(),
                    }));
                }
            }
        }

        events
    }

    /// Delete on the server first; the card stays put if that fails
    pub async fn delete(&mut self, id: &str) -> Result<(), SyncError> {
        if let Err(e) = self.api.delete(id).await {
            error!(id = %id, error = %e, "Error deleting item");
            self.banner = Some(e.to_string());
            return Err(e.into());
        }

        self.board.remove(id);
        self.pending.retain(|op| op.item_id != id);
        Ok(())
    }

    fn reconcile(&mut self, server_item: InvestmentItem) {
        match self.board.position(&server_item.id) {
            Some((status, index)) if status == server_item.status => {
                self.board.partition_mut(status)[index] = server_item;
            }
            Some(_) => {
                self.board.remove(&server_item.id);
                self.board.prepend(server_item);
            }
            // Deleted locally while the request was in flight
            None => {}
        }
    }

    fn roll_back(&mut self, op: PendingOp) {
        self.board.remove(&op.item_id);
        let status = op.previous.status;
        self.board.insert_at(status, op.previous_index, op.previous);
    }
}
