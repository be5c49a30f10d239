//! Item repository
//!
//! CRUD over the investment_items table. Owns id assignment, creation
//! defaults and the field invariants that the store itself does not enforce.
//! Every mutating call writes through before returning.

use chrono::{SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{investment_items, prelude::InvestmentItems};
use crate::error::ItemError;
use crate::models::investment::{AnalysisPoint, InvestmentItem, ItemPatch, ItemStatus, NewItem};
use crate::services::lifecycle::{self, Transition};

#[derive(Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new idea in `followUp`
    pub async fn create(&self, new_item: NewItem) -> Result<InvestmentItem, ItemError> {
        validate_instrument(&new_item.instrument)?;
        validate_analysis_points(&new_item.analysis_points)?;

        let now = Utc::now();
        let model = investment_items::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            instrument: Set(new_item.instrument),
            analysis_points: Set(to_json(&new_item.analysis_points)?),
            follow_up_date: Set(new_item.follow_up_date),
            follow_up_time: Set(new_item.follow_up_time),
            image: Set(new_item.image),
            creation_date: Set(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            status: Set(ItemStatus::FollowUp.as_str().to_string()),
            executed_date: Set(None),
            open_price: Set(None),
            open_reason: Set(None),
            executed_follow_up_date: Set(None),
            executed_follow_up_time: Set(None),
            executed_image: Set(None),
            executed_analysis: Set(None),
            closed_date: Set(None),
            close_price: Set(None),
            close_reason: Set(None),
            closed_image: Set(None),
            closed_analysis: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        let saved = model.insert(&self.db).await?;
        info!(id = %saved.id, instrument = %saved.instrument, "Created investment item");

        into_item(saved)
    }

    /// All items, newest first
    pub async fn get_all(&self) -> Result<Vec<InvestmentItem>, ItemError> {
        let models = InvestmentItems::find()
            .order_by_desc(investment_items::Column::CreationDate)
            .all(&self.db)
            .await?;

        debug!("Loaded {} investment items", models.len());

        models.into_iter().map(into_item).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<InvestmentItem, ItemError> {
        into_item(self.find_model(id).await?)
    }

    /// Shallow-merge `patch` onto the stored item.
    ///
    /// `id` and `creationDate` cannot be changed through a patch.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Result<InvestmentItem, ItemError> {
        validate_patch(&patch)?;

        let model = self.find_model(id).await?;
        let mut item = into_item(model.clone())?;
        lifecycle::merge_patch(&mut item, &patch);

        let saved = self.save(model, &item).await?;
        info!(id = %saved.id, status = %saved.status, "Updated investment item");
        Ok(saved)
    }

    /// Rewrite `status` only
    pub async fn update_status(
        &self,
        id: &str,
        status: ItemStatus,
    ) -> Result<InvestmentItem, ItemError> {
        let model = self.find_model(id).await?;
        let previous = model.status.clone();

        let mut active: investment_items::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Some(Utc::now()));
        let saved = active.update(&self.db).await?;

        info!(id = %id, from = %previous, to = %status, "Updated item status");
        into_item(saved)
    }

    /// Run a lifecycle transition and persist the merged result in one write.
    /// An invalid payload fails before the store is touched.
    pub async fn transition(
        &self,
        id: &str,
        transition: &Transition,
    ) -> Result<InvestmentItem, ItemError> {
        let patch = transition.to_patch()?;
        self.update(id, patch).await
    }

    /// Remove permanently. Deleting twice fails with NotFound.
    pub async fn delete(&self, id: &str) -> Result<(), ItemError> {
        let result = InvestmentItems::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ItemError::NotFound(id.to_string()));
        }

        info!(id = %id, "Deleted investment item");
        Ok(())
    }

    async fn find_model(&self, id: &str) -> Result<investment_items::Model, ItemError> {
        InvestmentItems::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| ItemError::NotFound(id.to_string()))
    }

    /// Write every mutable field of `item` over `model`
    async fn save(
        &self,
        model: investment_items::Model,
        item: &InvestmentItem,
    ) -> Result<InvestmentItem, ItemError> {
        let mut active: investment_items::ActiveModel = model.into();
        active.instrument = Set(item.instrument.clone());
        active.analysis_points = Set(to_json(&item.analysis_points)?);
        active.follow_up_date = Set(item.follow_up_date.clone());
        active.follow_up_time = Set(item.follow_up_time.clone());
        active.image = Set(item.image.clone());
        active.status = Set(item.status.as_str().to_string());

        active.executed_date = Set(item.executed_date.clone());
        active.open_price = Set(item.open_price.clone());
        active.open_reason = Set(item.open_reason.clone());
        active.executed_follow_up_date = Set(item.executed_follow_up_date.clone());
        active.executed_follow_up_time = Set(item.executed_follow_up_time.clone());
        active.executed_image = Set(item.executed_image.clone());
        active.executed_analysis = Set(item.executed_analysis.as_deref().map(to_json).transpose()?);

        active.closed_date = Set(item.closed_date.clone());
        active.close_price = Set(item.close_price.clone());
        active.close_reason = Set(item.close_reason.clone());
        active.closed_image = Set(item.closed_image.clone());
        active.closed_analysis = Set(item.closed_analysis.as_deref().map(to_json).transpose()?);

        active.updated_at = Set(Some(Utc::now()));

        into_item(active.update(&self.db).await?)
    }
}

fn validate_instrument(instrument: &str) -> Result<(), ItemError> {
    if instrument.trim().is_empty() {
        return Err(ItemError::validation("instrument is required"));
    }
    Ok(())
}

fn validate_analysis_points(points: &[AnalysisPoint]) -> Result<(), ItemError> {
    if points.is_empty() {
        return Err(ItemError::validation(
            "at least one analysis point is required",
        ));
    }
    if let Some(index) = points.iter().position(|p| p.headline.trim().is_empty()) {
        return Err(ItemError::validation(format!(
            "analysis point {} is missing a headline",
            index + 1
        )));
    }
    Ok(())
}

fn validate_patch(patch: &ItemPatch) -> Result<(), ItemError> {
    if let Some(instrument) = &patch.instrument {
        validate_instrument(instrument)?;
    }
    if let Some(points) = &patch.analysis_points {
        validate_analysis_points(points)?;
    }
    Ok(())
}

fn to_json(points: &[AnalysisPoint]) -> Result<serde_json::Value, ItemError> {
    serde_json::to_value(points).map_err(|e| ItemError::Database(DbErr::Json(e.to_string())))
}

fn from_json(value: serde_json::Value) -> Result<Vec<AnalysisPoint>, ItemError> {
    serde_json::from_value(value).map_err(|e| ItemError::Database(DbErr::Json(e.to_string())))
}

/// Decode a stored row into the API shape
fn into_item(model: investment_items::Model) -> Result<InvestmentItem, ItemError> {
    let status = model
        .status
        .parse::<ItemStatus>()
        .map_err(|e| ItemError::Database(DbErr::Type(e)))?;

    Ok(InvestmentItem {
        id: model.id,
        instrument: model.instrument,
        analysis_points: from_json(model.analysis_points)?,
        follow_up_date: model.follow_up_date,
        follow_up_time: model.follow_up_time,
        image: model.image,
        creation_date: model.creation_date,
        status,
        executed_date: model.executed_date,
        open_price: model.open_price,
        open_reason: model.open_reason,
        executed_follow_up_date: model.executed_follow_up_date,
        executed_follow_up_time: model.executed_follow_up_time,
        executed_image: model.executed_image,
        executed_analysis: model.executed_analysis.map(from_json).transpose()?,
        closed_date: model.closed_date,
        close_price: model.close_price,
        close_reason: model.close_reason,
        closed_image: model.closed_image,
        closed_analysis: model.closed_analysis.map(from_json).transpose()?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
