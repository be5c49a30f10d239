//! `SeaORM` Entity for investment_items table
//!
//! One row per trade idea. Analysis lists are stored as JSON documents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_items")]
pub struct Model {
    /// UUID v4, assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub instrument: String,
    /// `[{headline, description}]`
    #[sea_orm(column_type = "JsonBinary")]
    pub analysis_points: Json,
    pub follow_up_date: String,
    pub follow_up_time: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub image: Option<String>,
    /// ISO-8601 with milliseconds, sortable as text
    pub creation_date: String,
    /// One of followUp, executed, closed, archive
    pub status: String,

    pub executed_date: Option<String>,
    pub open_price: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub open_reason: Option<String>,
    pub executed_follow_up_date: Option<String>,
    pub executed_follow_up_time: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub executed_image: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub executed_analysis: Option<Json>,

    pub closed_date: Option<String>,
    pub close_price: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub close_reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub closed_image: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub closed_analysis: Option<Json>,

    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
