//! Investment item request/response models
//!
//! Wire shapes for the /api/investments endpoints. Field names are camelCase
//! on the wire; stage fields are omitted until the item reaches that stage.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Board stage an item currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemStatus {
    FollowUp,
    Executed,
    Closed,
    Archive,
}

impl ItemStatus {
    /// Board order: the three stage columns, then archive
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::FollowUp,
        ItemStatus::Executed,
        ItemStatus::Closed,
        ItemStatus::Archive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::FollowUp => "followUp",
            ItemStatus::Executed => "executed",
            ItemStatus::Closed => "closed",
            ItemStatus::Archive => "archive",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid status '{}'. Expected one of: followUp, executed, closed, archive",
                    s
                )
            })
    }
}

/// One piece of rationale recorded at some stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPoint {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
}

impl AnalysisPoint {
    pub fn new(headline: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            description: description.into(),
        }
    }

    /// True when both headline and description are empty. Whitespace counts
    /// as content.
    pub fn is_blank(&self) -> bool {
        self.headline.is_empty() && self.description.is_empty()
    }
}

/// A trade idea as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentItem {
    pub id: String,
    pub instrument: String,
    pub analysis_points: Vec<AnalysisPoint>,
    #[serde(default)]
    pub follow_up_date: String,
    #[serde(default)]
    pub follow_up_time: String,
    /// Base64 encoded image, if any
    #[serde(default)]
    pub image: Option<String>,
    pub creation_date: String,
    pub status: ItemStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_follow_up_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_follow_up_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_analysis: Option<Vec<AnalysisPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_analysis: Option<Vec<AnalysisPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// POST /api/investments body
///
/// id, status and creationDate are assigned by the server; if a client sends
/// them anyway they are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub instrument: String,
    #[serde(default)]
    pub analysis_points: Vec<AnalysisPoint>,
    #[serde(default)]
    pub follow_up_date: String,
    #[serde(default)]
    pub follow_up_time: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// PUT /api/investments/{id} body
///
/// Shallow patch: a present field replaces the stored one wholesale, an
/// absent field is left untouched. Image fields distinguish "absent" from
/// an explicit `null`, which clears the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_points: Option<Vec<AnalysisPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_time: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_follow_up_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_follow_up_time: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub executed_image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_analysis: Option<Vec<AnalysisPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub closed_image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_analysis: Option<Vec<AnalysisPoint>>,
}

/// Present-but-null becomes `Some(None)`; a missing field stays `None` via `default`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// PATCH /api/investments/{id}/status body
///
/// Kept as a string so an unknown value surfaces as a validation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// GET /api/investments response, one list per board column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedItems {
    #[serde(default)]
    pub follow_up: Vec<InvestmentItem>,
    #[serde(default)]
    pub executed: Vec<InvestmentItem>,
    #[serde(default)]
    pub closed: Vec<InvestmentItem>,
    #[serde(default)]
    pub archive: Vec<InvestmentItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItemResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
