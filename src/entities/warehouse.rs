use crate::images::ImageSlots;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Listing lifecycle status. `InActive` marks a soft-deleted row: it stays in
/// storage but is excluded from every normal read path.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum WarehouseStatus {
    #[sea_orm(string_value = "publish")]
    Publish,
    #[sea_orm(string_value = "unpublish")]
    Unpublish,
    #[sea_orm(string_value = "in_active")]
    InActive,
}

impl WarehouseStatus {
    /// Parse a wire-level status string. Returns `None` for anything outside
    /// the three known values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "publish" => Some(Self::Publish),
            "unpublish" => Some(Self::Unpublish),
            "in_active" => Some(Self::InActive),
            _ => None,
        }
    }
}

/// The primary entity. Field serialization uses the dashboard's wire names
/// (a mix of camelCase and snake_case inherited from the API contract).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Externally-visible identifier, generated at creation
    /// (`WH-<millis>-<random>`).
    #[sea_orm(unique)]
    #[serde(rename = "warehouseId")]
    pub warehouse_id: String,
    pub warehouse_name: String,
    pub address1: String,
    pub address2: Option<String>,
    #[serde(rename = "areaLocality")]
    pub area_locality: String,
    pub state: String,
    pub city: String,
    pub pincode: String,
    pub gstno: Option<String>,
    #[serde(rename = "totalLotArea")]
    pub total_lot_area: f64,
    #[serde(rename = "coveredArea")]
    pub covered_area: f64,
    #[serde(rename = "noOfDocs")]
    pub no_of_docs: Option<i32>,
    #[serde(rename = "noOfGate")]
    pub no_of_gate: Option<i32>,
    #[serde(rename = "storageHeight")]
    pub storage_height: Option<f64>,
    #[serde(rename = "parkingArea")]
    pub parking_area: Option<f64>,
    pub status: WarehouseStatus,
    #[sea_orm(column_type = "Json")]
    #[serde(rename = "warehouseImages")]
    pub warehouse_images: ImageSlots,
    #[serde(rename = "createdAt")]
    pub created_at: DateTimeUtc,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
