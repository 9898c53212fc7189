//! Warehouse repository: CRUD and filtered/paginated queries over the
//! warehouse entity. This service exclusively owns warehouse row mutations.
//!
//! Every read path excludes soft-deleted rows (`status = in_active`); results
//! are ordered by `(created_at DESC, id DESC)` for deterministic paging.

use crate::{
    entities::warehouse::{self, WarehouseStatus},
    errors::ServiceError,
    images::ImageSlots,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{
    sea_query::{Condition, Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Default page size when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: u64 = 7;

/// Form fields for create/update, as received from the multipart body. All
/// values arrive as strings; numeric coercion happens here so malformed input
/// fails with a validation error naming the field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WarehouseForm {
    pub warehouse_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub area_locality: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub gstno: Option<String>,
    pub total_lot_area: Option<String>,
    pub covered_area: Option<String>,
    pub no_of_docs: Option<String>,
    pub no_of_gate: Option<String>,
    pub storage_height: Option<String>,
    pub parking_area: Option<String>,
    pub status: Option<String>,
}

impl WarehouseForm {
    /// Assign a wire-named form field. Unknown names are ignored so clients
    /// may send extra fields without breaking. Blank values count as absent.
    pub fn set_field(&mut self, name: &str, value: String) {
        let slot = match name {
            "warehouse_name" => &mut self.warehouse_name,
            "address1" => &mut self.address1,
            "address2" => &mut self.address2,
            "areaLocality" => &mut self.area_locality,
            "state" => &mut self.state,
            "city" => &mut self.city,
            "pincode" => &mut self.pincode,
            "gstno" => &mut self.gstno,
            "totalLotArea" => &mut self.total_lot_area,
            "coveredArea" => &mut self.covered_area,
            "noOfDocs" => &mut self.no_of_docs,
            "noOfGate" => &mut self.no_of_gate,
            "storageHeight" => &mut self.storage_height,
            "parkingArea" => &mut self.parking_area,
            "status" => &mut self.status,
            _ => return,
        };
        if value.trim().is_empty() {
            *slot = None;
        } else {
            *slot = Some(value);
        }
    }

    /// Wire names of required fields that are missing, in contract order.
    fn missing_required(&self) -> Vec<&'static str> {
        [
            ("warehouse_name", &self.warehouse_name),
            ("address1", &self.address1),
            ("areaLocality", &self.area_locality),
            ("state", &self.state),
            ("city", &self.city),
            ("pincode", &self.pincode),
            ("totalLotArea", &self.total_lot_area),
            ("coveredArea", &self.covered_area),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Optional search filters, combined conjunctively. Absent filters impose no
/// constraint.
#[derive(Clone, Debug, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring OR-match across name, locality, city, state
    pub q: Option<String>,
    /// Case-insensitive exact state match
    pub state: Option<String>,
    /// Case-insensitive substring city match
    pub city: Option<String>,
}

impl SearchFilter {
    fn into_condition(self) -> Condition {
        let mut cond = Condition::all();
        if let Some(state) = self.state {
            cond = cond.add(ci_eq(warehouse::Column::State, &state));
        }
        if let Some(city) = self.city {
            cond = cond.add(ci_contains(warehouse::Column::City, &city));
        }
        if let Some(q) = self.q {
            cond = cond.add(
                Condition::any()
                    .add(ci_contains(warehouse::Column::WarehouseName, &q))
                    .add(ci_contains(warehouse::Column::AreaLocality, &q))
                    .add(ci_contains(warehouse::Column::City, &q))
                    .add(ci_contains(warehouse::Column::State, &q)),
            );
        }
        cond
    }
}

// lower() on both sides keeps matching case-insensitive on PostgreSQL and
// SQLite alike.
fn ci_eq(col: warehouse::Column, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).eq(value.to_lowercase())
}

fn ci_contains(col: warehouse::Column, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(format!("%{}%", value.to_lowercase()))
}

/// One page of warehouse rows plus pagination totals.
#[derive(Clone, Debug)]
pub struct WarehousePage {
    pub rows: Vec<warehouse::Model>,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Clone, Debug)]
pub struct WarehouseService {
    db: Arc<DatabaseConnection>,
}

impl WarehouseService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List visible warehouses, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, limit: u64) -> Result<WarehousePage, ServiceError> {
        self.page_query(Condition::all(), page, limit).await
    }

    /// Search visible warehouses with conjunctive filters; same ordering and
    /// pagination as `list`.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        filter: SearchFilter,
        page: u64,
        limit: u64,
    ) -> Result<WarehousePage, ServiceError> {
        self.page_query(filter.into_condition(), page, limit).await
    }

    /// Fetch one visible warehouse.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<warehouse::Model, ServiceError> {
        self.find_visible(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Warehouse not found".to_string()))
    }

    /// Create a warehouse. `image_paths` are the stored upload paths in slot
    /// order; status defaults to `unpublish`.
    #[instrument(skip(self, form, image_paths))]
    pub async fn create(
        &self,
        form: WarehouseForm,
        image_paths: Vec<String>,
    ) -> Result<warehouse::Model, ServiceError> {
        let missing = form.missing_required();
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let slots = ImageSlots::from_uploads(&image_paths)?;
        let status = match form.status.as_deref() {
            None => WarehouseStatus::Unpublish,
            Some(raw) => WarehouseStatus::parse(raw)
                .ok_or_else(|| ServiceError::Validation("Invalid status value".to_string()))?,
        };

        let now = Utc::now();
        let created = warehouse::ActiveModel {
            warehouse_id: Set(new_warehouse_id(now)),
            warehouse_name: Set(form.warehouse_name.unwrap_or_default()),
            address1: Set(form.address1.unwrap_or_default()),
            address2: Set(form.address2),
            area_locality: Set(form.area_locality.unwrap_or_default()),
            state: Set(form.state.unwrap_or_default()),
            city: Set(form.city.unwrap_or_default()),
            pincode: Set(form.pincode.unwrap_or_default()),
            gstno: Set(form.gstno),
            total_lot_area: Set(require_f64("totalLotArea", form.total_lot_area)?),
            covered_area: Set(require_f64("coveredArea", form.covered_area)?),
            no_of_docs: Set(opt_i32("noOfDocs", form.no_of_docs)?),
            no_of_gate: Set(opt_i32("noOfGate", form.no_of_gate)?),
            storage_height: Set(opt_f64("storageHeight", form.storage_height)?),
            parking_area: Set(opt_f64("parkingArea", form.parking_area)?),
            status: Set(status),
            warehouse_images: Set(slots),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(id = created.id, warehouse_id = %created.warehouse_id, "created warehouse");
        Ok(created)
    }

    /// Partial update: only supplied fields are overwritten. Image slots are
    /// recomputed only when new files were uploaded; otherwise the existing
    /// four paths are preserved verbatim.
    #[instrument(skip(self, form, image_paths))]
    pub async fn update(
        &self,
        id: i32,
        form: WarehouseForm,
        image_paths: Vec<String>,
    ) -> Result<warehouse::Model, ServiceError> {
        let existing = self
            .find_visible(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Warehouse not found".to_string()))?;

        let merged_slots = if image_paths.is_empty() {
            None
        } else {
            Some(existing.warehouse_images.with_uploads(&image_paths)?)
        };

        let mut active: warehouse::ActiveModel = existing.into();
        if let Some(v) = form.warehouse_name {
            active.warehouse_name = Set(v);
        }
        if let Some(v) = form.address1 {
            active.address1 = Set(v);
        }
        if let Some(v) = form.address2 {
            active.address2 = Set(Some(v));
        }
        if let Some(v) = form.area_locality {
            active.area_locality = Set(v);
        }
        if let Some(v) = form.state {
            active.state = Set(v);
        }
        if let Some(v) = form.city {
            active.city = Set(v);
        }
        if let Some(v) = form.pincode {
            active.pincode = Set(v);
        }
        if let Some(v) = form.gstno {
            active.gstno = Set(Some(v));
        }
        if let Some(raw) = form.total_lot_area {
            active.total_lot_area = Set(parse_f64("totalLotArea", &raw)?);
        }
        if let Some(raw) = form.covered_area {
            active.covered_area = Set(parse_f64("coveredArea", &raw)?);
        }
        if let Some(raw) = form.no_of_docs {
            active.no_of_docs = Set(Some(parse_i32("noOfDocs", &raw)?));
        }
        if let Some(raw) = form.no_of_gate {
            active.no_of_gate = Set(Some(parse_i32("noOfGate", &raw)?));
        }
        if let Some(raw) = form.storage_height {
            active.storage_height = Set(Some(parse_f64("storageHeight", &raw)?));
        }
        if let Some(raw) = form.parking_area {
            active.parking_area = Set(Some(parse_f64("parkingArea", &raw)?));
        }
        if let Some(slots) = merged_slots {
            active.warehouse_images = Set(slots);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await?;
        info!(id = updated.id, "updated warehouse");
        Ok(updated)
    }

    /// Soft-delete: mark the row `in_active`. A row that is already
    /// soft-deleted reads as absent, so a second delete fails with NotFound.
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self
            .find_visible(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Warehouse not found".to_string()))?;

        let mut active: warehouse::ActiveModel = existing.into();
        active.status = Set(WarehouseStatus::InActive);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        info!(id, "soft-deleted warehouse");
        Ok(())
    }

    /// Toggle between `publish` and `unpublish`. Any other value, including
    /// `in_active`, is a validation error.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: i32,
        status: &str,
    ) -> Result<warehouse::Model, ServiceError> {
        let status = WarehouseStatus::parse(status)
            .filter(|s| matches!(s, WarehouseStatus::Publish | WarehouseStatus::Unpublish))
            .ok_or_else(|| ServiceError::Validation("Invalid status value".to_string()))?;

        let existing = warehouse::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Warehouse not found".to_string()))?;

        let mut active: warehouse::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;
        Ok(updated)
    }

    async fn find_visible(&self, id: i32) -> Result<Option<warehouse::Model>, ServiceError> {
        let found = warehouse::Entity::find()
            .filter(warehouse::Column::Id.eq(id))
            .filter(warehouse::Column::Status.ne(WarehouseStatus::InActive))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    async fn page_query(
        &self,
        extra: Condition,
        page: u64,
        limit: u64,
    ) -> Result<WarehousePage, ServiceError> {
        let page = page.max(1);
        let limit = limit.max(1);

        let base = warehouse::Entity::find()
            .filter(warehouse::Column::Status.ne(WarehouseStatus::InActive))
            .filter(extra);

        let total = base.clone().count(&*self.db).await?;
        let rows = base
            .order_by_desc(warehouse::Column::CreatedAt)
            .order_by_desc(warehouse::Column::Id)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(WarehousePage {
            rows,
            total,
            total_pages: total.div_ceil(limit),
        })
    }
}

// Millisecond timestamps alone collide under back-to-back creates; the random
// tail keeps the unique key satisfied.
fn new_warehouse_id(now: DateTime<Utc>) -> String {
    let tail: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("WH-{}-{}", now.timestamp_millis(), tail)
}

fn parse_f64(field: &str, raw: &str) -> Result<f64, ServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::Validation(format!("Invalid numeric value for {field}")))
}

fn parse_i32(field: &str, raw: &str) -> Result<i32, ServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::Validation(format!("Invalid numeric value for {field}")))
}

fn require_f64(field: &str, raw: Option<String>) -> Result<f64, ServiceError> {
    // Presence was already checked; the unwrap_or_default only guards against
    // misuse from new call sites.
    parse_f64(field, raw.unwrap_or_default().as_str())
}

fn opt_f64(field: &str, raw: Option<String>) -> Result<Option<f64>, ServiceError> {
    raw.map(|r| parse_f64(field, &r)).transpose()
}

fn opt_i32(field: &str, raw: Option<String>) -> Result<Option<i32>, ServiceError> {
    raw.map(|r| parse_i32(field, &r)).transpose()
}
