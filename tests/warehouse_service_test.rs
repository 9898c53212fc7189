mod common;

use std::sync::Arc;

use common::{test_db, valid_warehouse_fields};
use warelist_api::{
    entities::warehouse::WarehouseStatus,
    errors::ServiceError,
    services::warehouses::{SearchFilter, WarehouseForm, WarehouseService},
};

fn form(fields: &[(&str, &str)]) -> WarehouseForm {
    let mut form = WarehouseForm::default();
    for (name, value) in fields {
        form.set_field(name, value.to_string());
    }
    form
}

async fn service() -> WarehouseService {
    WarehouseService::new(Arc::new(test_db().await))
}

#[tokio::test]
async fn create_rejects_each_missing_required_field() {
    let svc = service().await;
    let all = valid_warehouse_fields();

    for (omitted, _) in &all {
        let partial: Vec<_> = all
            .iter()
            .filter(|(name, _)| name != omitted)
            .copied()
            .collect();
        let err = svc.create(form(&partial), vec![]).await.unwrap_err();
        match err {
            ServiceError::Validation(msg) => {
                assert!(
                    msg.contains(omitted),
                    "expected {omitted} in message, got: {msg}"
                );
                assert!(msg.starts_with("Missing required fields"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn create_defaults_and_image_slots() {
    let svc = service().await;

    let created = svc
        .create(
            form(&valid_warehouse_fields()),
            vec![
                "/uploads/warehouses/front.png".to_string(),
                "/uploads/warehouses/docks.png".to_string(),
            ],
        )
        .await
        .unwrap();

    assert!(created.warehouse_id.starts_with("WH-"));
    assert_eq!(created.status, WarehouseStatus::Unpublish);
    assert_eq!(created.total_lot_area, 10000.0);
    // Two uploads fill the leading slots; the rest stay empty.
    assert_eq!(
        created.warehouse_images.0,
        [
            "/uploads/warehouses/front.png".to_string(),
            "/uploads/warehouses/docks.png".to_string(),
            String::new(),
            String::new(),
        ]
    );
}

#[tokio::test]
async fn create_reports_malformed_numbers_by_field() {
    let svc = service().await;
    let mut fields = valid_warehouse_fields();
    fields.retain(|(name, _)| *name != "coveredArea");
    fields.push(("coveredArea", "lots"));

    let err = svc.create(form(&fields), vec![]).await.unwrap_err();
    assert!(
        matches!(err, ServiceError::Validation(ref m) if m.contains("coveredArea")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn create_rejects_more_than_four_images() {
    let svc = service().await;
    let paths: Vec<String> = (0..5).map(|i| format!("/uploads/warehouses/{i}.png")).collect();

    let err = svc
        .create(form(&valid_warehouse_fields()), paths)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m == "Maximum 4 images allowed"));
}

#[tokio::test]
async fn rapid_creates_get_distinct_warehouse_ids() {
    let svc = service().await;
    let mut seen = std::collections::HashSet::new();

    // Back-to-back creates land in the same millisecond; every one must
    // still succeed with its own identifier.
    for _ in 0..20 {
        let created = svc
            .create(form(&valid_warehouse_fields()), vec![])
            .await
            .unwrap();
        assert!(created.warehouse_id.starts_with("WH-"));
        assert!(
            seen.insert(created.warehouse_id.clone()),
            "duplicate warehouse_id {}",
            created.warehouse_id
        );
    }
}

#[tokio::test]
async fn search_filters_combine_conjunctively() {
    let svc = service().await;
    svc.create(form(&valid_warehouse_fields()), vec![])
        .await
        .unwrap();

    let mut other = valid_warehouse_fields();
    other.retain(|(name, _)| !matches!(*name, "warehouse_name" | "state" | "city"));
    other.push(("warehouse_name", "Beta Logistics"));
    other.push(("state", "Maharashtra"));
    other.push(("city", "Pune"));
    svc.create(form(&other), vec![]).await.unwrap();

    // Case-insensitive exact state match.
    let page = svc
        .search(
            SearchFilter {
                state: Some("gujarat".to_string()),
                ..Default::default()
            },
            1,
            7,
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].state, "Gujarat");

    // Substring city match.
    let page = svc
        .search(
            SearchFilter {
                city: Some("ahmed".to_string()),
                ..Default::default()
            },
            1,
            7,
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    // Free-text hits the name column regardless of case.
    let page = svc
        .search(
            SearchFilter {
                q: Some("STORAGE".to_string()),
                ..Default::default()
            },
            1,
            7,
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].warehouse_name, "Alpha Storage");

    // Conjunction across filters can exclude everything.
    let page = svc
        .search(
            SearchFilter {
                q: Some("storage".to_string()),
                state: Some("Maharashtra".to_string()),
                city: None,
            },
            1,
            7,
        )
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert!(page.rows.is_empty());
}

#[tokio::test]
async fn update_is_partial_and_preserves_untouched_slots() {
    let svc = service().await;
    let created = svc
        .create(
            form(&valid_warehouse_fields()),
            vec![
                "/uploads/warehouses/front.png".to_string(),
                "/uploads/warehouses/docks.png".to_string(),
            ],
        )
        .await
        .unwrap();

    // No new uploads: the existing slots survive verbatim.
    let updated = svc
        .update(created.id, form(&[("city", "Surat")]), vec![])
        .await
        .unwrap();
    assert_eq!(updated.city, "Surat");
    assert_eq!(updated.state, "Gujarat");
    assert_eq!(updated.warehouse_images, created.warehouse_images);

    // One new upload replaces slot 0 only.
    let updated = svc
        .update(
            created.id,
            WarehouseForm::default(),
            vec!["/uploads/warehouses/front-v2.png".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(updated.warehouse_images.0[0], "/uploads/warehouses/front-v2.png");
    assert_eq!(updated.warehouse_images.0[1], "/uploads/warehouses/docks.png");
    assert_eq!(updated.warehouse_images.0[2], "");
}

#[tokio::test]
async fn soft_delete_hides_row_from_all_reads() {
    let svc = service().await;
    let created = svc
        .create(form(&valid_warehouse_fields()), vec![])
        .await
        .unwrap();

    svc.soft_delete(created.id).await.unwrap();

    let err = svc.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Warehouse not found"));

    let page = svc.list(1, 7).await.unwrap();
    assert_eq!(page.total, 0);

    let page = svc
        .search(
            SearchFilter {
                state: Some("Gujarat".to_string()),
                ..Default::default()
            },
            1,
            7,
        )
        .await
        .unwrap();
    assert_eq!(page.total, 0);

    // A second delete sees nothing to delete.
    let err = svc.soft_delete(created.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn set_status_toggles_and_validates() {
    let svc = service().await;
    let created = svc
        .create(form(&valid_warehouse_fields()), vec![])
        .await
        .unwrap();

    let published = svc.set_status(created.id, "publish").await.unwrap();
    assert_eq!(published.status, WarehouseStatus::Publish);

    let unpublished = svc.set_status(created.id, "unpublish").await.unwrap();
    assert_eq!(unpublished.status, WarehouseStatus::Unpublish);

    // Soft-delete cannot be reached through the status endpoint.
    let err = svc.set_status(created.id, "in_active").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m == "Invalid status value"));

    let err = svc.set_status(created.id, "archived").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = svc.set_status(9999, "publish").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn pagination_totals_and_overflow_pages() {
    let svc = service().await;
    for i in 0..10 {
        let mut fields = valid_warehouse_fields();
        fields.retain(|(name, _)| *name != "warehouse_name");
        let name = format!("Warehouse {i}");
        let mut form = form(&fields);
        form.set_field("warehouse_name", name);
        svc.create(form, vec![]).await.unwrap();
    }

    let first = svc.list(1, 7).await.unwrap();
    assert_eq!(first.rows.len(), 7);
    assert_eq!(first.total, 10);
    assert_eq!(first.total_pages, 2);
    // Newest first.
    assert_eq!(first.rows[0].warehouse_name, "Warehouse 9");

    let second = svc.list(2, 7).await.unwrap();
    assert_eq!(second.rows.len(), 3);
    assert_eq!(second.rows.last().unwrap().warehouse_name, "Warehouse 0");

    // Past the end: empty rows, unchanged totals.
    let third = svc.list(3, 7).await.unwrap();
    assert!(third.rows.is_empty());
    assert_eq!(third.total, 10);
    assert_eq!(third.total_pages, 2);

    // Page zero clamps to page one.
    let clamped = svc.list(0, 7).await.unwrap();
    assert_eq!(clamped.rows.len(), 7);
}
