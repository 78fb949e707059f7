// Service-level tests for tax rate CRUD semantics: creation defaults,
// partial updates, no-op write elision, the force-delete protocol, and
// collection filtering with predicate-consistent totals.

use std::sync::atomic::Ordering;

use ratebook::core::AppError;
use ratebook::modules::tax_rates::models::{
    ListTaxRatesQuery, OrderBy, SortOrder, UpsertTaxRateRequest,
};

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::{test_service, TestDataFactory};

#[tokio::test]
async fn test_create_then_fetch_round_trips_submitted_fields() {
    let (service, _) = test_service();

    let created = service
        .create(TestDataFactory::us_rate_request())
        .await
        .unwrap();

    assert_eq!(created.country, "US");
    assert_eq!(created.rate, "7.5");
    assert_eq!(created.name, "US-TAX");
    // Declared defaults applied where omitted
    assert_eq!(created.class, "standard");
    assert_eq!(created.priority, 1);
    assert!(created.shipping);
    assert!(!created.compound);
    assert_eq!(created.order, 0);
    assert_eq!(created.state, "");
    assert_eq!(created.postcode, "");
    assert_eq!(created.city, "");

    let fetched = service.get(created.id).await.unwrap();
    assert_eq!(fetched.country, created.country);
    assert_eq!(fetched.rate, created.rate);
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.class, created.class);
}

#[tokio::test]
async fn test_create_with_supplied_id_is_a_conflict() {
    let (service, _) = test_service();

    let request = UpsertTaxRateRequest {
        id: Some(42),
        ..TestDataFactory::us_rate_request()
    };

    let err = service.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::ResourceExists(_)));
}

#[tokio::test]
async fn test_standard_class_is_stored_empty_but_round_trips() {
    let (service, rates) = test_service();

    let request = UpsertTaxRateRequest {
        class: Some("standard".to_string()),
        ..TestDataFactory::us_rate_request()
    };
    let created = service.create(request).await.unwrap();

    assert_eq!(created.class, "standard");
    assert_eq!(rates.stored(created.id).unwrap().class, "");

    let fetched = service.get(created.id).await.unwrap();
    assert_eq!(fetched.class, "standard");
}

#[tokio::test]
async fn test_known_class_is_slug_normalized() {
    let (service, rates) = test_service();

    let request = UpsertTaxRateRequest {
        class: Some("Reduced Rate".to_string()),
        ..TestDataFactory::us_rate_request()
    };
    let created = service.create(request).await.unwrap();

    assert_eq!(created.class, "reduced-rate");
    assert_eq!(rates.stored(created.id).unwrap().class, "reduced-rate");
}

#[tokio::test]
async fn test_unknown_class_is_rejected() {
    let (service, _) = test_service();

    let request = UpsertTaxRateRequest {
        class: Some("luxury".to_string()),
        ..TestDataFactory::us_rate_request()
    };

    let err = service.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidParam(_)));
}

#[tokio::test]
async fn test_non_decimal_rate_is_rejected() {
    let (service, _) = test_service();

    let request = UpsertTaxRateRequest {
        rate: Some("seven".to_string()),
        ..Default::default()
    };

    let err = service.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidParam(_)));

    let request = UpsertTaxRateRequest {
        rate: Some("-1".to_string()),
        ..Default::default()
    };
    assert!(service.create(request).await.is_err());
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields_unchanged() {
    let (service, _) = test_service();

    let created = service
        .create(TestDataFactory::us_rate_request())
        .await
        .unwrap();

    let update = UpsertTaxRateRequest {
        rate: Some("8.0".to_string()),
        ..Default::default()
    };
    let updated = service.update(created.id, update).await.unwrap();

    assert_eq!(updated.rate, "8.0");
    assert_eq!(updated.country, "US");
    assert_eq!(updated.name, "US-TAX");
    assert_eq!(updated.class, "standard");
}

#[tokio::test]
async fn test_update_with_identical_values_issues_no_write() {
    let (service, rates) = test_service();

    let created = service
        .create(TestDataFactory::us_rate_request())
        .await
        .unwrap();
    assert_eq!(rates.update_calls.load(Ordering::SeqCst), 0);

    // Same values as stored: the change set is empty
    let noop = service
        .update(created.id, TestDataFactory::us_rate_request())
        .await
        .unwrap();
    assert_eq!(rates.update_calls.load(Ordering::SeqCst), 0);
    assert_eq!(noop.rate, "7.5");

    // A genuinely different value does write
    let update = UpsertTaxRateRequest {
        rate: Some("8.0".to_string()),
        ..Default::default()
    };
    service.update(created.id, update).await.unwrap();
    assert_eq!(rates.update_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_update_missing_rate_is_not_found() {
    let (service, _) = test_service();

    let err = service
        .update(999, TestDataFactory::us_rate_request())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidId(_)));
}

#[tokio::test]
async fn test_postcode_and_city_become_locale_rows() {
    let (service, _) = test_service();

    let created = service
        .create(TestDataFactory::full_rate_request())
        .await
        .unwrap();
    assert_eq!(created.postcode, "SW1A 1AA");
    assert_eq!(created.city, "London");

    // New postcode replaces the prior row; city is untouched
    let update = UpsertTaxRateRequest {
        postcode: Some("EC1A 1BB".to_string()),
        ..Default::default()
    };
    let updated = service.update(created.id, update).await.unwrap();
    assert_eq!(updated.postcode, "EC1A 1BB");
    assert_eq!(updated.city, "London");
}

#[tokio::test]
async fn test_delete_without_force_is_rejected_and_rate_survives() {
    let (service, _) = test_service();

    let created = service
        .create(TestDataFactory::us_rate_request())
        .await
        .unwrap();

    let err = service.delete(created.id, false).await.unwrap_err();
    assert!(matches!(err, AppError::TrashNotSupported(_)));

    // Still retrievable afterwards
    assert!(service.get(created.id).await.is_ok());
}

#[tokio::test]
async fn test_delete_with_force_removes_the_rate() {
    let (service, _) = test_service();

    let created = service
        .create(TestDataFactory::us_rate_request())
        .await
        .unwrap();

    let deleted = service.delete(created.id, true).await.unwrap();
    assert_eq!(deleted.id, created.id);
    assert_eq!(deleted.rate, "7.5");

    let err = service.get(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidId(_)));
}

#[tokio::test]
async fn test_delete_affecting_zero_rows_is_an_internal_failure() {
    let (service, rates) = test_service();

    let created = service
        .create(TestDataFactory::us_rate_request())
        .await
        .unwrap();

    rates.fail_deletes.store(true, Ordering::SeqCst);

    let err = service.delete(created.id, true).await.unwrap_err();
    assert!(matches!(err, AppError::CannotDelete(_)));
}

#[tokio::test]
async fn test_delete_missing_rate_is_not_found() {
    let (service, _) = test_service();

    let err = service.delete(999, true).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidId(_)));
}

async fn seed_five_rates(service: &ratebook::modules::tax_rates::services::TaxRateService) {
    for i in 1..=5u32 {
        let request = UpsertTaxRateRequest {
            country: Some("US".to_string()),
            state: Some(format!("S{i}")),
            rate: Some(format!("{i}.0")),
            name: Some(format!("RATE-{i}")),
            order: Some(10 - i),
            ..Default::default()
        };
        service.create(request).await.unwrap();
    }
}

#[tokio::test]
async fn test_list_total_is_counted_without_pagination() {
    let (service, _) = test_service();
    seed_five_rates(&service).await;

    let query = ListTaxRatesQuery {
        page: 2,
        per_page: 2,
        orderby: OrderBy::Id,
        ..Default::default()
    };
    let listing = service.list(query).await.unwrap();

    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.total, 5);
    assert_eq!(listing.total_pages, 3);
    // Second page of an id-ordered listing
    assert_eq!(listing.items[0].name, "RATE-3");
    assert_eq!(listing.items[1].name, "RATE-4");
}

#[tokio::test]
async fn test_list_orders_by_id_descending() {
    let (service, _) = test_service();
    seed_five_rates(&service).await;

    let query = ListTaxRatesQuery {
        orderby: OrderBy::Id,
        order: SortOrder::Desc,
        ..Default::default()
    };
    let listing = service.list(query).await.unwrap();

    assert_eq!(listing.items[0].name, "RATE-5");
    assert_eq!(listing.items[4].name, "RATE-1");
}

#[tokio::test]
async fn test_list_default_order_uses_the_order_field() {
    let (service, _) = test_service();
    seed_five_rates(&service).await;

    // order values run 9,8,7,6,5 for rates 1..=5
    let listing = service.list(ListTaxRatesQuery::default()).await.unwrap();
    assert_eq!(listing.items[0].name, "RATE-5");
    assert_eq!(listing.items[4].name, "RATE-1");
}

#[tokio::test]
async fn test_list_explicit_offset_beats_page_offset() {
    let (service, _) = test_service();
    seed_five_rates(&service).await;

    let query = ListTaxRatesQuery {
        page: 1,
        per_page: 2,
        offset: Some(3),
        orderby: OrderBy::Id,
        ..Default::default()
    };
    let listing = service.list(query).await.unwrap();

    assert_eq!(listing.items[0].name, "RATE-4");
    assert_eq!(listing.total, 5);
}

#[tokio::test]
async fn test_list_filters_by_class() {
    let (service, _) = test_service();
    seed_five_rates(&service).await;

    let reduced = UpsertTaxRateRequest {
        name: Some("REDUCED".to_string()),
        rate: Some("5.0".to_string()),
        class: Some("reduced-rate".to_string()),
        ..Default::default()
    };
    service.create(reduced).await.unwrap();

    let query = ListTaxRatesQuery {
        class: Some("reduced-rate".to_string()),
        ..Default::default()
    };
    let listing = service.list(query).await.unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].name, "REDUCED");

    // "standard" filters on the empty storage class
    let query = ListTaxRatesQuery {
        class: Some("standard".to_string()),
        ..Default::default()
    };
    assert_eq!(service.list(query).await.unwrap().total, 5);

    let query = ListTaxRatesQuery {
        class: Some("luxury".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.list(query).await.unwrap_err(),
        AppError::InvalidParam(_)
    ));
}

#[tokio::test]
async fn test_list_filters_by_code_substring() {
    let (service, _) = test_service();
    seed_five_rates(&service).await;

    let query = ListTaxRatesQuery {
        code: Some("RATE-3".to_string()),
        ..Default::default()
    };
    let listing = service.list(query).await.unwrap();

    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].name, "RATE-3");
}

#[tokio::test]
async fn test_list_restricts_to_included_ids() {
    let (service, _) = test_service();
    seed_five_rates(&service).await;

    let query = ListTaxRatesQuery {
        include: vec![2, 4],
        orderby: OrderBy::Id,
        ..Default::default()
    };
    let listing = service.list(query).await.unwrap();

    assert_eq!(listing.total, 2);
    assert_eq!(listing.items[0].id, 2);
    assert_eq!(listing.items[1].id, 4);
}

#[tokio::test]
async fn test_list_rejects_out_of_range_per_page() {
    let (service, _) = test_service();

    let query = ListTaxRatesQuery {
        per_page: 0,
        ..Default::default()
    };
    assert!(matches!(
        service.list(query).await.unwrap_err(),
        AppError::InvalidParam(_)
    ));

    let query = ListTaxRatesQuery {
        per_page: 101,
        ..Default::default()
    };
    assert!(service.list(query).await.is_err());
}

#[tokio::test]
async fn test_field_extensions_merge_extra_properties() {
    use ratebook::modules::tax_rates::models::TaxRate;
    use ratebook::modules::tax_rates::services::{FieldExtension, TaxRateService};
    use std::sync::Arc;

    struct CodeExtension;

    impl FieldExtension for CodeExtension {
        fn extend(&self, rate: &TaxRate) -> serde_json::Map<String, serde_json::Value> {
            let mut extra = serde_json::Map::new();
            extra.insert("tax_code".to_string(), rate.code().into());
            extra
        }
    }

    let rates = Arc::new(helpers::MemoryTaxRateRepository::new());
    let classes = Arc::new(helpers::MemoryTaxClassRepository::default());
    let service = TaxRateService::new(rates, classes, helpers::TEST_BASE_URL)
        .with_extension(Arc::new(CodeExtension));

    let created = service
        .create(TestDataFactory::us_rate_request())
        .await
        .unwrap();

    assert_eq!(
        created.extra.get("tax_code").and_then(|v| v.as_str()),
        Some("US-US-TAX-1")
    );

    let json = serde_json::to_value(&created).unwrap();
    assert_eq!(json["tax_code"], "US-US-TAX-1");
}

#[tokio::test]
async fn test_schema_enumerates_known_classes() {
    let (service, _) = test_service();

    let descriptor = service.describe_schema().await.unwrap();
    let class_enum = descriptor["schema"]["properties"]["class"]["enum"]
        .as_array()
        .unwrap();

    let values: Vec<&str> = class_enum.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(values, vec!["standard", "reduced-rate", "zero-rate"]);
}
