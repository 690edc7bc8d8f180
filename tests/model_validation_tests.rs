use pizza_dashboard::{
    models::{Order, OrderStatus, SessionProfile, SortField, StatusFilter},
    repository::{OrderRepository, StaticOrderRepository},
};
use serde_json::json;

// --- Tests ---

#[tokio::test]
async fn test_order_json_shape() {
    let order = StaticOrderRepository::new()
        .get_order("PZA003")
        .await
        .unwrap();

    let value = serde_json::to_value(&order).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "PZA003",
            "customerName": "Bob Johnson",
            "pizzaType": "Veggie Supreme",
            "quantity": 3,
            "orderDate": "2024-03-23 16:15",
            "status": "Out for Delivery",
        })
    );
}

#[test]
fn test_order_deserializes_from_display_format() {
    let order: Order = serde_json::from_value(json!({
        "id": "PZA900",
        "customerName": "Ada",
        "pizzaType": "Hawaiian",
        "quantity": 4,
        "orderDate": "2024-12-31 23:59",
        "status": "Pending",
    }))
    .unwrap();

    assert_eq!(order.order_date_display(), "2024-12-31 23:59");
    assert_eq!(order.status, OrderStatus::Pending);
}

#[test]
fn test_order_rejects_malformed_date() {
    let result: Result<Order, _> = serde_json::from_value(json!({
        "id": "PZA901",
        "customerName": "Ada",
        "pizzaType": "Hawaiian",
        "quantity": 1,
        "orderDate": "yesterday",
        "status": "Pending",
    }));
    assert!(result.is_err());
}

#[test]
fn test_status_badges_are_distinct() {
    let classes: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.badge_class()).collect();
    assert_eq!(classes[0], "bg-yellow-100 text-yellow-800");
    assert_eq!(classes[2], "bg-purple-100 text-purple-800");

    let mut unique = classes.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), classes.len());
}

#[test]
fn test_sort_field_uses_record_key_names() {
    assert_eq!(
        serde_json::to_value(SortField::CustomerName).unwrap(),
        json!("customerName")
    );
    let field: SortField = serde_json::from_value(json!("orderDate")).unwrap();
    assert_eq!(field, SortField::OrderDate);
}

#[test]
fn test_status_filter_serializes_as_slug() {
    assert_eq!(
        serde_json::to_value(StatusFilter::Only(OrderStatus::OutForDelivery)).unwrap(),
        json!("out-for-delivery")
    );
    let filter: StatusFilter = serde_json::from_value(json!("Delivered")).unwrap();
    assert_eq!(filter, StatusFilter::Only(OrderStatus::Delivered));
}

#[test]
fn test_session_profile_omits_nothing() {
    let profile = SessionProfile {
        id: "sub-1".to_string(),
        name: Some("Pat".to_string()),
        email: None,
        image: None,
    };
    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(
        value,
        json!({ "id": "sub-1", "name": "Pat", "email": null, "image": null })
    );
}
