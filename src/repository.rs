use crate::models::{Order, OrderStatus};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// OrderRepository
///
/// Abstract source of order records. Handlers only see this trait, so tests can swap the
/// static data set for a mock.
///
/// **Send + Sync + async_trait** make the trait object (`Arc<dyn OrderRepository>`)
/// shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Every order, in data-set order.
    async fn list_orders(&self) -> Vec<Order>;
    async fn get_order(&self, id: &str) -> Option<Order>;
}

/// RepositoryState
///
/// The concrete type used to share the order source across the application state.
pub type RepositoryState = Arc<dyn OrderRepository>;

/// StaticOrderRepository
///
/// Serves the fixed set of five orders. Nothing is persisted and nothing is ever mutated.
pub struct StaticOrderRepository {
    orders: Vec<Order>,
}

impl StaticOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: seed_orders(),
        }
    }
}

impl Default for StaticOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for StaticOrderRepository {
    async fn list_orders(&self) -> Vec<Order> {
        self.orders.clone()
    }

    async fn get_order(&self, id: &str) -> Option<Order> {
        self.orders.iter().find(|order| order.id == id).cloned()
    }
}

fn order(
    id: &str,
    customer_name: &str,
    pizza_type: &str,
    quantity: u32,
    order_date: NaiveDateTime,
    status: OrderStatus,
) -> Order {
    Order {
        id: id.to_string(),
        customer_name: customer_name.to_string(),
        pizza_type: pizza_type.to_string(),
        quantity,
        order_date,
        status,
    }
}

/// 23 March 2024 at `hour:minute`.
fn on_order_day(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 23)
        .and_then(|day| day.and_hms_opt(hour, minute, 0))
        .expect("FATAL: seeded order timestamp is not a valid date")
}

fn seed_orders() -> Vec<Order> {
    vec![
        order(
            "PZA001",
            "John Doe",
            "Margherita",
            2,
            on_order_day(14, 30),
            OrderStatus::Delivered,
        ),
        order(
            "PZA002",
            "Jane Smith",
            "Pepperoni",
            1,
            on_order_day(15, 45),
            OrderStatus::Preparing,
        ),
        order(
            "PZA003",
            "Bob Johnson",
            "Veggie Supreme",
            3,
            on_order_day(16, 15),
            OrderStatus::OutForDelivery,
        ),
        order(
            "PZA004",
            "Alice Brown",
            "Margherita",
            1,
            on_order_day(17, 0),
            OrderStatus::Pending,
        ),
        order(
            "PZA005",
            "Charlie Wilson",
            "Pepperoni",
            2,
            on_order_day(17, 30),
            OrderStatus::Cancelled,
        ),
    ]
}
