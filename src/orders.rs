use std::cmp::Ordering;

use crate::models::{Order, SortDirection, SortField, TableQuery};

/// sort_and_filter
///
/// Produces the rows of the orders table: orders matching the status filter, ordered by
/// the selected column. The sort is stable, so rows that compare equal keep their
/// data-set order in either direction. The input slice is left untouched.
pub fn sort_and_filter(orders: &[Order], query: &TableQuery) -> Vec<Order> {
    let mut rows: Vec<Order> = orders
        .iter()
        .filter(|order| query.status.matches(order))
        .cloned()
        .collect();

    rows.sort_by(|a, b| {
        let ordering = compare_by(query.sort, a, b);
        match query.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    rows
}

/// Ascending comparison of two orders on one column.
///
/// Text columns compare lexicographically, quantity numerically and the order date
/// chronologically. Status compares by its display label.
pub fn compare_by(field: SortField, a: &Order, b: &Order) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::CustomerName => a.customer_name.cmp(&b.customer_name),
        SortField::PizzaType => a.pizza_type.cmp(&b.pizza_type),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::OrderDate => a.order_date.cmp(&b.order_date),
        SortField::Status => a.status.label().cmp(b.status.label()),
    }
}
