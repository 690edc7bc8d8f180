use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{Order, OrderStatus, SortField, StatusFilter, TableQuery},
};

/// Views
///
/// The compiled page templates. Templates are embedded in the binary and rendered with
/// HTML auto-escaping (every template name ends in `.html`).
#[derive(Clone)]
pub struct Views {
    env: Arc<Environment<'static>>,
}

impl Views {
    /// Compiles every page template. Fails on a syntax error in any of them.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("dashboard.html", include_str!("../templates/dashboard.html"))?;
        env.add_template("home.html", include_str!("../templates/home.html"))?;
        env.add_template("orders.html", include_str!("../templates/orders.html"))?;
        env.add_template("signin.html", include_str!("../templates/signin.html"))?;
        env.add_template("auth_error.html", include_str!("../templates/auth_error.html"))?;

        Ok(Self { env: Arc::new(env) })
    }

    pub fn render<C: Serialize>(&self, name: &str, ctx: C) -> Result<Html<String>, AppError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

// --- View Models ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Dashboard navigation with the entry for `current_path` marked active.
pub fn navigation(current_path: &str) -> Vec<NavItem> {
    [("Home", "/dashboard"), ("Orders", "/dashboard/orders")]
        .into_iter()
        .map(|(name, href)| NavItem {
            name,
            href,
            active: current_path == href,
        })
        .collect()
}

/// A sortable column header. `href` applies the header's click behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    pub key: &'static str,
    pub title: &'static str,
    pub href: String,
    /// `↑` / `↓` on the active column.
    pub arrow: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub pizza_type: String,
    pub quantity: u32,
    pub order_date: String,
    pub status: &'static str,
    pub badge_class: &'static str,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            customer_name: order.customer_name.clone(),
            pizza_type: order.pizza_type.clone(),
            quantity: order.quantity,
            order_date: order.order_date_display(),
            status: order.status.label(),
            badge_class: order.status.badge_class(),
        }
    }
}

/// OrdersTable
///
/// Everything the orders page renders: filter options, column headers and rows. The hidden
/// `sort` / `dir` values keep the current ordering when the filter form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrdersTable {
    pub sort: &'static str,
    pub dir: &'static str,
    pub status_options: Vec<StatusOption>,
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<OrderRow>,
}

/// Builds the orders page view from already sorted and filtered rows.
pub fn orders_table(rows: &[Order], query: TableQuery) -> OrdersTable {
    let mut status_options = vec![StatusOption {
        value: StatusFilter::All.slug(),
        label: "All Statuses",
        selected: query.status == StatusFilter::All,
    }];
    status_options.extend(OrderStatus::ALL.into_iter().map(|status| StatusOption {
        value: status.slug(),
        label: status.label(),
        selected: query.status == StatusFilter::Only(status),
    }));

    let columns = SortField::ALL
        .into_iter()
        .map(|field| ColumnHeader {
            key: field.as_str(),
            title: field.title(),
            href: format!("/dashboard/orders{}", query.toggled(field).to_query_string()),
            arrow: (field == query.sort).then_some(query.direction.arrow()),
        })
        .collect();

    OrdersTable {
        sort: query.sort.as_str(),
        dir: query.direction.as_str(),
        status_options,
        columns,
        rows: rows.iter().map(OrderRow::from).collect(),
    }
}
