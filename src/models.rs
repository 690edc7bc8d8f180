use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

// --- Core Records ---

/// Order
///
/// A single pizza order as shown in the dashboard table. Records come from a fixed data
/// set and are never mutated. Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(example = "PZA001")]
    pub id: String,
    pub customer_name: String,
    pub pizza_type: String,
    pub quantity: u32,
    /// Minute-precision local timestamp, `YYYY-MM-DD HH:MM`.
    #[serde(with = "order_date_format")]
    #[schema(value_type = String, example = "2024-03-23 14:30")]
    #[ts(type = "string")]
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
}

impl Order {
    /// The timestamp rendered the same way as on the wire.
    pub fn order_date_display(&self) -> String {
        self.order_date.format(order_date_format::FORMAT).to_string()
    }
}

/// Serde adapter for the `YYYY-MM-DD HH:MM` timestamp format.
pub mod order_date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// OrderStatus
///
/// Lifecycle label of an order. The JSON form is the human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    Preparing,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Filter dropdown order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// URL-safe form used in query strings.
    pub fn slug(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Style classes of the status badge in the orders table.
    pub fn badge_class(self) -> &'static str {
        match self {
            OrderStatus::Pending => "bg-yellow-100 text-yellow-800",
            OrderStatus::Preparing => "bg-blue-100 text-blue-800",
            OrderStatus::OutForDelivery => "bg-purple-100 text-purple-800",
            OrderStatus::Delivered => "bg-green-100 text-green-800",
            OrderStatus::Cancelled => "bg-red-100 text-red-800",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a status filter value names no known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    /// Accepts either the slug or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| {
                status.slug().eq_ignore_ascii_case(wanted)
                    || status.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

// --- Table State ---

/// StatusFilter
///
/// Which orders the table shows. Parsed from `all`, a status slug or a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => order.status == status,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.slug(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.slug().to_string()
    }
}

/// SortField
///
/// Sortable table columns, named after the order's JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    CustomerName,
    PizzaType,
    Quantity,
    OrderDate,
    Status,
}

impl SortField {
    /// Column order of the orders table.
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::CustomerName,
        SortField::PizzaType,
        SortField::Quantity,
        SortField::OrderDate,
        SortField::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::CustomerName => "customerName",
            SortField::PizzaType => "pizzaType",
            SortField::Quantity => "quantity",
            SortField::OrderDate => "orderDate",
            SortField::Status => "status",
        }
    }

    /// Column header text.
    pub fn title(self) -> &'static str {
        match self {
            SortField::Id => "Order ID",
            SortField::CustomerName => "Customer Name",
            SortField::PizzaType => "Pizza Type",
            SortField::Quantity => "Quantity",
            SortField::OrderDate => "Order Date",
            SortField::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Indicator shown next to the active column header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// TableQuery
///
/// Query parameters of the orders table and the order listing endpoint
/// (`?sort=&dir=&status=`). Missing parameters fall back to newest-first, all statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct TableQuery {
    /// Column to sort by.
    #[param(value_type = Option<SortField>)]
    pub sort: SortField,
    /// Sort direction.
    #[serde(rename = "dir")]
    #[param(value_type = Option<SortDirection>)]
    pub direction: SortDirection,
    /// `all`, a status slug such as `out-for-delivery`, or a status label.
    #[param(value_type = Option<String>, example = "delivered")]
    pub status: StatusFilter,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            sort: SortField::OrderDate,
            direction: SortDirection::Desc,
            status: StatusFilter::All,
        }
    }
}

impl TableQuery {
    /// The table state after clicking the header of `field`: the active column flips its
    /// direction, any other column becomes active in ascending order.
    pub fn toggled(self, field: SortField) -> Self {
        let direction = if field == self.sort {
            self.direction.flipped()
        } else {
            SortDirection::Asc
        };
        Self {
            sort: field,
            direction,
            ..self
        }
    }

    pub fn with_status(self, status: StatusFilter) -> Self {
        Self { status, ..self }
    }

    /// Renders the state as a query string, including the leading `?`.
    pub fn to_query_string(self) -> String {
        format!(
            "?sort={}&dir={}&status={}",
            self.sort.as_str(),
            self.direction.as_str(),
            self.status.slug()
        )
    }
}

// --- Session Schemas (Output) ---

/// SessionProfile
///
/// The signed-in user as resolved from the identity provider's session (GET /api/me).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SessionProfile {
    /// Provider-assigned subject identifier.
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Avatar URL supplied by the provider.
    pub image: Option<String>,
}
