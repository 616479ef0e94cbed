use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Inclusive date range for the dashboard queries. The original system
/// defaulted to a wide fixed window when the caller omitted the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const DEFAULT_START: &'static str = "2024-01-01";
    pub const DEFAULT_END: &'static str = "2025-12-31";

    /// Parse optional ISO date strings, falling back to the default window.
    /// Returns the offending input on parse failure.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, String> {
        let parse_one = |value: &str| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date: {value}"))
        };
        let start = parse_one(start.unwrap_or(Self::DEFAULT_START))?;
        let end = parse_one(end.unwrap_or(Self::DEFAULT_END))?;
        Ok(DateRange { start, end })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesSummaryRow {
    pub sale_date: NaiveDate,
    pub sales_count: i64,
    #[schema(value_type = String)]
    pub daily_revenue: BigDecimal,
    #[schema(value_type = String)]
    pub avg_order_value: BigDecimal,
    pub delivered_count: i64,
    pub pending_count: i64,
    pub cancelled_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopProductRow {
    pub product_id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub stock_quantity: i32,
    pub category: String,
    pub total_sold: i64,
    #[schema(value_type = String)]
    pub total_revenue: BigDecimal,
    pub order_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RepPerformanceRow {
    pub staff_id: i32,
    pub name: String,
    pub sales_count: i64,
    #[schema(value_type = String)]
    pub total_revenue: BigDecimal,
    #[schema(value_type = String)]
    pub avg_sale_amount: BigDecimal,
    pub unique_customers: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerInsightRow {
    pub customer_id: String,
    pub customer_name: String,
    pub total_orders: i64,
    #[schema(value_type = String)]
    pub total_spent: BigDecimal,
    #[schema(value_type = String)]
    pub avg_order_value: BigDecimal,
    pub last_order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryStatusRow {
    pub product_id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub stock_quantity: i32,
    pub category: String,
    pub stock_status: String,
    pub total_sold_all_time: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyTrendRow {
    pub year: i32,
    pub month: i32,
    pub sales_count: i64,
    #[schema(value_type = String)]
    pub monthly_revenue: BigDecimal,
    #[schema(value_type = String)]
    pub avg_order_value: BigDecimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusTrendRow {
    pub status: String,
    pub count: i64,
    #[schema(value_type = String)]
    pub revenue: BigDecimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesTrends {
    pub monthly_trends: Vec<MonthlyTrendRow>,
    pub status_trends: Vec<StatusTrendRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesTotals {
    pub total_sales: i64,
    pub delivered_sales: i64,
    pub pending_sales: i64,
    pub cancelled_sales: i64,
    #[schema(value_type = String)]
    pub total_revenue: BigDecimal,
    #[schema(value_type = String)]
    pub avg_order_value: BigDecimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductTotals {
    pub total_products: i64,
    pub in_stock_products: i64,
    pub out_of_stock_products: i64,
    pub low_stock_products: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerTotals {
    pub total_customers: i64,
    pub active_customers: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StaffTotals {
    pub total_sales_reps: i64,
    pub active_sales_reps: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentSale {
    pub sale_id: i32,
    pub order_ref: String,
    pub sale_date: DateTime<Utc>,
    pub status: String,
    #[schema(value_type = String)]
    pub total_price: BigDecimal,
    pub customer_name: String,
    pub sales_rep_name: String,
}

/// Combined payload for the bare `GET /dashboard` route.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub sales: SalesTotals,
    pub products: ProductTotals,
    pub customers: CustomerTotals,
    pub sales_reps: StaffTotals,
    pub recent_sales: Vec<RecentSale>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_to_wide_window() {
        let range = DateRange::parse(None, None).expect("defaults should parse");
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn parse_accepts_iso_dates() {
        let range = DateRange::parse(Some("2025-03-01"), Some("2025-03-31")).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = DateRange::parse(Some("03/01/2025"), None).unwrap_err();
        assert_eq!(err, "Invalid date: 03/01/2025");
        assert!(DateRange::parse(None, Some("2025-13-99")).is_err());
    }
}
