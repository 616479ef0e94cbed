//! Read-only dashboard aggregations over the catalog store. These queries
//! group and window in ways the diesel DSL does not express cleanly, so they
//! use `sql_query` with typed row structs.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Integer, Numeric, Nullable, Text, Timestamptz};

use crate::db::DbPool;
use crate::domain::dashboard::{
    CustomerInsightRow, CustomerTotals, DashboardSummary, DateRange, InventoryStatusRow,
    MonthlyTrendRow, ProductTotals, RecentSale, RepPerformanceRow, SalesSummaryRow, SalesTotals,
    SalesTrends, StaffTotals, StatusTrendRow, TopProductRow,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::DashboardQueries;

pub struct DieselDashboard {
    pool: DbPool,
}

impl DieselDashboard {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(QueryableByName)]
struct SalesSummarySqlRow {
    #[diesel(sql_type = Date)]
    sale_date: NaiveDate,
    #[diesel(sql_type = BigInt)]
    sales_count: i64,
    #[diesel(sql_type = Numeric)]
    daily_revenue: BigDecimal,
    #[diesel(sql_type = Numeric)]
    avg_order_value: BigDecimal,
    #[diesel(sql_type = BigInt)]
    delivered_count: i64,
    #[diesel(sql_type = BigInt)]
    pending_count: i64,
    #[diesel(sql_type = BigInt)]
    cancelled_count: i64,
}

#[derive(QueryableByName)]
struct TopProductSqlRow {
    #[diesel(sql_type = Integer)]
    product_id: i32,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Numeric)]
    price: BigDecimal,
    #[diesel(sql_type = Integer)]
    stock_quantity: i32,
    #[diesel(sql_type = Text)]
    category: String,
    #[diesel(sql_type = BigInt)]
    total_sold: i64,
    #[diesel(sql_type = Numeric)]
    total_revenue: BigDecimal,
    #[diesel(sql_type = BigInt)]
    order_count: i64,
}

#[derive(QueryableByName)]
struct RepPerformanceSqlRow {
    #[diesel(sql_type = Integer)]
    staff_id: i32,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = BigInt)]
    sales_count: i64,
    #[diesel(sql_type = Numeric)]
    total_revenue: BigDecimal,
    #[diesel(sql_type = Numeric)]
    avg_sale_amount: BigDecimal,
    #[diesel(sql_type = BigInt)]
    unique_customers: i64,
}

#[derive(QueryableByName)]
struct CustomerInsightSqlRow {
    #[diesel(sql_type = Text)]
    customer_id: String,
    #[diesel(sql_type = Text)]
    customer_name: String,
    #[diesel(sql_type = BigInt)]
    total_orders: i64,
    #[diesel(sql_type = Numeric)]
    total_spent: BigDecimal,
    #[diesel(sql_type = Numeric)]
    avg_order_value: BigDecimal,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    last_order_date: Option<DateTime<Utc>>,
}

#[derive(QueryableByName)]
struct InventoryStatusSqlRow {
    #[diesel(sql_type = Integer)]
    product_id: i32,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Numeric)]
    price: BigDecimal,
    #[diesel(sql_type = Integer)]
    stock_quantity: i32,
    #[diesel(sql_type = Text)]
    category: String,
    #[diesel(sql_type = Text)]
    stock_status: String,
    #[diesel(sql_type = BigInt)]
    total_sold_all_time: i64,
}

#[derive(QueryableByName)]
struct MonthlyTrendSqlRow {
    #[diesel(sql_type = Integer)]
    year: i32,
    #[diesel(sql_type = Integer)]
    month: i32,
    #[diesel(sql_type = BigInt)]
    sales_count: i64,
    #[diesel(sql_type = Numeric)]
    monthly_revenue: BigDecimal,
    #[diesel(sql_type = Numeric)]
    avg_order_value: BigDecimal,
}

#[derive(QueryableByName)]
struct StatusTrendSqlRow {
    #[diesel(sql_type = Text)]
    status: String,
    #[diesel(sql_type = BigInt)]
    count: i64,
    #[diesel(sql_type = Numeric)]
    revenue: BigDecimal,
}

#[derive(QueryableByName)]
struct SalesTotalsSqlRow {
    #[diesel(sql_type = BigInt)]
    total_sales: i64,
    #[diesel(sql_type = BigInt)]
    delivered_sales: i64,
    #[diesel(sql_type = BigInt)]
    pending_sales: i64,
    #[diesel(sql_type = BigInt)]
    cancelled_sales: i64,
    #[diesel(sql_type = Numeric)]
    total_revenue: BigDecimal,
    #[diesel(sql_type = Numeric)]
    avg_order_value: BigDecimal,
}

#[derive(QueryableByName)]
struct ProductTotalsSqlRow {
    #[diesel(sql_type = BigInt)]
    total_products: i64,
    #[diesel(sql_type = BigInt)]
    in_stock_products: i64,
    #[diesel(sql_type = BigInt)]
    out_of_stock_products: i64,
    #[diesel(sql_type = BigInt)]
    low_stock_products: i64,
}

#[derive(QueryableByName)]
struct CustomerTotalsSqlRow {
    #[diesel(sql_type = BigInt)]
    total_customers: i64,
    #[diesel(sql_type = BigInt)]
    active_customers: i64,
}

#[derive(QueryableByName)]
struct StaffTotalsSqlRow {
    #[diesel(sql_type = BigInt)]
    total_sales_reps: i64,
    #[diesel(sql_type = BigInt)]
    active_sales_reps: i64,
}

#[derive(QueryableByName)]
struct RecentSaleSqlRow {
    #[diesel(sql_type = Integer)]
    sale_id: i32,
    #[diesel(sql_type = Text)]
    order_ref: String,
    #[diesel(sql_type = Timestamptz)]
    sale_date: DateTime<Utc>,
    #[diesel(sql_type = Text)]
    status: String,
    #[diesel(sql_type = Numeric)]
    total_price: BigDecimal,
    #[diesel(sql_type = Text)]
    customer_name: String,
    #[diesel(sql_type = Text)]
    sales_rep_name: String,
}

impl DashboardQueries for DieselDashboard {
    fn summary(&self, range: DateRange) -> Result<DashboardSummary, DomainError> {
        let mut conn = self.pool.get()?;

        let sales: SalesTotalsSqlRow = diesel::sql_query(
            "SELECT COUNT(*) AS total_sales, \
                    COUNT(*) FILTER (WHERE status = 'delivered') AS delivered_sales, \
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending_sales, \
                    COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_sales, \
                    COALESCE(SUM(total_price) FILTER (WHERE status != 'cancelled'), 0) AS total_revenue, \
                    COALESCE(AVG(total_price) FILTER (WHERE status != 'cancelled'), 0) AS avg_order_value \
             FROM sales \
             WHERE DATE(sale_date) BETWEEN $1 AND $2",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .get_result(&mut conn)?;

        let products: ProductTotalsSqlRow = diesel::sql_query(
            "SELECT COUNT(*) AS total_products, \
                    COUNT(*) FILTER (WHERE stock_quantity > 0) AS in_stock_products, \
                    COUNT(*) FILTER (WHERE stock_quantity = 0) AS out_of_stock_products, \
                    COUNT(*) FILTER (WHERE stock_quantity > 0 AND stock_quantity < 10) AS low_stock_products \
             FROM products",
        )
        .get_result(&mut conn)?;

        let customers: CustomerTotalsSqlRow = diesel::sql_query(
            "SELECT COUNT(*) AS total_customers, \
                    COUNT(*) FILTER (WHERE status = 'active') AS active_customers \
             FROM customer_documents",
        )
        .get_result(&mut conn)?;

        let sales_reps: StaffTotalsSqlRow = diesel::sql_query(
            "SELECT COUNT(*) AS total_sales_reps, \
                    COUNT(*) FILTER (WHERE active) AS active_sales_reps \
             FROM sales_staff",
        )
        .get_result(&mut conn)?;

        let recent: Vec<RecentSaleSqlRow> = diesel::sql_query(
            "SELECT s.id AS sale_id, s.order_ref, s.sale_date, s.status, s.total_price, \
                    s.customer_name, st.name AS sales_rep_name \
             FROM sales s \
             JOIN sales_staff st ON st.id = s.staff_id \
             ORDER BY s.sale_date DESC \
             LIMIT 10",
        )
        .load(&mut conn)?;

        Ok(DashboardSummary {
            sales: SalesTotals {
                total_sales: sales.total_sales,
                delivered_sales: sales.delivered_sales,
                pending_sales: sales.pending_sales,
                cancelled_sales: sales.cancelled_sales,
                total_revenue: sales.total_revenue,
                avg_order_value: sales.avg_order_value,
            },
            products: ProductTotals {
                total_products: products.total_products,
                in_stock_products: products.in_stock_products,
                out_of_stock_products: products.out_of_stock_products,
                low_stock_products: products.low_stock_products,
            },
            customers: CustomerTotals {
                total_customers: customers.total_customers,
                active_customers: customers.active_customers,
            },
            sales_reps: StaffTotals {
                total_sales_reps: sales_reps.total_sales_reps,
                active_sales_reps: sales_reps.active_sales_reps,
            },
            recent_sales: recent
                .into_iter()
                .map(|row| RecentSale {
                    sale_id: row.sale_id,
                    order_ref: row.order_ref,
                    sale_date: row.sale_date,
                    status: row.status,
                    total_price: row.total_price,
                    customer_name: row.customer_name,
                    sales_rep_name: row.sales_rep_name,
                })
                .collect(),
        })
    }

    fn sales_summary(&self, range: DateRange) -> Result<Vec<SalesSummaryRow>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<SalesSummarySqlRow> = diesel::sql_query(
            "SELECT DATE(sale_date) AS sale_date, \
                    COUNT(*) AS sales_count, \
                    COALESCE(SUM(total_price), 0) AS daily_revenue, \
                    COALESCE(AVG(total_price), 0) AS avg_order_value, \
                    COUNT(*) FILTER (WHERE status = 'delivered') AS delivered_count, \
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending_count, \
                    COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_count \
             FROM sales \
             WHERE DATE(sale_date) BETWEEN $1 AND $2 \
             GROUP BY DATE(sale_date) \
             ORDER BY sale_date DESC",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|row| SalesSummaryRow {
                sale_date: row.sale_date,
                sales_count: row.sales_count,
                daily_revenue: row.daily_revenue,
                avg_order_value: row.avg_order_value,
                delivered_count: row.delivered_count,
                pending_count: row.pending_count,
                cancelled_count: row.cancelled_count,
            })
            .collect())
    }

    fn top_products(&self, range: DateRange) -> Result<Vec<TopProductRow>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<TopProductSqlRow> = diesel::sql_query(
            "SELECT p.id AS product_id, p.name, p.price, p.stock_quantity, p.category, \
                    COALESCE(SUM(s.quantity), 0) AS total_sold, \
                    COALESCE(SUM(s.total_price), 0) AS total_revenue, \
                    COUNT(DISTINCT s.order_ref) AS order_count \
             FROM products p \
             JOIN sales s ON s.product_id = p.id \
             WHERE s.status != 'cancelled' AND DATE(s.sale_date) BETWEEN $1 AND $2 \
             GROUP BY p.id, p.name, p.price, p.stock_quantity, p.category \
             ORDER BY total_sold DESC, total_revenue DESC \
             LIMIT 20",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|row| TopProductRow {
                product_id: row.product_id,
                name: row.name,
                price: row.price,
                stock_quantity: row.stock_quantity,
                category: row.category,
                total_sold: row.total_sold,
                total_revenue: row.total_revenue,
                order_count: row.order_count,
            })
            .collect())
    }

    fn rep_performance(&self, range: DateRange) -> Result<Vec<RepPerformanceRow>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<RepPerformanceSqlRow> = diesel::sql_query(
            "SELECT st.id AS staff_id, st.name, \
                    COUNT(s.id) AS sales_count, \
                    COALESCE(SUM(s.total_price), 0) AS total_revenue, \
                    COALESCE(AVG(s.total_price), 0) AS avg_sale_amount, \
                    COUNT(DISTINCT s.customer_ref) AS unique_customers \
             FROM sales_staff st \
             LEFT JOIN sales s ON s.staff_id = st.id \
                               AND s.status != 'cancelled' \
                               AND DATE(s.sale_date) BETWEEN $1 AND $2 \
             WHERE st.active \
             GROUP BY st.id, st.name \
             ORDER BY total_revenue DESC",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|row| RepPerformanceRow {
                staff_id: row.staff_id,
                name: row.name,
                sales_count: row.sales_count,
                total_revenue: row.total_revenue,
                avg_sale_amount: row.avg_sale_amount,
                unique_customers: row.unique_customers,
            })
            .collect())
    }

    fn customer_insights(
        &self,
        range: DateRange,
    ) -> Result<Vec<CustomerInsightRow>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<CustomerInsightSqlRow> = diesel::sql_query(
            "SELECT customer_ref AS customer_id, customer_name, \
                    COUNT(DISTINCT order_ref) AS total_orders, \
                    COALESCE(SUM(total_price), 0) AS total_spent, \
                    COALESCE(AVG(total_price), 0) AS avg_order_value, \
                    MAX(sale_date) AS last_order_date \
             FROM sales \
             WHERE status != 'cancelled' AND DATE(sale_date) BETWEEN $1 AND $2 \
             GROUP BY customer_ref, customer_name \
             ORDER BY total_spent DESC \
             LIMIT 50",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|row| CustomerInsightRow {
                customer_id: row.customer_id,
                customer_name: row.customer_name,
                total_orders: row.total_orders,
                total_spent: row.total_spent,
                avg_order_value: row.avg_order_value,
                last_order_date: row.last_order_date,
            })
            .collect())
    }

    fn inventory_status(&self) -> Result<Vec<InventoryStatusRow>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<InventoryStatusSqlRow> = diesel::sql_query(
            "SELECT p.id AS product_id, p.name, p.price, p.stock_quantity, p.category, \
                    CASE WHEN p.stock_quantity = 0 THEN 'Out of Stock' \
                         WHEN p.stock_quantity < 10 THEN 'Low Stock' \
                         WHEN p.stock_quantity < 50 THEN 'Moderate Stock' \
                         ELSE 'Good Stock' END AS stock_status, \
                    COALESCE(SUM(s.quantity) FILTER (WHERE s.status != 'cancelled'), 0) \
                        AS total_sold_all_time \
             FROM products p \
             LEFT JOIN sales s ON s.product_id = p.id \
             GROUP BY p.id, p.name, p.price, p.stock_quantity, p.category \
             ORDER BY p.stock_quantity ASC, p.name ASC",
        )
        .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|row| InventoryStatusRow {
                product_id: row.product_id,
                name: row.name,
                price: row.price,
                stock_quantity: row.stock_quantity,
                category: row.category,
                stock_status: row.stock_status,
                total_sold_all_time: row.total_sold_all_time,
            })
            .collect())
    }

    fn sales_trends(&self, range: DateRange) -> Result<SalesTrends, DomainError> {
        let mut conn = self.pool.get()?;
        let monthly: Vec<MonthlyTrendSqlRow> = diesel::sql_query(
            "SELECT EXTRACT(YEAR FROM sale_date)::int AS year, \
                    EXTRACT(MONTH FROM sale_date)::int AS month, \
                    COUNT(*) AS sales_count, \
                    COALESCE(SUM(total_price), 0) AS monthly_revenue, \
                    COALESCE(AVG(total_price), 0) AS avg_order_value \
             FROM sales \
             WHERE status != 'cancelled' AND DATE(sale_date) BETWEEN $1 AND $2 \
             GROUP BY 1, 2 \
             ORDER BY 1, 2",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;

        let statuses: Vec<StatusTrendSqlRow> = diesel::sql_query(
            "SELECT status, COUNT(*) AS count, COALESCE(SUM(total_price), 0) AS revenue \
             FROM sales \
             WHERE DATE(sale_date) BETWEEN $1 AND $2 \
             GROUP BY status \
             ORDER BY count DESC",
        )
        .bind::<Date, _>(range.start)
        .bind::<Date, _>(range.end)
        .load(&mut conn)?;

        Ok(SalesTrends {
            monthly_trends: monthly
                .into_iter()
                .map(|row| MonthlyTrendRow {
                    year: row.year,
                    month: row.month,
                    sales_count: row.sales_count,
                    monthly_revenue: row.monthly_revenue,
                    avg_order_value: row.avg_order_value,
                })
                .collect(),
            status_trends: statuses
                .into_iter()
                .map(|row| StatusTrendRow {
                    status: row.status,
                    count: row.count,
                    revenue: row.revenue,
                })
                .collect(),
        })
    }
}
