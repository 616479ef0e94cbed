use super::customer::{Customer, CustomerFilter, CustomerPage, CustomerPatch, NewCustomer, OrderDelta};
use super::dashboard::{
    CustomerInsightRow, DashboardSummary, DateRange, InventoryStatusRow, RepPerformanceRow,
    SalesSummaryRow, SalesTrends, TopProductRow,
};
use super::errors::DomainError;
use super::order::{LineRequest, Order, OrderFilter, OrderItem, OrderPage, OrderStatus};
use super::product::{NewProduct, Product, ProductFilter, ProductPage, ProductPatch};
use super::staff::{NewStaffMember, StaffFilter, StaffMember, StaffPage, StaffPatch};

/// Context recorded on the flattened `sales` rows written together with a
/// stock reservation.
#[derive(Debug, Clone)]
pub struct SaleContext {
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub sales_rep_id: i32,
}

/// The relational catalog store: products, sales staff and the flattened
/// per-line-item sales rows. `reserve_stock` and `restore_stock` are each a
/// single all-or-nothing transaction.
pub trait CatalogStore: Send + Sync + 'static {
    fn create_product(&self, input: NewProduct) -> Result<Product, DomainError>;
    fn product_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;
    fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, DomainError>;
    fn update_product(&self, id: i32, patch: ProductPatch) -> Result<Product, DomainError>;
    fn delete_product(&self, id: i32) -> Result<(), DomainError>;

    fn create_staff(&self, input: NewStaffMember) -> Result<StaffMember, DomainError>;
    fn staff_by_id(&self, id: i32) -> Result<Option<StaffMember>, DomainError>;
    fn list_staff(&self, filter: &StaffFilter) -> Result<StaffPage, DomainError>;
    fn update_staff(&self, id: i32, patch: StaffPatch) -> Result<StaffMember, DomainError>;
    /// Fails with `Conflict` while sales rows still reference the member.
    fn delete_staff(&self, id: i32) -> Result<(), DomainError>;

    /// Validate and price every requested line in caller order, decrement
    /// stock and write one `sales` row per line, all in one transaction.
    /// Any missing product (`NotFound`) or short stock (`Conflict`) aborts
    /// the whole reservation.
    fn reserve_stock(
        &self,
        sale: &SaleContext,
        lines: &[LineRequest],
    ) -> Result<Vec<OrderItem>, DomainError>;

    /// Compensating action for `reserve_stock`: add every line's quantity
    /// back and mark the matching `sales` rows cancelled, in one transaction.
    /// Restoration is unconditional; there is no upper-bound stock re-check.
    fn restore_stock(&self, order_id: &str, items: &[OrderItem]) -> Result<(), DomainError>;
}

/// Order documents. Each operation is an individually-atomic single-item
/// write; implementations must never enlist these in a catalog transaction.
pub trait OrderStore: Send + Sync + 'static {
    /// Fails with `Conflict` if the identifier already exists.
    fn put(&self, order: &Order) -> Result<(), DomainError>;
    fn get(&self, order_id: &str) -> Result<Option<Order>, DomainError>;
    fn list(&self, filter: &OrderFilter) -> Result<OrderPage, DomainError>;
    /// Overwrites status (and notes when given), stamps `updated_at`.
    fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order, DomainError>;
    fn count_for_customer(&self, customer_id: &str) -> Result<i64, DomainError>;
}

/// Customer documents, including the workflow-owned aggregates.
pub trait CustomerStore: Send + Sync + 'static {
    fn create(&self, input: NewCustomer) -> Result<Customer, DomainError>;
    fn get(&self, customer_id: &str) -> Result<Option<Customer>, DomainError>;
    fn list(&self, filter: &CustomerFilter) -> Result<CustomerPage, DomainError>;
    fn update(&self, customer_id: &str, patch: CustomerPatch) -> Result<Customer, DomainError>;
    fn delete(&self, customer_id: &str) -> Result<(), DomainError>;
    /// Adjust `total_orders`/`total_value` (and `last_order_date` when given)
    /// by the order's contribution.
    fn apply_order_delta(&self, customer_id: &str, delta: &OrderDelta)
        -> Result<(), DomainError>;
}

/// Read-only analytical queries over the catalog store.
pub trait DashboardQueries: Send + Sync + 'static {
    fn summary(&self, range: DateRange) -> Result<DashboardSummary, DomainError>;
    fn sales_summary(&self, range: DateRange) -> Result<Vec<SalesSummaryRow>, DomainError>;
    fn top_products(&self, range: DateRange) -> Result<Vec<TopProductRow>, DomainError>;
    fn rep_performance(&self, range: DateRange) -> Result<Vec<RepPerformanceRow>, DomainError>;
    fn customer_insights(&self, range: DateRange)
        -> Result<Vec<CustomerInsightRow>, DomainError>;
    fn inventory_status(&self) -> Result<Vec<InventoryStatusRow>, DomainError>;
    fn sales_trends(&self, range: DateRange) -> Result<SalesTrends, DomainError>;
}
