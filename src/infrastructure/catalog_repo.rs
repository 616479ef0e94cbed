use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{LineRequest, OrderItem, OrderStatus};
use crate::domain::ports::{CatalogStore, SaleContext};
use crate::domain::product::{NewProduct, Product, ProductFilter, ProductPage, ProductPatch};
use crate::domain::staff::{NewStaffMember, StaffFilter, StaffMember, StaffPage, StaffPatch};
use crate::schema::{products, sales, sales_staff};

use super::models::{
    NewProductRow, NewSaleRow, NewStaffRow, ProductChangeset, ProductRow, StaffChangeset,
    StaffRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            | DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselCatalogStore {
    pool: DbPool,
}

impl DieselCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn product_query(filter: &ProductFilter) -> products::BoxedQuery<'_, diesel::pg::Pg> {
    let mut query = products::table.into_boxed();
    if let Some(category) = &filter.category {
        query = query.filter(products::category.eq(category));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query = query.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::description.ilike(pattern)),
        );
    }
    if let Some(threshold) = filter.low_stock {
        query = query.filter(products::stock_quantity.le(threshold));
    }
    query
}

fn staff_query(filter: &StaffFilter) -> sales_staff::BoxedQuery<'_, diesel::pg::Pg> {
    let mut query = sales_staff::table.into_boxed();
    if let Some(active) = filter.active {
        query = query.filter(sales_staff::active.eq(active));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query = query.filter(
            sales_staff::name
                .ilike(pattern.clone())
                .or(sales_staff::email.ilike(pattern)),
        );
    }
    query
}

impl CatalogStore for DieselCatalogStore {
    fn create_product(&self, input: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let row: ProductRow = diesel::insert_into(products::table)
            .values(&NewProductRow {
                name: input.name,
                description: input.description,
                price: input.price,
                category: input.category,
                stock_quantity: input.stock_quantity,
                specifications: input.specifications,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn product_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, DomainError> {
        let mut conn = self.pool.get()?;
        let total: i64 = product_query(filter).count().get_result(&mut conn)?;
        let rows = product_query(filter)
            .select(ProductRow::as_select())
            .order(products::name.asc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load(&mut conn)?;
        Ok(ProductPage {
            products: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    fn update_product(&self, id: i32, patch: ProductPatch) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(products::table.find(id))
            .set(&ProductChangeset {
                name: patch.name,
                description: patch.description,
                price: patch.price,
                category: patch.category,
                stock_quantity: patch.stock_quantity,
                specifications: patch.specifications,
                updated_at: Utc::now(),
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| DomainError::NotFound(format!("Product not found: {id}")))?;
        Ok(row.into())
    }

    fn delete_product(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!("Product not found: {id}")));
        }
        Ok(())
    }

    fn create_staff(&self, input: NewStaffMember) -> Result<StaffMember, DomainError> {
        let mut conn = self.pool.get()?;
        let result = diesel::insert_into(sales_staff::table)
            .values(&NewStaffRow {
                name: input.name,
                email: input.email,
                phone: input.phone,
                hire_date: input.hire_date,
                commission_rate: input.commission_rate,
            })
            .returning(StaffRow::as_returning())
            .get_result(&mut conn);
        match result {
            Ok(row) => Ok(row.into()),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(DomainError::Conflict(
                    "Sales representative with this email already exists".to_string(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn staff_by_id(&self, id: i32) -> Result<Option<StaffMember>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = sales_staff::table
            .find(id)
            .select(StaffRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn list_staff(&self, filter: &StaffFilter) -> Result<StaffPage, DomainError> {
        let mut conn = self.pool.get()?;
        let total: i64 = staff_query(filter).count().get_result(&mut conn)?;
        let rows = staff_query(filter)
            .select(StaffRow::as_select())
            .order(sales_staff::name.asc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load(&mut conn)?;
        Ok(StaffPage {
            staff: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    fn update_staff(&self, id: i32, patch: StaffPatch) -> Result<StaffMember, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(sales_staff::table.find(id))
            .set(&StaffChangeset {
                name: patch.name,
                email: patch.email,
                phone: patch.phone,
                hire_date: patch.hire_date,
                commission_rate: patch.commission_rate,
                active: patch.active,
                updated_at: Utc::now(),
            })
            .returning(StaffRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Sales representative not found: {id}"))
            })?;
        Ok(row.into())
    }

    fn delete_staff(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let references: i64 = sales::table
            .filter(sales::staff_id.eq(id))
            .count()
            .get_result(&mut conn)?;
        if references > 0 {
            return Err(DomainError::Conflict(
                "Sales representative has recorded sales and cannot be deleted".to_string(),
            ));
        }
        let deleted = diesel::delete(sales_staff::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!(
                "Sales representative not found: {id}"
            )));
        }
        Ok(())
    }

    fn reserve_stock(
        &self,
        sale: &SaleContext,
        lines: &[LineRequest],
    ) -> Result<Vec<OrderItem>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let now = Utc::now();
            let mut items = Vec::with_capacity(lines.len());
            let mut sale_rows = Vec::with_capacity(lines.len());

            // Lines are processed in the order supplied by the caller; the
            // first missing product or short stock aborts the transaction.
            for line in lines {
                let product = products::table
                    .find(line.product_id)
                    .select(ProductRow::as_select())
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| {
                        DomainError::NotFound(format!("Product not found: {}", line.product_id))
                    })?;

                if product.stock_quantity < line.quantity {
                    return Err(DomainError::Conflict(format!(
                        "Insufficient stock for product {}. Available: {}, Requested: {}",
                        product.name, product.stock_quantity, line.quantity
                    )));
                }

                diesel::update(products::table.find(line.product_id))
                    .set((
                        products::stock_quantity.eq(products::stock_quantity - line.quantity),
                        products::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                let total_price = &product.price * BigDecimal::from(line.quantity);
                sale_rows.push(NewSaleRow {
                    order_ref: sale.order_id.clone(),
                    product_id: product.id,
                    staff_id: sale.sales_rep_id,
                    promotion_id: None,
                    customer_ref: sale.customer_id.clone(),
                    customer_name: sale.customer_name.clone(),
                    quantity: line.quantity,
                    unit_price: product.price.clone(),
                    total_price: total_price.clone(),
                    status: OrderStatus::Pending.as_str().to_string(),
                });
                items.push(OrderItem {
                    product_id: product.id,
                    product_name: product.name,
                    quantity: line.quantity,
                    unit_price: product.price,
                    total_price,
                });
            }

            diesel::insert_into(sales::table)
                .values(&sale_rows)
                .execute(conn)?;

            Ok(items)
        })
    }

    fn restore_stock(&self, order_id: &str, items: &[OrderItem]) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let now = Utc::now();
            for item in items {
                diesel::update(products::table.find(item.product_id))
                    .set((
                        products::stock_quantity.eq(products::stock_quantity + item.quantity),
                        products::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }

            diesel::update(sales::table.filter(sales::order_ref.eq(order_id)))
                .set(sales::status.eq(OrderStatus::Cancelled.as_str()))
                .execute(conn)?;

            Ok(())
        })
    }
}
