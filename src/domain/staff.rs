use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct StaffMember {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub commission_rate: BigDecimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStaffMember {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub commission_rate: BigDecimal,
}

#[derive(Debug, Clone, Default)]
pub struct StaffPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub hire_date: Option<Option<NaiveDate>>,
    pub commission_rate: Option<BigDecimal>,
    pub active: Option<bool>,
}

impl StaffPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.hire_date.is_none()
            && self.commission_rate.is_none()
            && self.active.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaffFilter {
    pub search: Option<String>,
    pub active: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct StaffPage {
    pub staff: Vec<StaffMember>,
    pub total: i64,
}
