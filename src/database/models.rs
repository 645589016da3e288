use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Industry category row. Categories form a forest via `parent_id`;
/// children are discovered by reverse lookup, never stored as a list.
#[derive(Debug, Clone, FromRow)]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

/// Company joined with its address, before phones/activities are attached.
#[derive(Debug, Clone, FromRow)]
pub struct CompanyAddressRow {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct PhoneNumberRow {
    pub company_id: i32,
    pub number: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CompanyActivityRow {
    pub company_id: i32,
    pub activity: String,
}

/// Fully-assembled company aggregate, the only shape that crosses the
/// service/transport boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone_numbers: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companies {
    pub companies: Vec<Company>,
}
