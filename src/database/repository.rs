use super::models::{Activity, Company, CompanyActivityRow, CompanyAddressRow, PhoneNumberRow};
use super::DbPool;
use crate::utils::geo::EARTH_RADIUS_KM;
use anyhow::Result;
use std::collections::HashMap;
use tracing::debug;

pub struct Repository {
    pub pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connectivity probe for the readiness endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool.get_pool()).await?;
        Ok(())
    }

    /// Resolve an activity by exact display name.
    pub async fn activity_by_name(&self, name: &str) -> Result<Option<Activity>> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"SELECT id, name, parent_id
               FROM activities
               WHERE name = $1
               ORDER BY id
               LIMIT 1"#,
        )
        .bind(name)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(activity)
    }

    /// One batched round trip per tree level: all activities whose parent
    /// is in the current frontier.
    pub async fn child_activity_ids(&self, parent_ids: &[i32]) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"SELECT id FROM activities WHERE parent_id = ANY($1) ORDER BY id"#,
        )
        .bind(parent_ids)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(ids)
    }

    /// First company whose name equals the query or contains it
    /// case-insensitively. Exact matches sort first, then id ascending,
    /// so the winner is stable across calls.
    pub async fn company_id_by_name(&self, name: &str) -> Result<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"SELECT id FROM companies
               WHERE name = $1 OR name ILIKE $2
               ORDER BY (name = $1) DESC, id ASC
               LIMIT 1"#,
        )
        .bind(name)
        .bind(format!("%{}%", name))
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn company_ids_by_address(&self, address: &str) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"SELECT c.id FROM companies c
               JOIN addresses a ON a.id = c.address_id
               WHERE a.address = $1 OR a.address ILIKE $2
               ORDER BY c.id"#,
        )
        .bind(address)
        .bind(format!("%{}%", address))
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(ids)
    }

    /// Companies linked to any of the given activities, deduplicated.
    pub async fn company_ids_by_activities(&self, activity_ids: &[i32]) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"SELECT DISTINCT company_id
               FROM company_activities
               WHERE activity_id = ANY($1)
               ORDER BY company_id"#,
        )
        .bind(activity_ids)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(ids)
    }

    /// Great-circle distance filter evaluated in-query. The acos argument
    /// is clamped to [-1, 1]: floating-point rounding can overshoot at
    /// identical or antipodal coordinates.
    pub async fn company_ids_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: i32,
    ) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"SELECT c.id FROM companies c
               JOIN addresses a ON a.id = c.address_id
               WHERE $4 * acos(LEAST(1.0, GREATEST(-1.0,
                       cos(radians($1)) * cos(radians(a.latitude))
                         * cos(radians(a.longitude) - radians($2))
                       + sin(radians($1)) * sin(radians(a.latitude))
                     ))) <= $3
               ORDER BY c.id"#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(f64::from(radius_km))
        .bind(EARTH_RADIUS_KM)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(ids)
    }

    /// Eager-load full aggregates for the given company ids: one query for
    /// companies joined with addresses, one for phone numbers, one for
    /// activity names. Results are ordered by company id.
    pub async fn load_companies(&self, ids: &[i32]) -> Result<Vec<Company>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CompanyAddressRow>(
            r#"SELECT c.id, c.name, a.address, a.latitude, a.longitude
               FROM companies c
               JOIN addresses a ON a.id = c.address_id
               WHERE c.id = ANY($1)
               ORDER BY c.id"#,
        )
        .bind(ids)
        .fetch_all(self.pool.get_pool())
        .await?;

        let phones = sqlx::query_as::<_, PhoneNumberRow>(
            r#"SELECT company_id, number
               FROM phone_numbers
               WHERE company_id = ANY($1)
               ORDER BY id"#,
        )
        .bind(ids)
        .fetch_all(self.pool.get_pool())
        .await?;

        let activities = sqlx::query_as::<_, CompanyActivityRow>(
            r#"SELECT ca.company_id, a.name AS activity
               FROM company_activities ca
               JOIN activities a ON a.id = ca.activity_id
               WHERE ca.company_id = ANY($1)
               ORDER BY a.id"#,
        )
        .bind(ids)
        .fetch_all(self.pool.get_pool())
        .await?;

        let mut phones_by_company: HashMap<i32, Vec<String>> = HashMap::new();
        for phone in phones {
            phones_by_company
                .entry(phone.company_id)
                .or_default()
                .push(phone.number);
        }

        let mut activities_by_company: HashMap<i32, Vec<String>> = HashMap::new();
        for row in activities {
            activities_by_company
                .entry(row.company_id)
                .or_default()
                .push(row.activity);
        }

        let companies = rows
            .into_iter()
            .map(|row| Company {
                phone_numbers: phones_by_company.remove(&row.id).unwrap_or_default(),
                activities: activities_by_company.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
                address: row.address,
                latitude: row.latitude,
                longitude: row.longitude,
            })
            .collect();

        Ok(companies)
    }

    /// Create the directory tables when missing. Seeding order elsewhere
    /// relies on the FK chain set up here.
    pub async fn ensure_schema(&self) -> Result<()> {
        let pool = self.pool.get_pool();

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS addresses (
                id SERIAL PRIMARY KEY,
                address TEXT NOT NULL,
                latitude DOUBLE PRECISION NOT NULL,
                longitude DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS activities (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                parent_id INT REFERENCES activities(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS companies (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                address_id INT NOT NULL REFERENCES addresses(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        // Phone numbers live and die with their company.
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS phone_numbers (
                id SERIAL PRIMARY KEY,
                number TEXT NOT NULL,
                company_id INT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS company_activities (
                company_id INT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                activity_id INT NOT NULL REFERENCES activities(id),
                PRIMARY KEY (company_id, activity_id)
            )"#,
        )
        .execute(pool)
        .await?;

        debug!("Ensuring directory indexes exist...");
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_activities_parent_id ON activities(parent_id)",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_companies_address_id ON companies(address_id)",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_company_activities_activity ON company_activities(activity_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
