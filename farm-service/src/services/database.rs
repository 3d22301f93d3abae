//! Postgres store for farm-service.

use crate::models::{CreateCustomer, CreatePlant, Customer, Flavor, Land, Plant, Tac};
use crate::reports::{LandPlantListFilter, SortColumn};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::FarmStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use service_core::report::{PaginationRequest, RawRow};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

const PLANT_COLUMNS: &str = r#"
    p.code, p.land_code, l.customer_code, p.flavor_code, p.other_flavor, p.some_int_val,
    p.some_decimal_val, p.some_money_val, p.some_utc_date_time_val, p.some_email_address,
    p.some_phone_number, p.is_delete_allowed, p.is_edit_allowed, p.notes, p.created_utc
"#;

const CUSTOMER_COLUMNS: &str = r#"
    code, tac_code, email, first_name, last_name, password_hash, is_active, role_name_csv,
    last_login_utc, created_utc
"#;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

fn db_error(action: &str, e: sqlx::Error) -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("Failed to {}: {}", action, e))
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "farm-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

/// ORDER BY clause built only from whitelisted column expressions.
fn order_clause(pagination: &PaginationRequest) -> String {
    match SortColumn::parse(&pagination.order_by_column_name) {
        Some(column) => format!(
            "{} {}, p.created_utc ASC, p.code ASC",
            column.sql_expr(),
            if pagination.order_by_descending { "DESC" } else { "ASC" }
        ),
        None => "p.created_utc ASC, p.code ASC".to_string(),
    }
}

#[async_trait]
impl FarmStore for Database {
    #[instrument(skip(self))]
    async fn get_tac(&self, code: Uuid) -> Result<Option<Tac>, AppError> {
        sqlx::query_as::<_, Tac>("SELECT code, name, pac_code FROM tac WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get tac", e))
    }

    #[instrument(skip(self))]
    async fn get_land(&self, code: Uuid) -> Result<Option<Land>, AppError> {
        sqlx::query_as::<_, Land>(
            "SELECT code, name, pac_code, customer_code FROM land WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("get land", e))
    }

    #[instrument(skip(self))]
    async fn get_plant(&self, code: Uuid) -> Result<Option<Plant>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_plant"])
            .start_timer();

        let plant = sqlx::query_as::<_, Plant>(&format!(
            "SELECT {} FROM plant p JOIN land l ON l.code = p.land_code WHERE p.code = $1",
            PLANT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("get plant", e))?;

        timer.observe_duration();
        Ok(plant)
    }

    #[instrument(skip(self))]
    async fn get_flavor(&self, code: Uuid) -> Result<Option<Flavor>, AppError> {
        sqlx::query_as::<_, Flavor>(
            "SELECT code, name, lookup_enum_name, is_active FROM flavor WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("get flavor", e))
    }

    #[instrument(skip(self, email))]
    async fn find_customer_by_email(
        &self,
        tac_code: Uuid,
        email: &str,
    ) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customer WHERE tac_code = $1 AND LOWER(email) = LOWER($2)",
            CUSTOMER_COLUMNS
        ))
        .bind(tac_code)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find customer", e))
    }

    #[instrument(skip(self, input), fields(tac_code = %input.tac_code))]
    async fn insert_customer(&self, input: CreateCustomer) -> Result<Customer, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_customer"])
            .start_timer();

        let email = input.email.clone();
        let customer = input.into_customer();
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customer (code, tac_code, email, first_name, last_name, password_hash, is_active, role_name_csv, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(customer.code)
        .bind(customer.tac_code)
        .bind(&customer.email)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.password_hash)
        .bind(customer.is_active)
        .bind(&customer.role_name_csv)
        .bind(customer.created_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "Customer with email '{}' already exists for tac",
                    email
                ))
            }
            _ => db_error("insert customer", e),
        })?;

        timer.observe_duration();
        info!(customer_code = %customer.code, "Customer created");
        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn record_login(&self, customer_code: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE customer SET last_login_utc = $2 WHERE code = $1")
            .bind(customer_code)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("record login", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Customer {} not found",
                customer_code
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(land_code = %input.land_code))]
    async fn insert_plant(&self, input: CreatePlant) -> Result<Plant, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_plant"])
            .start_timer();

        let customer_code = self
            .get_land(input.land_code)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Land {} not found", input.land_code)))?
            .customer_code;
        let plant = input.into_plant(customer_code);

        sqlx::query(
            r#"
            INSERT INTO plant (code, land_code, flavor_code, other_flavor, some_int_val, some_decimal_val,
                some_money_val, some_utc_date_time_val, some_email_address, some_phone_number,
                is_delete_allowed, is_edit_allowed, notes, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(plant.code)
        .bind(plant.land_code)
        .bind(plant.flavor_code)
        .bind(&plant.other_flavor)
        .bind(plant.some_int_val)
        .bind(plant.some_decimal_val)
        .bind(plant.some_money_val)
        .bind(plant.some_utc_date_time_val)
        .bind(&plant.some_email_address)
        .bind(&plant.some_phone_number)
        .bind(plant.is_delete_allowed)
        .bind(plant.is_edit_allowed)
        .bind(&plant.notes)
        .bind(plant.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert plant", e))?;

        timer.observe_duration();
        info!(plant_code = %plant.code, "Plant created");
        Ok(plant)
    }

    #[instrument(skip(self))]
    async fn delete_plant(&self, code: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM plant WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete plant", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, filter, pagination), fields(land_code = %land_code))]
    async fn land_plant_list_rows(
        &self,
        land_code: Uuid,
        filter: &LandPlantListFilter,
        pagination: &PaginationRequest,
    ) -> Result<Vec<RawRow>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["land_plant_list"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT jsonb_build_object(
                'plant_code', p.code,
                'land_code', p.land_code,
                'flavor_code', p.flavor_code,
                'flavor_name', f.name,
                'some_int_val', p.some_int_val,
                'some_decimal_val', p.some_decimal_val::text,
                'some_money_val', p.some_money_val::text,
                'some_utc_date_time_val', p.some_utc_date_time_val,
                'some_email_address', p.some_email_address,
                'is_delete_allowed', p.is_delete_allowed,
                'is_edit_allowed', p.is_edit_allowed,
                'notes', p.notes
            )
            FROM plant p
            JOIN flavor f ON f.code = p.flavor_code
            WHERE p.land_code = $1
              AND ($2::uuid IS NULL OR p.flavor_code = $2)
              AND ($3::int IS NULL OR p.some_int_val >= $3)
              AND ($4::bool IS NULL OR p.is_delete_allowed = $4)
            ORDER BY {}
            LIMIT $5 OFFSET $6
            "#,
            order_clause(pagination)
        );

        let values: Vec<serde_json::Value> = sqlx::query_scalar(&sql)
            .bind(land_code)
            .bind(filter.flavor_code)
            .bind(filter.some_int_val_min)
            .bind(filter.is_delete_allowed)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list land plants", e))?;

        timer.observe_duration();

        values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::Object(row) => Ok(row),
                other => Err(AppError::DatabaseError(anyhow::anyhow!(
                    "Expected a JSON object row, got {}",
                    other
                ))),
            })
            .collect()
    }

    async fn insert_tac(&self, tac: Tac) -> Result<Tac, AppError> {
        sqlx::query("INSERT INTO tac (code, name, pac_code) VALUES ($1, $2, $3)")
            .bind(tac.code)
            .bind(&tac.name)
            .bind(tac.pac_code)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("insert tac", e))?;
        Ok(tac)
    }

    async fn insert_land(&self, land: Land) -> Result<Land, AppError> {
        sqlx::query("INSERT INTO land (code, name, pac_code, customer_code) VALUES ($1, $2, $3, $4)")
            .bind(land.code)
            .bind(&land.name)
            .bind(land.pac_code)
            .bind(land.customer_code)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("insert land", e))?;
        Ok(land)
    }

    async fn insert_flavor(&self, flavor: Flavor) -> Result<Flavor, AppError> {
        sqlx::query(
            "INSERT INTO flavor (code, name, lookup_enum_name, is_active) VALUES ($1, $2, $3, $4)",
        )
        .bind(flavor.code)
        .bind(&flavor.name)
        .bind(&flavor.lookup_enum_name)
        .bind(flavor.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert flavor", e))?;
        Ok(flavor)
    }

    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
