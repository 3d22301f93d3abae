//! Persistence boundary shared by the in-memory and Postgres backends.

use crate::models::{CreateCustomer, CreatePlant, Customer, Flavor, Land, Plant, Tac};
use crate::reports::LandPlantListFilter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use service_core::report::{PaginationRequest, RawRow};
use uuid::Uuid;

#[async_trait]
pub trait FarmStore: Send + Sync {
    async fn get_tac(&self, code: Uuid) -> Result<Option<Tac>, AppError>;

    async fn get_land(&self, code: Uuid) -> Result<Option<Land>, AppError>;

    /// Loads the plant with `customer_code` resolved through its land.
    async fn get_plant(&self, code: Uuid) -> Result<Option<Plant>, AppError>;

    async fn get_flavor(&self, code: Uuid) -> Result<Option<Flavor>, AppError>;

    /// Email comparison is case-insensitive.
    async fn find_customer_by_email(
        &self,
        tac_code: Uuid,
        email: &str,
    ) -> Result<Option<Customer>, AppError>;

    async fn insert_customer(&self, input: CreateCustomer) -> Result<Customer, AppError>;

    async fn record_login(&self, customer_code: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    async fn insert_plant(&self, input: CreatePlant) -> Result<Plant, AppError>;

    /// Returns false when no plant had that code.
    async fn delete_plant(&self, code: Uuid) -> Result<bool, AppError>;

    async fn land_plant_list_rows(
        &self,
        land_code: Uuid,
        filter: &LandPlantListFilter,
        pagination: &PaginationRequest,
    ) -> Result<Vec<RawRow>, AppError>;

    async fn insert_tac(&self, tac: Tac) -> Result<Tac, AppError>;

    async fn insert_land(&self, land: Land) -> Result<Land, AppError>;

    async fn insert_flavor(&self, flavor: Flavor) -> Result<Flavor, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
