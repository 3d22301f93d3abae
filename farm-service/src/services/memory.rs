//! In-memory store for local runs and tests.

use crate::models::{CreateCustomer, CreatePlant, Customer, Flavor, Land, Plant, Tac};
use crate::reports::{LandPlantListFilter, SortColumn};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::FarmStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use service_core::error::AppError;
use service_core::report::{PaginationRequest, RawRow};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    tacs: HashMap<Uuid, Tac>,
    customers: HashMap<Uuid, Customer>,
    lands: HashMap<Uuid, Land>,
    flavors: HashMap<Uuid, Flavor>,
    plants: HashMap<Uuid, Plant>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn plant_count(&self) -> usize {
        self.tables.read().await.plants.len()
    }
}

fn plant_row(plant: &Plant, flavor_name: &str) -> RawRow {
    let mut row = RawRow::new();
    row.insert("plant_code".into(), json!(plant.code));
    row.insert("land_code".into(), json!(plant.land_code));
    row.insert("flavor_code".into(), json!(plant.flavor_code));
    row.insert("flavor_name".into(), json!(flavor_name));
    row.insert("some_int_val".into(), json!(plant.some_int_val));
    row.insert("some_decimal_val".into(), json!(plant.some_decimal_val));
    row.insert("some_money_val".into(), json!(plant.some_money_val));
    row.insert("some_utc_date_time_val".into(), json!(plant.some_utc_date_time_val));
    row.insert("some_email_address".into(), json!(plant.some_email_address));
    row.insert("is_delete_allowed".into(), json!(plant.is_delete_allowed));
    row.insert("is_edit_allowed".into(), json!(plant.is_edit_allowed));
    row.insert("notes".into(), json!(plant.notes));
    row
}

fn compare_by(column: SortColumn, a: (&Plant, &str), b: (&Plant, &str)) -> Ordering {
    match column {
        SortColumn::SomeIntVal => a.0.some_int_val.cmp(&b.0.some_int_val),
        SortColumn::SomeDecimalVal => a.0.some_decimal_val.cmp(&b.0.some_decimal_val),
        SortColumn::SomeUtcDateTimeVal => {
            a.0.some_utc_date_time_val.cmp(&b.0.some_utc_date_time_val)
        }
        SortColumn::FlavorName => a.1.cmp(b.1),
        SortColumn::SomeEmailAddress => a.0.some_email_address.cmp(&b.0.some_email_address),
    }
}

fn creation_order(a: &(&Plant, &str), b: &(&Plant, &str)) -> Ordering {
    a.0.created_utc
        .cmp(&b.0.created_utc)
        .then_with(|| a.0.code.cmp(&b.0.code))
}

#[async_trait]
impl FarmStore for InMemoryStore {
    async fn get_tac(&self, code: Uuid) -> Result<Option<Tac>, AppError> {
        Ok(self.tables.read().await.tacs.get(&code).cloned())
    }

    async fn get_land(&self, code: Uuid) -> Result<Option<Land>, AppError> {
        Ok(self.tables.read().await.lands.get(&code).cloned())
    }

    async fn get_plant(&self, code: Uuid) -> Result<Option<Plant>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.plants.get(&code).map(|plant| Plant {
            customer_code: tables
                .lands
                .get(&plant.land_code)
                .and_then(|land| land.customer_code),
            ..plant.clone()
        }))
    }

    async fn get_flavor(&self, code: Uuid) -> Result<Option<Flavor>, AppError> {
        Ok(self.tables.read().await.flavors.get(&code).cloned())
    }

    async fn find_customer_by_email(
        &self,
        tac_code: Uuid,
        email: &str,
    ) -> Result<Option<Customer>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .values()
            .find(|c| c.tac_code == tac_code && c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    #[instrument(skip(self, input), fields(tac_code = %input.tac_code))]
    async fn insert_customer(&self, input: CreateCustomer) -> Result<Customer, AppError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .customers
            .values()
            .any(|c| c.tac_code == input.tac_code && c.email.eq_ignore_ascii_case(&input.email));
        if taken {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Customer with email '{}' already exists for tac",
                input.email
            )));
        }
        let customer = input.into_customer();
        tables.customers.insert(customer.code, customer.clone());
        debug!(customer_code = %customer.code, "Customer inserted");
        Ok(customer)
    }

    async fn record_login(&self, customer_code: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let customer = tables.customers.get_mut(&customer_code).ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Customer {} not found", customer_code))
        })?;
        customer.last_login_utc = Some(at);
        Ok(())
    }

    #[instrument(skip(self, input), fields(land_code = %input.land_code))]
    async fn insert_plant(&self, input: CreatePlant) -> Result<Plant, AppError> {
        let mut tables = self.tables.write().await;
        let customer_code = tables
            .lands
            .get(&input.land_code)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Land {} not found", input.land_code)))?
            .customer_code;
        let plant = input.into_plant(customer_code);
        tables.plants.insert(plant.code, plant.clone());
        debug!(plant_code = %plant.code, "Plant inserted");
        Ok(plant)
    }

    async fn delete_plant(&self, code: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.plants.remove(&code).is_some())
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

        let tables = self.tables.read().await;
        let mut matched: Vec<(&Plant, &str)> = tables
            .plants
            .values()
            .filter(|p| p.land_code == land_code)
            .filter(|p| filter.matches(p.flavor_code, p.some_int_val, p.is_delete_allowed))
            .map(|p| {
                let flavor_name = tables
                    .flavors
                    .get(&p.flavor_code)
                    .map(|f| f.name.as_str())
                    .unwrap_or_default();
                (p, flavor_name)
            })
            .collect();

        match SortColumn::parse(&pagination.order_by_column_name) {
            Some(column) => matched.sort_by(|a, b| {
                let ordering = compare_by(column, *a, *b);
                let ordering = if pagination.order_by_descending {
                    ordering.reverse()
                } else {
                    ordering
                };
                ordering.then_with(|| creation_order(a, b))
            }),
            None => matched.sort_by(creation_order),
        }

        let rows = matched
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit()).unwrap_or(0))
            .map(|(plant, flavor_name)| plant_row(plant, flavor_name))
            .collect();

        timer.observe_duration();
        Ok(rows)
    }

    async fn insert_tac(&self, tac: Tac) -> Result<Tac, AppError> {
        self.tables.write().await.tacs.insert(tac.code, tac.clone());
        Ok(tac)
    }

    async fn insert_land(&self, land: Land) -> Result<Land, AppError> {
        self.tables.write().await.lands.insert(land.code, land.clone());
        Ok(land)
    }

    async fn insert_flavor(&self, flavor: Flavor) -> Result<Flavor, AppError> {
        self.tables
            .write()
            .await
            .flavors
            .insert(flavor.code, flavor.clone());
        Ok(flavor)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
