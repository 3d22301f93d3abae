use crate::flows::{
    LandAddPlantParams, LandAddPlantResult, PlantUserDeleteResult, TacLoginParams, TacLoginResult,
    TacRegisterParams, TacRegisterResult,
};
use crate::utils::Password;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Success envelope around a flow result.
#[derive(Debug, Serialize)]
pub struct FlowResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> FlowResponse<T> {
    pub fn ok(data: impl Into<T>) -> Self {
        Self {
            success: true,
            data: data.into(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddPlantRequest {
    pub flavor_code: Option<Uuid>,
    pub other_flavor: Option<String>,
    pub some_int_val: Option<i32>,
    pub some_decimal_val: Option<Decimal>,
    pub some_money_val: Option<Decimal>,
    #[serde(rename = "someUTCDateTimeVal")]
    pub some_utc_date_time_val: Option<DateTime<Utc>>,
    pub some_email_address: Option<String>,
    pub some_phone_number: Option<String>,
    pub is_delete_allowed: bool,
    pub is_edit_allowed: bool,
    pub notes: Option<String>,
}

impl From<AddPlantRequest> for LandAddPlantParams {
    fn from(req: AddPlantRequest) -> Self {
        Self {
            flavor_code: req.flavor_code,
            other_flavor: req.other_flavor.unwrap_or_default(),
            some_int_val: req.some_int_val,
            some_decimal_val: req.some_decimal_val,
            some_money_val: req.some_money_val,
            some_utc_date_time_val: req.some_utc_date_time_val,
            some_email_address: non_blank(req.some_email_address),
            some_phone_number: req.some_phone_number.unwrap_or_default(),
            is_delete_allowed: req.is_delete_allowed,
            is_edit_allowed: req.is_edit_allowed,
            notes: req.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlantResponse {
    pub land_code: Uuid,
    pub plant_code: Uuid,
}

impl From<LandAddPlantResult> for AddPlantResponse {
    fn from(result: LandAddPlantResult) -> Self {
        Self {
            land_code: result.land_code,
            plant_code: result.plant_code,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeleteResponse {
    pub land_code: Uuid,
}

impl From<PlantUserDeleteResult> for UserDeleteResponse {
    fn from(result: PlantUserDeleteResult) -> Self {
        Self {
            land_code: result.land_code,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<Password>,
    pub confirm_password: Option<Password>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<RegisterRequest> for TacRegisterParams {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: non_blank(req.email),
            password: req.password,
            confirm_password: req.confirm_password,
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub customer_code: Uuid,
    pub email: String,
    pub user_name: String,
}

impl From<TacRegisterResult> for RegisterResponse {
    fn from(result: TacRegisterResult) -> Self {
        Self {
            customer_code: result.customer_code,
            email: result.email,
            user_name: result.user_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<Password>,
}

impl From<LoginRequest> for TacLoginParams {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email.unwrap_or_default(),
            password: req.password,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub customer_code: Uuid,
    pub email: String,
    pub user_code_value: Uuid,
    pub role_name_csv: String,
    pub last_login_utc: DateTime<Utc>,
}

impl From<TacLoginResult> for LoginResponse {
    fn from(result: TacLoginResult) -> Self {
        Self {
            customer_code: result.customer_code,
            email: result.email,
            user_code_value: result.user_code_value,
            role_name_csv: result.role_name_csv,
            last_login_utc: result.last_login_utc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_plant_request_camel_case() {
        let flavor = Uuid::new_v4();
        let req: AddPlantRequest = serde_json::from_value(json!({
            "flavorCode": flavor,
            "someIntVal": 7,
            "someDecimalVal": "12.345",
            "someUTCDateTimeVal": "2025-01-02T03:04:05Z",
            "someEmailAddress": "  ",
            "isDeleteAllowed": true
        }))
        .unwrap();

        let params: LandAddPlantParams = req.into();
        assert_eq!(params.flavor_code, Some(flavor));
        assert_eq!(params.some_int_val, Some(7));
        assert_eq!(params.some_decimal_val, Some(Decimal::new(12345, 3)));
        assert!(params.some_utc_date_time_val.is_some());
        assert_eq!(params.some_email_address, None);
        assert!(params.is_delete_allowed);
    }

    #[test]
    fn test_flow_response_flattens() {
        let code = Uuid::new_v4();
        let body = serde_json::to_value(FlowResponse::<UserDeleteResponse>::ok(
            PlantUserDeleteResult { land_code: code },
        ))
        .unwrap();
        assert_eq!(body, json!({ "success": true, "landCode": code }));
    }
}
