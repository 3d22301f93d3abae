//! Flows exposed by farm-service. Each module owns its parameters, result
//! record and default [`FlowConfig`](service_core::flow::FlowConfig).

pub mod land_add_plant;
pub mod plant_user_delete;
pub mod tac_login;
pub mod tac_register;

pub use land_add_plant::{LandAddPlantFlow, LandAddPlantParams, LandAddPlantResult};
pub use plant_user_delete::{PlantUserDeleteFlow, PlantUserDeleteResult};
pub use tac_login::{TacLoginFlow, TacLoginParams, TacLoginResult};
pub use tac_register::{TacRegisterFlow, TacRegisterParams, TacRegisterResult};
