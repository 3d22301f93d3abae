//! Reports served by farm-service.

pub mod land_plant_list;

pub use land_plant_list::{
    LandPlantListFilter, LandPlantListItem, LandPlantListProvider, LandPlantListReport, SortColumn,
};
