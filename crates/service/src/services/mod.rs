pub mod site_service;
pub mod store_service;
pub mod lab_box_service;
pub mod fish_pond_service;
pub mod cage_service;
pub mod feeding_service;
pub mod water_change_service;
pub mod medication_service;
pub(crate) mod targets;
