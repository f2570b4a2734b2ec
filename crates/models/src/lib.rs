//! sea-orm entities for the hatchery schema plus the field validation each
//! table applies before a row is written.

pub mod errors;
pub mod db;
pub mod validate;
pub mod target;
pub mod site;
pub mod store;
pub mod lab_box;
pub mod fish_pond;
pub mod cage;
pub mod feeding;
pub mod water_change;
pub mod medication;

#[cfg(test)]
mod tests;
