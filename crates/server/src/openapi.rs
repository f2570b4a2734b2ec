//! OpenAPI document. Request bodies are described by the `*Doc` mirrors below
//! so the service crate stays free of schema derives.

use chrono::{DateTime, FixedOffset};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SiteInputDoc { pub name: String, pub location: Option<String>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct SitePatchDoc { pub name: Option<String>, pub location: Option<String>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct StoreInputDoc {
    pub site_id: Uuid,
    pub name: String,
    pub feed_type: String,
    /// Defaults to `kg`
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub reorder_level: Option<f64>,
}

#[derive(ToSchema)]
pub struct StorePatchDoc {
    pub name: Option<String>,
    pub feed_type: Option<String>,
    pub unit: Option<String>,
    /// Stock-take correction; sets the balance directly
    pub quantity: Option<f64>,
    pub reorder_level: Option<f64>,
}

#[derive(ToSchema)]
pub struct RestockInputDoc { pub quantity: f64 }

#[derive(ToSchema)]
pub struct LabBoxInputDoc {
    pub site_id: Uuid,
    pub code: String,
    pub species: Option<String>,
    /// egg, larva, fry or empty; defaults to egg
    pub stage: Option<String>,
    pub stock_count: Option<i32>,
}

#[derive(ToSchema)]
pub struct LabBoxPatchDoc {
    pub code: Option<String>,
    pub species: Option<String>,
    pub stage: Option<String>,
    pub stock_count: Option<i32>,
}

#[derive(ToSchema)]
pub struct PondInputDoc {
    pub site_id: Uuid,
    pub name: String,
    pub area_m2: f64,
    pub depth_m: Option<f64>,
    pub species: Option<String>,
    pub fish_count: Option<i32>,
    /// active, fallow or maintenance; defaults to active
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct PondPatchDoc {
    pub name: Option<String>,
    pub area_m2: Option<f64>,
    pub depth_m: Option<f64>,
    pub species: Option<String>,
    pub fish_count: Option<i32>,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct CageInputDoc { pub pond_id: Uuid, pub name: String, pub species: Option<String>, pub fish_count: Option<i32> }

#[derive(ToSchema)]
pub struct CagePatchDoc { pub name: Option<String>, pub species: Option<String>, pub fish_count: Option<i32> }

/// Exactly one of `lab_box_id`, `pond_id`, `cage_id`.
#[derive(ToSchema)]
pub struct FeedingInputDoc {
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub cage_id: Option<Uuid>,
    pub store_id: Uuid,
    pub quantity: f64,
    pub fed_at: Option<DateTime<FixedOffset>>,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
pub struct FeedingPatchDoc {
    pub store_id: Option<Uuid>,
    pub quantity: Option<f64>,
    pub fed_at: Option<DateTime<FixedOffset>>,
    pub notes: Option<String>,
}

/// Exactly one of `lab_box_id`, `pond_id`.
#[derive(ToSchema)]
pub struct WaterChangeInputDoc {
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub volume_percent: f64,
    pub temperature_c: Option<f64>,
    pub ph: Option<f64>,
    pub changed_at: Option<DateTime<FixedOffset>>,
    pub reason: Option<String>,
}

#[derive(ToSchema)]
pub struct WaterChangePatchDoc {
    pub volume_percent: Option<f64>,
    pub temperature_c: Option<f64>,
    pub ph: Option<f64>,
    pub changed_at: Option<DateTime<FixedOffset>>,
    pub reason: Option<String>,
}

/// Exactly one of `lab_box_id`, `pond_id`, `cage_id`.
#[derive(ToSchema)]
pub struct MedicationInputDoc {
    pub lab_box_id: Option<Uuid>,
    pub pond_id: Option<Uuid>,
    pub cage_id: Option<Uuid>,
    pub medicine: String,
    pub dosage: f64,
    pub dosage_unit: String,
    pub administered_at: Option<DateTime<FixedOffset>>,
    pub withdrawal_days: Option<i32>,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
pub struct MedicationPatchDoc {
    pub medicine: Option<String>,
    pub dosage: Option<f64>,
    pub dosage_unit: Option<String>,
    pub administered_at: Option<DateTime<FixedOffset>>,
    pub withdrawal_days: Option<i32>,
    pub notes: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::sites::list,
        crate::routes::sites::create,
        crate::routes::sites::get,
        crate::routes::sites::update,
        crate::routes::sites::delete,
        crate::routes::sites::overview,
        crate::routes::stores::list,
        crate::routes::stores::create,
        crate::routes::stores::get,
        crate::routes::stores::update,
        crate::routes::stores::delete,
        crate::routes::stores::restock,
        crate::routes::lab_boxes::list,
        crate::routes::lab_boxes::create,
        crate::routes::lab_boxes::get,
        crate::routes::lab_boxes::update,
        crate::routes::lab_boxes::delete,
        crate::routes::fish_ponds::list,
        crate::routes::fish_ponds::create,
        crate::routes::fish_ponds::get,
        crate::routes::fish_ponds::update,
        crate::routes::fish_ponds::delete,
        crate::routes::cages::list,
        crate::routes::cages::create,
        crate::routes::cages::get,
        crate::routes::cages::update,
        crate::routes::cages::delete,
        crate::routes::feedings::list,
        crate::routes::feedings::create,
        crate::routes::feedings::get,
        crate::routes::feedings::update,
        crate::routes::feedings::delete,
        crate::routes::water_changes::list,
        crate::routes::water_changes::create,
        crate::routes::water_changes::get,
        crate::routes::water_changes::update,
        crate::routes::water_changes::delete,
        crate::routes::medications::list,
        crate::routes::medications::create,
        crate::routes::medications::get,
        crate::routes::medications::update,
        crate::routes::medications::delete,
        crate::ws::handler,
    ),
    components(
        schemas(
            HealthResponse,
            SiteInputDoc,
            SitePatchDoc,
            StoreInputDoc,
            StorePatchDoc,
            RestockInputDoc,
            LabBoxInputDoc,
            LabBoxPatchDoc,
            PondInputDoc,
            PondPatchDoc,
            CageInputDoc,
            CagePatchDoc,
            FeedingInputDoc,
            FeedingPatchDoc,
            WaterChangeInputDoc,
            WaterChangePatchDoc,
            MedicationInputDoc,
            MedicationPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "sites"),
        (name = "stores"),
        (name = "lab_boxes"),
        (name = "fish_ponds"),
        (name = "cages"),
        (name = "feedings"),
        (name = "water_changes"),
        (name = "medications"),
        (name = "events")
    )
)]
pub struct ApiDoc;
