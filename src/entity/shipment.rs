//! Shipment entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shipment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tracking_id: String,
    pub shipment_name: Option<String>,
    pub origin_country: String,
    pub origin_city: String,
    pub destination_country: String,
    pub destination_city: String,
    pub current_location_country: String,
    pub current_location_city: String,
    pub transport_mode: String,
    pub status: String,
    pub estimated_delivery: Option<Date>,
    pub package_count: i32,
    pub package_type: Option<String>,
    pub weight_kg: Option<f64>,
    pub dimensions: Option<String>,
    pub declared_value: Option<f64>,
    pub contents: Option<String>,
    pub hs_code: Option<String>,
    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub buyer_name: Option<String>,
    pub buyer_address: Option<String>,
    pub customer_delivery_address: Option<String>,
    pub shipment_notes: Option<String>,
    pub pickup_dispatched_through: Option<String>,
    pub transit_dispatched_through: Option<String>,
    pub warehouse_dispatched_through: Option<String>,
    pub customer_dispatched_through: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shipment_media::Entity")]
    Media,
    #[sea_orm(has_many = "super::shipment_document::Entity")]
    Documents,
    #[sea_orm(has_many = "super::shipment_stage_event::Entity")]
    StageEvents,
}

impl Related<super::shipment_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl Related<super::shipment_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::shipment_stage_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StageEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
