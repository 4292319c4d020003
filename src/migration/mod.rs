//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_shipments;
mod m20261001_000002_create_shipment_media;
mod m20261001_000003_create_shipment_documents;
mod m20261001_000004_create_shipment_stage_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_shipments::Migration),
            Box::new(m20261001_000002_create_shipment_media::Migration),
            Box::new(m20261001_000003_create_shipment_documents::Migration),
            Box::new(m20261001_000004_create_shipment_stage_events::Migration),
        ]
    }
}
