//! Create shipment_stage_event table.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_create_shipments::Shipment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShipmentStageEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShipmentStageEvent::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShipmentStageEvent::ShipmentId).uuid().not_null())
                    .col(
                        ColumnDef::new(ShipmentStageEvent::Stage)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShipmentStageEvent::PreviousStage).string_len(64))
                    .col(ColumnDef::new(ShipmentStageEvent::LocationCity).string())
                    .col(ColumnDef::new(ShipmentStageEvent::LocationCountry).string())
                    .col(ColumnDef::new(ShipmentStageEvent::Note).text())
                    .col(
                        ColumnDef::new(ShipmentStageEvent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ShipmentStageEvent::Table, ShipmentStageEvent::ShipmentId)
                            .to(Shipment::Table, Shipment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipment_stage_event_shipment")
                    .table(ShipmentStageEvent::Table)
                    .col(ShipmentStageEvent::ShipmentId)
                    .col(ShipmentStageEvent::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShipmentStageEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShipmentStageEvent {
    Table,
    Id,
    ShipmentId,
    Stage,
    PreviousStage,
    LocationCity,
    LocationCountry,
    Note,
    CreatedAt,
}
