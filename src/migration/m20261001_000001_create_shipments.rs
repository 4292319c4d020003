//! Create shipment table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shipment::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Shipment::TrackingId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Shipment::ShipmentName).string())
                    .col(ColumnDef::new(Shipment::OriginCountry).string().not_null())
                    .col(ColumnDef::new(Shipment::OriginCity).string().not_null())
                    .col(ColumnDef::new(Shipment::DestinationCountry).string().not_null())
                    .col(ColumnDef::new(Shipment::DestinationCity).string().not_null())
                    .col(
                        ColumnDef::new(Shipment::CurrentLocationCountry)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Shipment::CurrentLocationCity).string().not_null())
                    .col(
                        ColumnDef::new(Shipment::TransportMode)
                            .string_len(16)
                            .not_null()
                            .default("air"),
                    )
                    .col(ColumnDef::new(Shipment::Status).string_len(64).not_null())
                    .col(ColumnDef::new(Shipment::EstimatedDelivery).date())
                    .col(
                        ColumnDef::new(Shipment::PackageCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Shipment::PackageType).string())
                    .col(ColumnDef::new(Shipment::WeightKg).double())
                    .col(ColumnDef::new(Shipment::Dimensions).string())
                    .col(ColumnDef::new(Shipment::DeclaredValue).double())
                    .col(ColumnDef::new(Shipment::Contents).text())
                    .col(ColumnDef::new(Shipment::HsCode).string())
                    .col(ColumnDef::new(Shipment::ShipperName).string())
                    .col(ColumnDef::new(Shipment::ShipperAddress).text())
                    .col(ColumnDef::new(Shipment::BuyerName).string())
                    .col(ColumnDef::new(Shipment::BuyerAddress).text())
                    .col(ColumnDef::new(Shipment::CustomerDeliveryAddress).text())
                    .col(ColumnDef::new(Shipment::ShipmentNotes).text())
                    .col(ColumnDef::new(Shipment::PickupDispatchedThrough).string())
                    .col(ColumnDef::new(Shipment::TransitDispatchedThrough).string())
                    .col(ColumnDef::new(Shipment::WarehouseDispatchedThrough).string())
                    .col(ColumnDef::new(Shipment::CustomerDispatchedThrough).string())
                    .col(
                        ColumnDef::new(Shipment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Shipment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipment_created_at")
                    .table(Shipment::Table)
                    .col(Shipment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipment_status")
                    .table(Shipment::Table)
                    .col(Shipment::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shipment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Shipment {
    Table,
    Id,
    TrackingId,
    ShipmentName,
    OriginCountry,
    OriginCity,
    DestinationCountry,
    DestinationCity,
    CurrentLocationCountry,
    CurrentLocationCity,
    TransportMode,
    Status,
    EstimatedDelivery,
    PackageCount,
    PackageType,
    WeightKg,
    Dimensions,
    DeclaredValue,
    Contents,
    HsCode,
    ShipperName,
    ShipperAddress,
    BuyerName,
    BuyerAddress,
    CustomerDeliveryAddress,
    ShipmentNotes,
    PickupDispatchedThrough,
    TransitDispatchedThrough,
    WarehouseDispatchedThrough,
    CustomerDispatchedThrough,
    CreatedAt,
    UpdatedAt,
}
