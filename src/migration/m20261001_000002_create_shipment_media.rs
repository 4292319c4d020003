//! Create shipment_media table.

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
                    .table(ShipmentMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShipmentMedia::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShipmentMedia::ShipmentId).uuid().not_null())
                    .col(ColumnDef::new(ShipmentMedia::Stage).string_len(64).not_null())
                    .col(ColumnDef::new(ShipmentMedia::FileName).string().not_null())
                    .col(ColumnDef::new(ShipmentMedia::ContentType).string().not_null())
                    .col(ColumnDef::new(ShipmentMedia::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(ShipmentMedia::Bucket).string().not_null())
                    .col(ColumnDef::new(ShipmentMedia::ObjectKey).text().not_null())
                    .col(ColumnDef::new(ShipmentMedia::PublicUrl).text().not_null())
                    .col(
                        ColumnDef::new(ShipmentMedia::ChecksumSha256)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShipmentMedia::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ShipmentMedia::Table, ShipmentMedia::ShipmentId)
                            .to(Shipment::Table, Shipment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipment_media_shipment_stage")
                    .table(ShipmentMedia::Table)
                    .col(ShipmentMedia::ShipmentId)
                    .col(ShipmentMedia::Stage)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShipmentMedia::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShipmentMedia {
    Table,
    Id,
    ShipmentId,
    Stage,
    FileName,
    ContentType,
    FileSize,
    Bucket,
    ObjectKey,
    PublicUrl,
    ChecksumSha256,
    CreatedAt,
}
