//! Create shipment_document table.

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
                    .table(ShipmentDocument::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShipmentDocument::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShipmentDocument::ShipmentId).uuid().not_null())
                    .col(
                        ColumnDef::new(ShipmentDocument::DocumentType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShipmentDocument::FileName).string().not_null())
                    .col(ColumnDef::new(ShipmentDocument::ContentType).string().not_null())
                    .col(
                        ColumnDef::new(ShipmentDocument::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShipmentDocument::Bucket).string().not_null())
                    .col(ColumnDef::new(ShipmentDocument::ObjectKey).text().not_null())
                    .col(ColumnDef::new(ShipmentDocument::PublicUrl).text().not_null())
                    .col(
                        ColumnDef::new(ShipmentDocument::ChecksumSha256)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShipmentDocument::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ShipmentDocument::Table, ShipmentDocument::ShipmentId)
                            .to(Shipment::Table, Shipment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipment_document_shipment_type")
                    .table(ShipmentDocument::Table)
                    .col(ShipmentDocument::ShipmentId)
                    .col(ShipmentDocument::DocumentType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShipmentDocument::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShipmentDocument {
    Table,
    Id,
    ShipmentId,
    DocumentType,
    FileName,
    ContentType,
    FileSize,
    Bucket,
    ObjectKey,
    PublicUrl,
    ChecksumSha256,
    CreatedAt,
}
