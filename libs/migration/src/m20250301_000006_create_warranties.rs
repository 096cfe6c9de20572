use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warranties::Table)
                    .if_not_exists()
                    .col(pk_uuid(Warranties::Id))
                    .col(uuid(Warranties::ProductId))
                    .col(integer(Warranties::Period))
                    .col(date(Warranties::StartDate))
                    .col(date(Warranties::EndDate))
                    .col(text(Warranties::Details))
                    .col(
                        timestamp_with_time_zone(Warranties::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warranties_product")
                            .from(Warranties::Table, Warranties::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The overlap check filters on (product_id, start_date, end_date)
        manager
            .create_index(
                Index::create()
                    .name("idx_warranties_product_dates")
                    .table(Warranties::Table)
                    .col(Warranties::ProductId)
                    .col(Warranties::StartDate)
                    .col(Warranties::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Warranties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Warranties {
    Table,
    Id,
    ProductId,
    Period,
    StartDate,
    EndDate,
    Details,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
