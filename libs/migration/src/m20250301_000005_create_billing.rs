use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_uuid(Payments::Id))
                    .col(uuid(Payments::OrderId))
                    .col(decimal_len(Payments::Amount, 12, 2))
                    .col(string(Payments::Method))
                    .col(string(Payments::Status).default("pending"))
                    .col(
                        timestamp_with_time_zone(Payments::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_order")
                            .from(Payments::Table, Payments::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_order_id")
                    .table(Payments::Table)
                    .col(Payments::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(pk_uuid(Receipts::Id))
                    .col(string(Receipts::Name))
                    .col(uuid(Receipts::OrderId))
                    .col(uuid(Receipts::PaymentId))
                    .col(
                        timestamp_with_time_zone(Receipts::IssuedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(decimal_len(Receipts::TotalAmount, 12, 2))
                    .col(json_binary(Receipts::WarrantyInfo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receipts_order")
                            .from(Receipts::Table, Receipts::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receipts_payment")
                            .from(Receipts::Table, Receipts::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_receipts_order_id")
                    .table(Receipts::Table)
                    .col(Receipts::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Receipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    OrderId,
    Amount,
    Method,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Receipts {
    Table,
    Id,
    Name,
    OrderId,
    PaymentId,
    IssuedAt,
    TotalAmount,
    WarrantyInfo,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
}
