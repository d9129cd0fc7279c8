//! 点击记录表迁移
//!
//! 每次重定向写入一行，按 link_id 聚合得到总点击数。

use sea_orm_migration::prelude::*;

use super::m20251019_000001_links_table::Links;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clicks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clicks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clicks::LinkId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Clicks::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Clicks::Referrer).text().null())
                    .col(ColumnDef::new(Clicks::UserAgent).text().null())
                    .col(ColumnDef::new(Clicks::IpAddress).string_len(45).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clicks_link_id")
                            .from(Clicks::Table, Clicks::LinkId)
                            .to(Links::Table, Links::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 统计查询按 link_id 计数
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clicks_link_id")
                    .table(Clicks::Table)
                    .col(Clicks::LinkId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_clicks_link_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Clicks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Clicks {
    #[sea_orm(iden = "clicks")]
    Table,
    Id,
    LinkId,
    ClickedAt,
    Referrer,
    UserAgent,
    IpAddress,
}
