use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Body,
    Synopsis,
    Date,
    Likes,
    Comments,
    #[sea_orm(iden = "coverimage")]
    CoverImage,
}

#[derive(DeriveIden)]
enum Portfolio {
    Table,
    Id,
    Title,
    Date,
    Repo,
    Url,
    #[sea_orm(iden = "coverimage")]
    CoverImage,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Token,
    UserId,
    Expires,
}

fn create_posts() -> TableCreateStatement {
    Table::create()
        .table(Posts::Table)
        .if_not_exists()
        .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Posts::Title).string().not_null())
        .col(ColumnDef::new(Posts::Body).text().not_null().default(""))
        .col(ColumnDef::new(Posts::Synopsis).text().not_null().default(""))
        .col(
            ColumnDef::new(Posts::Date)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Posts::Likes).big_integer().not_null().default(0))
        .col(ColumnDef::new(Posts::Comments).big_integer().not_null().default(0))
        .col(ColumnDef::new(Posts::CoverImage).string().not_null().default(""))
        .to_owned()
}

fn create_portfolio() -> TableCreateStatement {
    Table::create()
        .table(Portfolio::Table)
        .if_not_exists()
        .col(ColumnDef::new(Portfolio::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Portfolio::Title).string().not_null())
        .col(
            ColumnDef::new(Portfolio::Date)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Portfolio::Repo).string().not_null().default(""))
        .col(ColumnDef::new(Portfolio::Url).string().not_null().default(""))
        .col(ColumnDef::new(Portfolio::CoverImage).string().not_null().default(""))
        .to_owned()
}

fn create_users() -> TableCreateStatement {
    Table::create()
        .table(Users::Table)
        .if_not_exists()
        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
        .to_owned()
}

fn create_sessions() -> TableCreateStatement {
    Table::create()
        .table(Sessions::Table)
        .if_not_exists()
        .col(ColumnDef::new(Sessions::Token).string().not_null().primary_key())
        .col(ColumnDef::new(Sessions::UserId).uuid().not_null())
        .col(
            ColumnDef::new(Sessions::Expires)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_sessions_user")
                .from(Sessions::Table, Sessions::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

/// Listings are always newest first.
fn date_index(
    name: &str,
    table: impl IntoIden + 'static,
    column: impl IntoIden + 'static,
) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(column)
        .if_not_exists()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_posts()).await?;
        manager.create_table(create_portfolio()).await?;
        manager.create_table(create_users()).await?;
        manager.create_table(create_sessions()).await?;

        manager
            .create_index(date_index("idx_posts_date", Posts::Table, Posts::Date))
            .await?;
        manager
            .create_index(date_index(
                "idx_portfolio_date",
                Portfolio::Table,
                Portfolio::Date,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Portfolio::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;

        Ok(())
    }
}
