//! Portfolio entry entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "portfolio")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_name = "date")]
    pub created_at: DateTimeWithTimeZone,
    pub repo: String,
    pub url: String,
    #[sea_orm(column_name = "coverimage")]
    pub cover_image: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for folio_core::domain::PortfolioEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            repo: model.repo,
            url: model.url,
            cover_image: model.cover_image,
            created_at: model.created_at.into(),
        }
    }
}

impl From<folio_core::domain::PortfolioEntry> for ActiveModel {
    fn from(entry: folio_core::domain::PortfolioEntry) -> Self {
        Self {
            id: Set(entry.id),
            title: Set(entry.title),
            created_at: Set(entry.created_at.into()),
            repo: Set(entry.repo),
            url: Set(entry.url),
            cover_image: Set(entry.cover_image),
        }
    }
}
