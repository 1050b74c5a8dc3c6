//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    #[sea_orm(column_type = "Text")]
    pub synopsis: String,
    #[sea_orm(column_name = "date")]
    pub created_at: DateTimeWithTimeZone,
    pub likes: i64,
    pub comments: i64,
    #[sea_orm(column_name = "coverimage")]
    pub cover_image: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for folio_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            synopsis: model.synopsis,
            cover_image: model.cover_image,
            created_at: model.created_at.into(),
            likes: model.likes,
            comments: model.comments,
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<folio_core::domain::Post> for ActiveModel {
    fn from(post: folio_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            body: Set(post.body),
            synopsis: Set(post.synopsis),
            created_at: Set(post.created_at.into()),
            likes: Set(post.likes),
            comments: Set(post.comments),
            cover_image: Set(post.cover_image),
        }
    }
}
