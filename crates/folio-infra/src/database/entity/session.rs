//! Session entity for SeaORM. Keyed by the opaque token.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub user_id: Uuid,
    #[sea_orm(column_name = "expires")]
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for folio_core::domain::Session {
    fn from(model: Model) -> Self {
        Self::new(model.token, model.user_id, model.expires_at.into())
    }
}

impl From<folio_core::domain::Session> for ActiveModel {
    fn from(session: folio_core::domain::Session) -> Self {
        Self {
            token: Set(session.token),
            user_id: Set(session.user_id),
            expires_at: Set(session.expires_at.into()),
        }
    }
}
