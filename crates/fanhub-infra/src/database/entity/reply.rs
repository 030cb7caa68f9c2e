//! Reply entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use fanhub_core::domain::AuthorSnapshot;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "replies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for fanhub_core::domain::Reply {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            text: model.text,
            author: AuthorSnapshot::new(model.author_id, model.author_name, model.author_avatar),
            created_at: model.created_at.into(),
        }
    }
}

impl From<fanhub_core::domain::Reply> for ActiveModel {
    fn from(reply: fanhub_core::domain::Reply) -> Self {
        Self {
            id: Set(reply.id),
            post_id: Set(reply.post_id),
            text: Set(reply.text),
            author_id: Set(reply.author.id),
            author_name: Set(reply.author.name),
            author_avatar: Set(reply.author.avatar),
            created_at: Set(reply.created_at.into()),
        }
    }
}
