//! Post entity for SeaORM.
//!
//! Author fields are denormalized snapshot columns, not a join. They stay
//! as written even when the author later changes profile details.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use fanhub_core::domain::AuthorSnapshot;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub likes: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for fanhub_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            link: model.link,
            image_url: model.image_url,
            author: AuthorSnapshot::new(model.author_id, model.author_name, model.author_avatar),
            created_at: model.created_at.into(),
            likes: model.likes,
        }
    }
}

impl From<fanhub_core::domain::Post> for ActiveModel {
    fn from(post: fanhub_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            description: Set(post.description),
            link: Set(post.link),
            image_url: Set(post.image_url),
            author_id: Set(post.author.id),
            author_name: Set(post.author.name),
            author_avatar: Set(post.author.avatar),
            created_at: Set(post.created_at.into()),
            likes: Set(post.likes),
        }
    }
}
