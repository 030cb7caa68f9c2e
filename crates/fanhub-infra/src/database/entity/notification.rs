//! Notification entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use fanhub_core::domain::{AuthorSnapshot, NotificationKind};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: String,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub actor_avatar: Option<String>,
    pub post_id: Uuid,
    pub post_title_snippet: String,
    pub reply_text_snippet: Option<String>,
    pub reply_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for fanhub_core::domain::Notification {
    type Error = String;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = match model.kind.as_str() {
            "like" => NotificationKind::Like,
            "reply" => NotificationKind::Reply,
            other => return Err(format!("unknown notification kind: {other}")),
        };

        Ok(Self {
            id: model.id,
            recipient_id: model.recipient_id,
            kind,
            actor: AuthorSnapshot::new(model.actor_id, model.actor_name, model.actor_avatar),
            post_id: model.post_id,
            post_title_snippet: model.post_title_snippet,
            reply_text_snippet: model.reply_text_snippet,
            reply_id: model.reply_id,
            created_at: model.created_at.into(),
            read: model.read,
        })
    }
}

impl From<fanhub_core::domain::Notification> for ActiveModel {
    fn from(n: fanhub_core::domain::Notification) -> Self {
        Self {
            id: Set(n.id),
            recipient_id: Set(n.recipient_id),
            kind: Set(n.kind.as_str().to_string()),
            actor_id: Set(n.actor.id),
            actor_name: Set(n.actor.name),
            actor_avatar: Set(n.actor.avatar),
            post_id: Set(n.post_id),
            post_title_snippet: Set(n.post_title_snippet),
            reply_text_snippet: Set(n.reply_text_snippet),
            reply_id: Set(n.reply_id),
            created_at: Set(n.created_at.into()),
            read: Set(n.read),
        }
    }
}
