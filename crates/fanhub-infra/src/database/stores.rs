//! PostgreSQL implementations of the document store ports.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    SqlErr, TransactionTrait,
};
use uuid::Uuid;

use fanhub_core::StoreError;
use fanhub_core::domain::{Notification, Post, Reply, User};
use fanhub_core::ports::{
    LikeApplied, LikeIntent, LikeStore, NotificationStore, PostStore, ReplyStore, UserStore,
};

use super::entity::{like, notification, post, reply, user};

fn query_err(e: sea_orm::DbErr) -> StoreError {
    StoreError::Query(e.to_string())
}

/// SeaORM-backed implementation of all five document store ports.
pub struct PostgresDocumentStore {
    db: DbConn,
}

impl PostgresDocumentStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PostgresDocumentStore {
    async fn create(&self, user: User) -> Result<User, StoreError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(StoreError::Constraint(format!(
                "email already registered: {}",
                user.email
            )));
        }

        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let result = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn set_avatar(&self, id: Uuid, url: &str) -> Result<(), StoreError> {
        let updated = user::Entity::update_many()
            .col_expr(user::Column::AvatarUrl, Expr::value(url))
            .col_expr(
                user::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if updated.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for PostgresDocumentStore {
    async fn create(&self, post: Post) -> Result<Post, StoreError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let result = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        let result = post::Entity::find()
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn recent_by_author(
        &self,
        author_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Post>, StoreError> {
        let result = post::Entity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_image_url(&self, id: Uuid, url: &str) -> Result<(), StoreError> {
        let updated = post::Entity::update_many()
            .col_expr(post::Column::ImageUrl, Expr::value(url))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if updated.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        // Markers and replies are left behind on purpose; the orphan sweep
        // collects them.
        let deleted = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if deleted.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl LikeStore for PostgresDocumentStore {
    async fn is_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let marker = like::Entity::find_by_id((post_id, user_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(marker.is_some())
    }

    async fn apply(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        intent: LikeIntent,
    ) -> Result<LikeApplied, StoreError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        post::Entity::find_by_id(post_id)
            .one(&txn)
            .await
            .map_err(query_err)?
            .ok_or(StoreError::NotFound)?;

        // Conflict detection leans on the marker's primary key rather than a
        // pre-read, so two racing transactions cannot both pass the check.
        match intent {
            LikeIntent::Like => {
                let marker = like::ActiveModel {
                    post_id: Set(post_id),
                    user_id: Set(user_id),
                    created_at: Set(chrono::Utc::now().into()),
                };
                if let Err(err) = like::Entity::insert(marker)
                    .exec_without_returning(&txn)
                    .await
                {
                    txn.rollback().await.map_err(query_err)?;
                    return match err.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            Err(StoreError::Conflict("already liked".into()))
                        }
                        _ => Err(query_err(err)),
                    };
                }
            }
            LikeIntent::Unlike => {
                let deleted = like::Entity::delete_by_id((post_id, user_id))
                    .exec(&txn)
                    .await
                    .map_err(query_err)?;
                if deleted.rows_affected == 0 {
                    txn.rollback().await.map_err(query_err)?;
                    return Err(StoreError::Conflict("not currently liked".into()));
                }
            }
        }

        // Relative update: concurrent transactions serialize on the row lock
        // and each adds its own delta instead of overwriting a stale read.
        let delta = match intent {
            LikeIntent::Like => Expr::col(post::Column::Likes).add(1),
            LikeIntent::Unlike => Expr::col(post::Column::Likes).sub(1),
        };
        post::Entity::update_many()
            .col_expr(post::Column::Likes, delta)
            .filter(post::Column::Id.eq(post_id))
            .exec(&txn)
            .await
            .map_err(query_err)?;

        let likes = post::Entity::find_by_id(post_id)
            .one(&txn)
            .await
            .map_err(query_err)?
            .map(|p| p.likes)
            .ok_or(StoreError::NotFound)?;

        txn.commit().await.map_err(query_err)?;

        Ok(LikeApplied { likes })
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, StoreError> {
        use sea_orm::PaginatorTrait;

        like::Entity::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn delete_orphaned(&self) -> Result<u64, StoreError> {
        let live_posts = Query::select()
            .column(post::Column::Id)
            .from(post::Entity)
            .to_owned();

        let deleted = like::Entity::delete_many()
            .filter(like::Column::PostId.not_in_subquery(live_posts))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(deleted.rows_affected)
    }
}

#[async_trait]
impl ReplyStore for PostgresDocumentStore {
    async fn create(&self, reply: Reply) -> Result<Reply, StoreError> {
        let model = reply::ActiveModel::from(reply)
            .insert(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.into())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Reply>, StoreError> {
        let result = reply::Entity::find()
            .filter(reply::Column::PostId.eq(post_id))
            .order_by_asc(reply::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(
        &self,
        post_id: Uuid,
        reply_id: Uuid,
    ) -> Result<Option<Reply>, StoreError> {
        let result = reply::Entity::find_by_id(reply_id)
            .filter(reply::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn delete(&self, post_id: Uuid, reply_id: Uuid) -> Result<(), StoreError> {
        let deleted = reply::Entity::delete_many()
            .filter(reply::Column::Id.eq(reply_id))
            .filter(reply::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if deleted.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_orphaned(&self) -> Result<u64, StoreError> {
        let live_posts = Query::select()
            .column(post::Column::Id)
            .from(post::Entity)
            .to_owned();

        let deleted = reply::Entity::delete_many()
            .filter(reply::Column::PostId.not_in_subquery(live_posts))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(deleted.rows_affected)
    }
}

#[async_trait]
impl NotificationStore for PostgresDocumentStore {
    async fn create(&self, notification: Notification) -> Result<Notification, StoreError> {
        let model = notification::ActiveModel::from(notification)
            .insert(&self.db)
            .await
            .map_err(query_err)?;
        model.try_into().map_err(StoreError::Query)
    }

    async fn recent_for(
        &self,
        recipient_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        let result = notification::Entity::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        result
            .into_iter()
            .map(|m| m.try_into().map_err(StoreError::Query))
            .collect()
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let updated = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if updated.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn mark_all_read(&self, recipient_id: Uuid, ids: &[Uuid]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let updated = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::Id.is_in(ids.iter().copied()))
            .filter(notification::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(updated.rows_affected)
    }
}
