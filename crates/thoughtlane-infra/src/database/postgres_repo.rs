//! PostgreSQL repository implementations for users, posts and comments.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use thoughtlane_core::domain::{Authored, Comment, Post, User};
use thoughtlane_core::error::RepoError;
use thoughtlane_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use super::postgres_engagement::insert_tags;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Keep usernames (often email addresses) out of the logs.
fn mask_username(username: &str) -> String {
    match username.find('@') {
        Some(at_pos) => {
            let (local, domain) = username.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

fn with_author<M, T>((model, author): (M, Option<user::Model>)) -> Result<Authored<T>, RepoError>
where
    T: From<M>,
{
    let author = author.ok_or_else(|| RepoError::Corrupt("row without author".to_string()))?;
    Ok(Authored::new(T::from(model), author.summary()))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %mask_username(username), "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_authored(&self, id: Uuid) -> Result<Option<Authored<Post>>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        row.map(with_author).transpose()
    }

    async fn list_authored(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError> {
        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(with_author).collect()
    }

    async fn list_authored_by_ids(
        &self,
        ids: &[Uuid],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(with_author).collect()
    }

    async fn list_authored_by_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError> {
        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(with_author).collect()
    }

    async fn create_with_tags(&self, post: Post, tags: &[String]) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        insert_tags(&txn, model.id, tags).await?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update_with_tags(
        &self,
        post: Post,
        tags: Option<&[String]>,
    ) -> Result<Post, RepoError> {
        let post_id = post.id;
        let mut active = post::ActiveModel::from(post);
        // Ownership and creation time are never rewritten.
        active.user_id = NotSet;
        active.created_at = NotSet;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = active.update(&txn).await.map_err(map_db_err)?;
        if let Some(names) = tags {
            TagEntity::delete_many()
                .filter(tag::Column::PostId.eq(post_id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
            insert_tags(&txn, post_id, names).await?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let comment_ids: Vec<Uuid> = CommentEntity::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::PostId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        let mut like_targets = Condition::any().add(like::Column::PostId.eq(id));
        if !comment_ids.is_empty() {
            like_targets = like_targets.add(like::Column::CommentId.is_in(comment_ids));
        }
        let likes = LikeEntity::delete_many()
            .filter(like_targets)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let comments = CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let tags = TagEntity::delete_many()
            .filter(tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let deleted = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if deleted.rows_affected == 0 {
            // Dropping the transaction rolls it back.
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(
            post_id = %id,
            likes = likes.rows_affected,
            comments = comments.rows_affected,
            tags = tags.rows_affected,
            "Post and dependents deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_authored_by_post(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<Authored<Comment>>, RepoError> {
        let rows = CommentEntity::find()
            .find_also_related(UserEntity)
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(with_author).collect()
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        LikeEntity::delete_many()
            .filter(like::Column::CommentId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let deleted = CommentEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if deleted.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::mask_username;

    #[test]
    fn masks_usernames() {
        assert_eq!(mask_username("alice@example.com"), "a***@example.com");
        assert_eq!(mask_username("a@example.com"), "***@example.com");
        assert_eq!(mask_username("alice"), "***");
    }
}
