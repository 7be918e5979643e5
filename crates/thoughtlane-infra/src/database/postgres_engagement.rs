//! PostgreSQL repositories for tags and likes.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use thoughtlane_core::domain::{Like, LikeTarget, Tag};
use thoughtlane_core::error::RepoError;
use thoughtlane_core::ports::{LikeRepository, TagRepository};

use super::entity::like::{self, Entity as LikeEntity, target_condition};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL like repository.
pub type PostgresLikeRepository = PostgresBaseRepository<LikeEntity>;

/// Append tag rows for `names` the post does not already carry. Runs on
/// whatever connection or transaction the caller holds.
pub(crate) async fn insert_tags<C>(
    db: &C,
    post_id: Uuid,
    names: &[String],
) -> Result<Vec<Tag>, RepoError>
where
    C: ConnectionTrait,
{
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let existing: Vec<String> = TagEntity::find()
        .select_only()
        .column(tag::Column::Name)
        .filter(tag::Column::PostId.eq(post_id))
        .order_by_asc(tag::Column::Position)
        .into_tuple()
        .all(db)
        .await
        .map_err(map_db_err)?;

    let first_position = existing.len() as i32;
    let rows: Vec<Tag> = names
        .iter()
        .filter(|name| !existing.contains(name))
        .map(|name| Tag::new(post_id, name.clone()))
        .collect();
    if rows.is_empty() {
        return Ok(rows);
    }

    let models = rows.iter().enumerate().map(|(i, t)| tag::ActiveModel {
        id: Set(t.id),
        post_id: Set(t.post_id),
        name: Set(t.name.clone()),
        position: Set(first_position + i as i32),
    });

    TagEntity::insert_many(models)
        .on_conflict(
            OnConflict::columns([tag::Column::PostId, tag::Column::Name])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(map_db_err)?;

    Ok(rows)
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn list_all(&self) -> Result<Vec<Tag>, RepoError> {
        let rows = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .order_by_asc(tag::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let rows = TagEntity::find()
            .filter(tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Position)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_to_post(&self, post_id: Uuid, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let tags = insert_tags(&txn, post_id, names).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(tags)
    }

    async fn remove_from_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let result = TagEntity::delete_many()
            .filter(tag::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    async fn replace_for_post(
        &self,
        post_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Tag>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        TagEntity::delete_many()
            .filter(tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        let tags = insert_tags(&txn, post_id, names).await?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(tags)
    }

    async fn post_ids_by_name(&self, name: &str) -> Result<Vec<Uuid>, RepoError> {
        TagEntity::find()
            .select_only()
            .column(tag::Column::PostId)
            .filter(tag::Column::Name.eq(name))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn toggle(&self, user_id: Uuid, target: LikeTarget) -> Result<bool, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let removed = LikeEntity::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(target_condition(target))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if removed.rows_affected == 0 {
            // The partial unique indexes turn a concurrent duplicate into a no-op.
            LikeEntity::insert(like::ActiveModel::from(Like::new(user_id, target)))
                .on_conflict(OnConflict::new().do_nothing().to_owned())
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(removed.rows_affected == 0)
    }

    async fn count(&self, target: LikeTarget) -> Result<u64, RepoError> {
        LikeEntity::find()
            .filter(target_condition(target))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn exists(&self, user_id: Uuid, target: LikeTarget) -> Result<bool, RepoError> {
        let found = LikeEntity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(target_condition(target))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.is_some())
    }

    async fn count_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let rows: Vec<(Option<Uuid>, i64)> = LikeEntity::find()
            .select_only()
            .column(like::Column::PostId)
            .column_as(Expr::col(like::Column::Id).count(), "like_count")
            .filter(like::Column::PostId.is_in(post_ids.iter().copied()))
            .filter(like::Column::CommentId.is_null())
            .group_by(like::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(post_id, count)| Some((post_id?, count.max(0) as u64)))
            .collect())
    }

    async fn liked_posts(
        &self,
        post_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashSet<Uuid>, RepoError> {
        let rows: Vec<Option<Uuid>> = LikeEntity::find()
            .select_only()
            .column(like::Column::PostId)
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.is_in(post_ids.iter().copied()))
            .filter(like::Column::CommentId.is_null())
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().flatten().collect())
    }
}
