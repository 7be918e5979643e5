//! Like entity for SeaORM.
//!
//! The target is stored as two nullable columns; a CHECK constraint in the
//! schema keeps exactly one of them set.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use thoughtlane_core::domain::{Like, LikeTarget};
use thoughtlane_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "likes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(nullable)]
    pub post_id: Option<Uuid>,
    #[sea_orm(nullable)]
    pub comment_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id",
        on_delete = "Cascade"
    )]
    Comment,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Like {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let target = LikeTarget::from_columns(model.post_id, model.comment_id).ok_or_else(|| {
            RepoError::Corrupt(format!("like {} has no single target", model.id))
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            target,
            created_at: model.created_at.into(),
        })
    }
}

impl From<Like> for ActiveModel {
    fn from(like: Like) -> Self {
        Self {
            id: Set(like.id),
            user_id: Set(like.user_id),
            post_id: Set(like.target.post_id()),
            comment_id: Set(like.target.comment_id()),
            created_at: Set(like.created_at.into()),
        }
    }
}

/// Rows addressing exactly this target, with the other column null.
pub fn target_condition(target: LikeTarget) -> sea_orm::Condition {
    match target {
        LikeTarget::Post(id) => sea_orm::Condition::all()
            .add(Column::PostId.eq(id))
            .add(Column::CommentId.is_null()),
        LikeTarget::Comment(id) => sea_orm::Condition::all()
            .add(Column::CommentId.eq(id))
            .add(Column::PostId.is_null()),
    }
}
