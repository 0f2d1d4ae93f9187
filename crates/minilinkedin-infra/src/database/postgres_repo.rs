//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use minilinkedin_core::domain::{Post, PostWithAuthor, ProfileChanges, User, UserWithPostCount};
use minilinkedin_core::error::RepoError;
use minilinkedin_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Mask an email for logging to avoid PII in logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        let count = UserEntity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn list_with_post_counts(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<UserWithPostCount>, RepoError> {
        tracing::debug!(skip, limit, "Listing users");

        let users = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        if users.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let counts: HashMap<Uuid, i64> = PostEntity::find()
            .select_only()
            .column(post::Column::AuthorId)
            .column_as(Expr::col(post::Column::Id).count(), "posts_count")
            .filter(post::Column::AuthorId.is_in(ids))
            .group_by(post::Column::AuthorId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .collect();

        Ok(users
            .into_iter()
            .map(|model| {
                let posts_count = counts.get(&model.id).copied().unwrap_or(0).max(0) as u64;
                UserWithPostCount {
                    user: model.into(),
                    posts_count,
                }
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        UserEntity::find().count(&self.db).await.map_err(map_db_err)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        let Some(model) = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(model.into()));
        }

        let mut active = model.into_active_model();
        if let Some(name) = &changes.name {
            active.name = Set(name.clone());
        }
        if let Some(bio) = &changes.bio {
            active.bio = Set(bio.clone());
        }
        active.updated_at = Set(updated_at.into());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(Some(model.into()))
    }
}

/// Posts under an optional author filter, newest first.
fn posts_query(author_id: Option<Uuid>) -> Select<PostEntity> {
    let query = PostEntity::find();
    match author_id {
        Some(author_id) => query.filter(post::Column::AuthorId.eq(author_id)),
        None => query,
    }
}

fn newest_first(query: Select<PostEntity>) -> Select<PostEntity> {
    query
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        row.map(|(post, author)| post.with_author(author))
            .transpose()
    }

    async fn list_with_authors(
        &self,
        author_id: Option<Uuid>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        tracing::debug!(?author_id, skip, limit, "Listing posts");

        let rows = newest_first(posts_query(author_id))
            .offset(skip)
            .limit(limit)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(post, author)| post.with_author(author))
            .collect()
    }

    async fn count(&self, author_id: Option<Uuid>) -> Result<u64, RepoError> {
        posts_query(author_id)
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn find_by_author(&self, author_id: Uuid, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = newest_first(posts_query(Some(author_id)))
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_content_if_owner(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let updated_at: DateTimeWithTimeZone = updated_at.into();

        let result = PostEntity::update_many()
            .col_expr(post::Column::Content, Expr::value(content.to_owned()))
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_if_owner(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}
