//! Shared plumbing for the SeaORM-backed repositories.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityName, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, SqlErr,
};

use minilinkedin_core::error::RepoError;
use minilinkedin_core::ports::BaseRepository;

/// A repository over one SeaORM entity. The user and post repositories are
/// aliases of this type with their own trait impls on top.
pub struct PostgresBaseRepository<E: EntityTrait> {
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> PostgresBaseRepository<E> {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Translate a driver error into the storage error the services understand.
///
/// Unique violations (the users email index) and foreign key violations (a
/// post whose author vanished) become `Constraint`.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(violation) = err.sql_err() {
        match violation {
            SqlErr::UniqueConstraintViolation(detail) => {
                tracing::debug!(%detail, "Unique constraint violated");
                return RepoError::Constraint("Record already exists".to_string());
            }
            SqlErr::ForeignKeyConstraintViolation(detail) => {
                tracing::debug!(%detail, "Foreign key violated");
                return RepoError::Constraint("Referenced record does not exist".to_string());
            }
            _ => {}
        }
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync + 'static,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let row = E::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;

        Ok(row.map(T::from))
    }

    async fn insert(&self, record: T) -> Result<T, RepoError> {
        let active: E::ActiveModel = record.into();
        let row = active.insert(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(table = E::default().table_name(), "Row inserted");

        Ok(T::from(row))
    }
}
