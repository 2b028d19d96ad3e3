use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult, is_unique_violation},
    domain::{
        entities::magazines::MagazineEntity,
        repositories::{magazines::MagazineRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            iam::MessageModel,
            magazines::{EditMagazineModel, InsertMagazineModel, MagazineModel},
        },
    },
};

pub struct MagazineUseCase<M, S>
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    magazine_repository: Arc<M>,
    subscription_repository: Arc<S>,
}

impl<M, S> MagazineUseCase<M, S>
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(magazine_repository: Arc<M>, subscription_repository: Arc<S>) -> Self {
        Self {
            magazine_repository,
            subscription_repository,
        }
    }

    pub async fn create(&self, insert_magazine_model: InsertMagazineModel) -> UseCaseResult<MagazineModel> {
        insert_magazine_model.validate()?;
        let title = insert_magazine_model.title.trim().to_string();
        info!(%title, "magazines: create requested");

        if self.find_by_title(&title).await?.is_some() {
            warn!(%title, "magazines: title already exists");
            return Err(UseCaseError::conflict("Magazine already exists"));
        }

        let magazine = self
            .magazine_repository
            .create(insert_magazine_model.to_entity())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(%title, "magazines: title taken by a concurrent create");
                    return UseCaseError::conflict("Magazine already exists");
                }
                error!(%title, db_error = ?err, "magazines: failed to create magazine");
                UseCaseError::Internal(err)
            })?;

        info!(magazine_id = magazine.id, "magazines: magazine created");
        Ok(MagazineModel::from(magazine))
    }

    pub async fn list(&self) -> UseCaseResult<Vec<MagazineModel>> {
        let magazines = self.magazine_repository.list().await.map_err(|err| {
            error!(db_error = ?err, "magazines: failed to list magazines");
            UseCaseError::Internal(err)
        })?;

        info!(magazine_count = magazines.len(), "magazines: magazines loaded");
        Ok(magazines.into_iter().map(MagazineModel::from).collect())
    }

    pub async fn get(&self, magazine_id: i64) -> UseCaseResult<MagazineModel> {
        let magazine = self.require_magazine(magazine_id).await?;
        Ok(MagazineModel::from(magazine))
    }

    pub async fn update(
        &self,
        magazine_id: i64,
        edit_magazine_model: EditMagazineModel,
    ) -> UseCaseResult<MagazineModel> {
        edit_magazine_model.validate()?;
        info!(magazine_id, "magazines: update requested");

        self.require_magazine(magazine_id).await?;

        let title = edit_magazine_model.title.trim().to_string();
        if let Some(existing) = self.find_by_title(&title).await? {
            if existing.id != magazine_id {
                warn!(magazine_id, %title, "magazines: title belongs to another magazine");
                return Err(UseCaseError::conflict("Magazine already exists"));
            }
        }

        let magazine = self
            .magazine_repository
            .update(magazine_id, edit_magazine_model.to_entity())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(magazine_id, "magazines: title taken by a concurrent write");
                    return UseCaseError::conflict("Magazine already exists");
                }
                error!(magazine_id, db_error = ?err, "magazines: failed to update magazine");
                UseCaseError::Internal(err)
            })?;

        Ok(MagazineModel::from(magazine))
    }

    pub async fn delete(&self, magazine_id: i64) -> UseCaseResult<MessageModel> {
        info!(magazine_id, "magazines: delete requested");
        self.require_magazine(magazine_id).await?;

        let referenced = self
            .subscription_repository
            .exists_for_magazine(magazine_id)
            .await
            .map_err(|err| {
                error!(magazine_id, db_error = ?err, "magazines: failed to check subscriptions");
                UseCaseError::Internal(err)
            })?;
        if referenced {
            warn!(magazine_id, "magazines: magazine still has subscriptions");
            return Err(UseCaseError::conflict(
                "Magazine is referenced by subscriptions",
            ));
        }

        self.magazine_repository
            .delete(magazine_id)
            .await
            .map_err(|err| {
                error!(magazine_id, db_error = ?err, "magazines: failed to delete magazine");
                UseCaseError::Internal(err)
            })?;

        info!(magazine_id, "magazines: magazine deleted");
        Ok(MessageModel::new("Magazine deleted successfully"))
    }

    async fn require_magazine(
        &self,
        magazine_id: i64,
    ) -> UseCaseResult<MagazineEntity> {
        self.magazine_repository
            .find_by_id(magazine_id)
            .await
            .map_err(|err| {
                error!(magazine_id, db_error = ?err, "magazines: failed to load magazine");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::not_found("Magazine not found"))
    }

    async fn find_by_title(
        &self,
        title: &str,
    ) -> UseCaseResult<Option<MagazineEntity>> {
        self.magazine_repository
            .find_by_title(title.to_string())
            .await
            .map_err(|err| {
                error!(%title, db_error = ?err, "magazines: failed to look up title");
                UseCaseError::Internal(err)
            })
    }
}
