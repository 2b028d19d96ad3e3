use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult, is_unique_violation},
    domain::{
        entities::plans::PlanEntity,
        repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            iam::MessageModel,
            plans::{EditPlanModel, InsertPlanModel, PlanModel},
        },
    },
};

pub struct PlanUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_repository: Arc<P>,
    subscription_repository: Arc<S>,
}

impl<P, S> PlanUseCase<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(plan_repository: Arc<P>, subscription_repository: Arc<S>) -> Self {
        Self {
            plan_repository,
            subscription_repository,
        }
    }

    pub async fn create(&self, insert_plan_model: InsertPlanModel) -> UseCaseResult<PlanModel> {
        insert_plan_model.validate()?;
        let title = insert_plan_model.title.trim().to_string();
        info!(%title, tier = %insert_plan_model.tier, "plans: create requested");

        if self.find_by_title(&title).await?.is_some() {
            warn!(%title, "plans: title already exists");
            return Err(UseCaseError::conflict("Plan already exists"));
        }

        let plan = self
            .plan_repository
            .create(insert_plan_model.to_entity())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(%title, "plans: title taken by a concurrent create");
                    return UseCaseError::conflict("Plan already exists");
                }
                error!(%title, db_error = ?err, "plans: failed to create plan");
                UseCaseError::Internal(err)
            })?;

        info!(plan_id = plan.id, "plans: plan created");
        Ok(PlanModel::from(plan))
    }

    pub async fn list(&self) -> UseCaseResult<Vec<PlanModel>> {
        let plans = self.plan_repository.list().await.map_err(|err| {
            error!(db_error = ?err, "plans: failed to list plans");
            UseCaseError::Internal(err)
        })?;

        Ok(plans.into_iter().map(PlanModel::from).collect())
    }

    pub async fn get(&self, plan_id: i64) -> UseCaseResult<PlanModel> {
        let plan = self.require_plan(plan_id).await?;
        Ok(PlanModel::from(plan))
    }

    pub async fn update(&self, plan_id: i64, edit_plan_model: EditPlanModel) -> UseCaseResult<PlanModel> {
        edit_plan_model.validate()?;
        info!(plan_id, "plans: update requested");

        self.require_plan(plan_id).await?;

        let title = edit_plan_model.title.trim().to_string();
        if let Some(existing) = self.find_by_title(&title).await? {
            if existing.id != plan_id {
                warn!(plan_id, %title, "plans: title belongs to another plan");
                return Err(UseCaseError::conflict("Plan already exists"));
            }
        }

        let plan = self
            .plan_repository
            .update(plan_id, edit_plan_model.to_entity())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(plan_id, "plans: title taken by a concurrent write");
                    return UseCaseError::conflict("Plan already exists");
                }
                error!(plan_id, db_error = ?err, "plans: failed to update plan");
                UseCaseError::Internal(err)
            })?;

        Ok(PlanModel::from(plan))
    }

    pub async fn delete(&self, plan_id: i64) -> UseCaseResult<MessageModel> {
        info!(plan_id, "plans: delete requested");
        self.require_plan(plan_id).await?;

        let referenced = self
            .subscription_repository
            .exists_for_plan(plan_id)
            .await
            .map_err(|err| {
                error!(plan_id, db_error = ?err, "plans: failed to check subscriptions");
                UseCaseError::Internal(err)
            })?;
        if referenced {
            warn!(plan_id, "plans: plan still has subscriptions");
            return Err(UseCaseError::conflict("Plan is referenced by subscriptions"));
        }

        self.plan_repository.delete(plan_id).await.map_err(|err| {
            error!(plan_id, db_error = ?err, "plans: failed to delete plan");
            UseCaseError::Internal(err)
        })?;

        info!(plan_id, "plans: plan deleted");
        Ok(MessageModel::new("Plan deleted successfully"))
    }

    async fn require_plan(&self, plan_id: i64) -> UseCaseResult<PlanEntity> {
        self.plan_repository
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(plan_id, db_error = ?err, "plans: failed to load plan");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::not_found("Plan not found"))
    }

    async fn find_by_title(&self, title: &str) -> UseCaseResult<Option<PlanEntity>> {
        self.plan_repository
            .find_by_title(title.to_string())
            .await
            .map_err(|err| {
                error!(%title, db_error = ?err, "plans: failed to look up title");
                UseCaseError::Internal(err)
            })
    }
}
