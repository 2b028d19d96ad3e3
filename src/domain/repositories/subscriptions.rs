use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn create(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    /// Every row for the user, active and superseded, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<SubscriptionEntity>>;

    async fn find_active_by_id(&self, subscription_id: i64) -> Result<Option<SubscriptionEntity>>;

    /// Deactivates `subscription_id` and appends its replacement in one transaction.
    /// Returns `None` when the row was no longer active, in which case nothing is written.
    async fn supersede(
        &self,
        subscription_id: i64,
        replacement: InsertSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Flips `is_active` to false. Returns whether an active row was changed.
    async fn deactivate(&self, subscription_id: i64) -> Result<bool>;

    async fn exists_for_magazine(&self, magazine_id: i64) -> Result<bool>;
    async fn exists_for_plan(&self, plan_id: i64) -> Result<bool>;
}
