use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    auth::AuthUser,
    domain::{
        entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
        repositories::{
            magazines::MagazineRepository, plans::PlanRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::{
            iam::MessageModel,
            subscriptions::{EditSubscriptionModel, InsertSubscriptionModel, SubscriptionModel},
        },
    },
};

pub struct SubscriptionUseCase<S, U, M, P>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MagazineRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    subscription_repository: Arc<S>,
    user_repository: Arc<U>,
    magazine_repository: Arc<M>,
    plan_repository: Arc<P>,
}

impl<S, U, M, P> SubscriptionUseCase<S, U, M, P>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MagazineRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(
        subscription_repository: Arc<S>,
        user_repository: Arc<U>,
        magazine_repository: Arc<M>,
        plan_repository: Arc<P>,
    ) -> Self {
        Self {
            subscription_repository,
            user_repository,
            magazine_repository,
            plan_repository,
        }
    }

    pub async fn create(
        &self,
        requested_by: &AuthUser,
        insert_subscription_model: InsertSubscriptionModel,
    ) -> UseCaseResult<SubscriptionModel> {
        let user_id = insert_subscription_model.user_id;
        let magazine_id = insert_subscription_model.magazine_id;
        let plan_id = insert_subscription_model.plan_id;
        info!(
            requested_by = requested_by.user_id,
            user_id, magazine_id, plan_id, "subscriptions: create requested"
        );
        require_same_user(requested_by, user_id)?;

        let plan = self
            .resolve_references(user_id, magazine_id, plan_id)
            .await?;

        let insert_subscription_entity = insert_subscription_model
            .to_entity(&plan, Utc::now())
            .map_err(|err| {
                warn!(plan_id, error = %err, "subscriptions: plan period cannot be scheduled");
                err
            })?;

        let subscription = self
            .subscription_repository
            .create(insert_subscription_entity)
            .await
            .map_err(|err| {
                error!(user_id, plan_id, db_error = ?err, "subscriptions: failed to create subscription");
                UseCaseError::Internal(err)
            })?;

        info!(
            subscription_id = subscription.id,
            user_id,
            renewal_date = %subscription.renewal_date,
            "subscriptions: subscription created"
        );
        Ok(SubscriptionModel::from(subscription))
    }

    pub async fn list_for_user(
        &self,
        requested_by: &AuthUser,
        user_id: i64,
    ) -> UseCaseResult<Vec<SubscriptionModel>> {
        require_same_user(requested_by, user_id)?;

        let subscriptions = self
            .subscription_repository
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "subscriptions: failed to list subscriptions");
                UseCaseError::Internal(err)
            })?;

        if subscriptions.is_empty() {
            info!(user_id, "subscriptions: user has no subscriptions");
            return Err(UseCaseError::not_found("Subscriptions not found"));
        }

        Ok(subscriptions
            .into_iter()
            .map(SubscriptionModel::from)
            .collect())
    }

    /// Replaces an active subscription with a new row linked back through
    /// `previous_subscription_id`. The old row is kept, inactive.
    pub async fn modify(
        &self,
        requested_by: &AuthUser,
        subscription_id: i64,
        edit_subscription_model: EditSubscriptionModel,
    ) -> UseCaseResult<SubscriptionModel> {
        edit_subscription_model.validate()?;
        info!(
            requested_by = requested_by.user_id,
            subscription_id, "subscriptions: modify requested"
        );
        require_same_user(requested_by, edit_subscription_model.user_id)?;

        self.require_owned_active(requested_by, subscription_id)
            .await?;

        self.resolve_references(
            edit_subscription_model.user_id,
            edit_subscription_model.magazine_id,
            edit_subscription_model.plan_id,
        )
        .await?;

        let replacement = self
            .subscription_repository
            .supersede(
                subscription_id,
                edit_subscription_model.to_entity(subscription_id, Utc::now())?,
            )
            .await
            .map_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: failed to supersede subscription");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(subscription_id, "subscriptions: subscription deactivated concurrently");
                UseCaseError::not_found("Subscription not found")
            })?;

        info!(
            subscription_id,
            replacement_id = replacement.id,
            "subscriptions: subscription modified"
        );
        Ok(SubscriptionModel::from(replacement))
    }

    pub async fn delete(
        &self,
        requested_by: &AuthUser,
        subscription_id: i64,
    ) -> UseCaseResult<MessageModel> {
        info!(
            requested_by = requested_by.user_id,
            subscription_id, "subscriptions: delete requested"
        );

        self.require_owned_active(requested_by, subscription_id)
            .await?;

        let deactivated = self
            .subscription_repository
            .deactivate(subscription_id)
            .await
            .map_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: failed to deactivate subscription");
                UseCaseError::Internal(err)
            })?;

        if !deactivated {
            warn!(subscription_id, "subscriptions: subscription deactivated concurrently");
            return Err(UseCaseError::not_found("Subscription not found"));
        }

        info!(subscription_id, "subscriptions: subscription deactivated");
        Ok(MessageModel::new("Subscription deleted successfully"))
    }

    /// Another user's subscription reads as missing.
    async fn require_owned_active(
        &self,
        requested_by: &AuthUser,
        subscription_id: i64,
    ) -> UseCaseResult<SubscriptionEntity> {
        let current = self
            .subscription_repository
            .find_active_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: failed to load subscription");
                UseCaseError::Internal(err)
            })?;

        match current {
            Some(subscription) if subscription.user_id == requested_by.user_id => Ok(subscription),
            Some(subscription) => {
                warn!(
                    subscription_id,
                    owner = subscription.user_id,
                    requested_by = requested_by.user_id,
                    "subscriptions: subscription belongs to another user"
                );
                Err(UseCaseError::not_found("Subscription not found"))
            }
            None => {
                warn!(subscription_id, "subscriptions: no active subscription");
                Err(UseCaseError::not_found("Subscription not found"))
            }
        }
    }

    async fn resolve_references(
        &self,
        user_id: i64,
        magazine_id: i64,
        plan_id: i64,
    ) -> UseCaseResult<PlanEntity> {
        let user = self.user_repository.find_by_id(user_id).await.map_err(|err| {
            error!(user_id, db_error = ?err, "subscriptions: failed to load user");
            UseCaseError::Internal(err)
        })?;
        if user.is_none() {
            warn!(user_id, "subscriptions: user not found");
            return Err(UseCaseError::not_found("User not found"));
        }

        let magazine = self
            .magazine_repository
            .find_by_id(magazine_id)
            .await
            .map_err(|err| {
                error!(magazine_id, db_error = ?err, "subscriptions: failed to load magazine");
                UseCaseError::Internal(err)
            })?;
        if magazine.is_none() {
            warn!(magazine_id, "subscriptions: magazine not found");
            return Err(UseCaseError::not_found("Magazine not found"));
        }

        self.plan_repository
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(plan_id, db_error = ?err, "subscriptions: failed to load plan");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(plan_id, "subscriptions: plan not found");
                UseCaseError::not_found("Plan not found")
            })
    }
}

fn require_same_user(requested_by: &AuthUser, user_id: i64) -> UseCaseResult<()> {
    if requested_by.user_id != user_id {
        warn!(
            user_id,
            requested_by = requested_by.user_id,
            "subscriptions: attempt to act on another user's subscriptions"
        );
        return Err(UseCaseError::Unauthorized(
            "Cannot manage another user's subscriptions".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            magazines::MagazineEntity,
            subscriptions::InsertSubscriptionEntity,
            users::UserEntity,
        },
        repositories::{
            magazines::MockMagazineRepository, plans::MockPlanRepository,
            subscriptions::MockSubscriptionRepository, users::MockUserRepository,
        },
    };
    use chrono::Duration;
    use mockall::predicate::eq;
    use std::sync::Mutex;

    type TestUseCase = SubscriptionUseCase<
        MockSubscriptionRepository,
        MockUserRepository,
        MockMagazineRepository,
        MockPlanRepository,
    >;

    fn sample_user(id: i64) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_magazine(id: i64) -> MagazineEntity {
        let now = Utc::now();
        MagazineEntity {
            id,
            title: "Wired".to_string(),
            description: "Monthly".to_string(),
            price: 5.0,
            discount: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn gold_plan(id: i64) -> PlanEntity {
        let now = Utc::now();
        PlanEntity {
            id,
            title: "Gold".to_string(),
            description: "Print and digital".to_string(),
            price: 12.5,
            renewal_period_days: 30,
            tier: "premium".to_string(),
            discount: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn stored(id: i64, entity: InsertSubscriptionEntity) -> SubscriptionEntity {
        SubscriptionEntity {
            id,
            user_id: entity.user_id,
            magazine_id: entity.magazine_id,
            plan_id: entity.plan_id,
            price: entity.price,
            renewal_date: entity.renewal_date,
            is_active: entity.is_active,
            previous_subscription_id: entity.previous_subscription_id,
            created_at: entity.created_at,
        }
    }

    fn existing_references() -> (MockUserRepository, MockMagazineRepository, MockPlanRepository) {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));

        let mut magazine_repository = MockMagazineRepository::new();
        magazine_repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_magazine(id))));

        let mut plan_repository = MockPlanRepository::new();
        plan_repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(gold_plan(id))));

        (user_repository, magazine_repository, plan_repository)
    }

    fn usecase(
        subscription_repository: MockSubscriptionRepository,
        user_repository: MockUserRepository,
        magazine_repository: MockMagazineRepository,
        plan_repository: MockPlanRepository,
    ) -> TestUseCase {
        SubscriptionUseCase::new(
            Arc::new(subscription_repository),
            Arc::new(user_repository),
            Arc::new(magazine_repository),
            Arc::new(plan_repository),
        )
    }

    fn alice() -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "alice".to_string(),
        }
    }

    fn owned_by(user_id: i64, id: i64) -> SubscriptionEntity {
        let mut subscription = stored(
            id,
            insert_model()
                .to_entity(&gold_plan(3), Utc::now())
                .unwrap(),
        );
        subscription.user_id = user_id;
        subscription
    }

    fn edit_model(plan_id: i64) -> EditSubscriptionModel {
        EditSubscriptionModel {
            user_id: 1,
            magazine_id: 5,
            plan_id,
            price: 4.0,
        }
    }

    fn insert_model() -> InsertSubscriptionModel {
        InsertSubscriptionModel {
            user_id: 1,
            magazine_id: 2,
            plan_id: 3,
        }
    }

    #[tokio::test]
    async fn gold_plan_renews_thirty_days_after_creation() {
        let (user_repository, magazine_repository, plan_repository) = existing_references();

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_create()
            .withf(|entity| entity.plan_id == 3 && entity.price == 12.5 && entity.is_active)
            .times(1)
            .returning(|entity| Ok(stored(10, entity)));

        let subscription = usecase(
            subscription_repository,
            user_repository,
            magazine_repository,
            plan_repository,
        )
        .create(&alice(), insert_model())
        .await
        .unwrap();

        assert_eq!(subscription.id, 10);
        assert_eq!(subscription.previous_subscription_id, None);
        assert_eq!(
            subscription.renewal_date - subscription.created_at,
            Duration::days(30)
        );
    }

    #[tokio::test]
    async fn create_with_unknown_plan_persists_nothing() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        let mut magazine_repository = MockMagazineRepository::new();
        magazine_repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_magazine(id))));
        let mut plan_repository = MockPlanRepository::new();
        plan_repository
            .expect_find_by_id()
            .with(eq(3))
            .returning(|_| Ok(None));

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_create().never();

        let result = usecase(
            subscription_repository,
            user_repository,
            magazine_repository,
            plan_repository,
        )
        .create(&alice(), insert_model())
        .await;

        match result {
            Err(UseCaseError::NotFound(message)) => assert_eq!(message, "Plan not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_with_unknown_user_stops_before_other_lookups() {
        let mut user_repository = MockUserRepository::new();
        user_repository.expect_find_by_id().returning(|_| Ok(None));
        let mut magazine_repository = MockMagazineRepository::new();
        magazine_repository.expect_find_by_id().never();
        let mut plan_repository = MockPlanRepository::new();
        plan_repository.expect_find_by_id().never();
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_create().never();

        let result = usecase(
            subscription_repository,
            user_repository,
            magazine_repository,
            plan_repository,
        )
        .create(&alice(), insert_model())
        .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_on_a_plan_past_the_calendar_is_rejected() {
        let (user_repository, magazine_repository, _) = existing_references();
        let mut plan_repository = MockPlanRepository::new();
        plan_repository.expect_find_by_id().returning(|id| {
            let mut plan = gold_plan(id);
            plan.renewal_period_days = 100_000_000;
            Ok(Some(plan))
        });
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_create().never();

        let result = usecase(
            subscription_repository,
            user_repository,
            magazine_repository,
            plan_repository,
        )
        .create(&alice(), insert_model())
        .await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn create_for_another_user_is_unauthorized() {
        let mut user_repository = MockUserRepository::new();
        user_repository.expect_find_by_id().never();
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_create().never();

        let result = usecase(
            subscription_repository,
            user_repository,
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .create(
            &alice(),
            InsertSubscriptionModel {
                user_id: 2,
                ..insert_model()
            },
        )
        .await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn list_without_rows_is_not_found() {
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_list_by_user()
            .with(eq(1))
            .returning(|_| Ok(vec![]));

        let result = usecase(
            subscription_repository,
            MockUserRepository::new(),
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .list_for_user(&alice(), 1)
        .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_includes_inactive_rows() {
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_list_by_user().returning(|user_id| {
            let active = owned_by(user_id, 11);
            let mut superseded = owned_by(user_id, 10);
            superseded.is_active = false;
            Ok(vec![active, superseded])
        });

        let subscriptions = usecase(
            subscription_repository,
            MockUserRepository::new(),
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .list_for_user(&alice(), 1)
        .await
        .unwrap();

        assert_eq!(subscriptions.len(), 2);
        assert!(subscriptions[0].is_active);
        assert!(!subscriptions[1].is_active);
    }

    #[tokio::test]
    async fn list_of_another_users_subscriptions_is_unauthorized() {
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_list_by_user().never();

        let result = usecase(
            subscription_repository,
            MockUserRepository::new(),
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .list_for_user(&alice(), 2)
        .await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn modify_links_the_replacement_to_the_old_row() {
        let (user_repository, magazine_repository, plan_repository) = existing_references();

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_active_by_id()
            .with(eq(10))
            .returning(|id| Ok(Some(owned_by(1, id))));
        subscription_repository
            .expect_supersede()
            .withf(|id, replacement| {
                *id == 10
                    && replacement.previous_subscription_id == Some(10)
                    && replacement.price == 4.0
                    && replacement.magazine_id == 5
            })
            .times(1)
            .returning(|_, replacement| Ok(Some(stored(11, replacement))));

        let replacement = usecase(
            subscription_repository,
            user_repository,
            magazine_repository,
            plan_repository,
        )
        .modify(&alice(), 10, edit_model(3))
        .await
        .unwrap();

        assert_eq!(replacement.id, 11);
        assert_eq!(replacement.previous_subscription_id, Some(10));
        assert!(replacement.is_active);
        assert_eq!(
            replacement.renewal_date - replacement.created_at,
            Duration::days(30)
        );
    }

    #[tokio::test]
    async fn modify_of_inactive_subscription_is_not_found() {
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_active_by_id()
            .returning(|_| Ok(None));
        subscription_repository.expect_supersede().never();

        let result = usecase(
            subscription_repository,
            MockUserRepository::new(),
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .modify(&alice(), 10, edit_model(3))
        .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn modify_with_unknown_plan_writes_nothing() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        let mut magazine_repository = MockMagazineRepository::new();
        magazine_repository
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_magazine(id))));
        let mut plan_repository = MockPlanRepository::new();
        plan_repository
            .expect_find_by_id()
            .with(eq(99))
            .times(1)
            .returning(|_| Ok(None));

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_active_by_id()
            .returning(|id| Ok(Some(owned_by(1, id))));
        subscription_repository.expect_supersede().never();

        let result = usecase(
            subscription_repository,
            user_repository,
            magazine_repository,
            plan_repository,
        )
        .modify(&alice(), 10, edit_model(99))
        .await;

        match result {
            Err(UseCaseError::NotFound(message)) => assert_eq!(message, "Plan not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn modify_of_another_users_subscription_is_not_found() {
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_active_by_id()
            .returning(|id| Ok(Some(owned_by(2, id))));
        subscription_repository.expect_supersede().never();
        let mut user_repository = MockUserRepository::new();
        user_repository.expect_find_by_id().never();

        let result = usecase(
            subscription_repository,
            user_repository,
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .modify(&alice(), 77, edit_model(3))
        .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn modify_cannot_hand_a_subscription_to_another_user() {
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository.expect_find_active_by_id().never();
        subscription_repository.expect_supersede().never();

        let result = usecase(
            subscription_repository,
            MockUserRepository::new(),
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .modify(
            &alice(),
            10,
            EditSubscriptionModel {
                user_id: 2,
                ..edit_model(3)
            },
        )
        .await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found_the_second_time() {
        let active = Arc::new(Mutex::new(true));
        let lookup_state = Arc::clone(&active);
        let deactivate_state = Arc::clone(&active);

        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_active_by_id()
            .with(eq(10))
            .times(2)
            .returning(move |id| {
                let active = lookup_state.lock().unwrap();
                Ok((*active).then(|| owned_by(1, id)))
            });
        subscription_repository
            .expect_deactivate()
            .with(eq(10))
            .times(1)
            .returning(move |_| {
                let mut active = deactivate_state.lock().unwrap();
                let was_active = *active;
                *active = false;
                Ok(was_active)
            });

        let usecase = usecase(
            subscription_repository,
            MockUserRepository::new(),
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        );

        assert!(usecase.delete(&alice(), 10).await.is_ok());
        assert!(matches!(
            usecase.delete(&alice(), 10).await,
            Err(UseCaseError::NotFound(_))
        ));
        assert!(!*active.lock().unwrap());
    }

    #[tokio::test]
    async fn delete_of_another_users_subscription_leaves_it_active() {
        let mut subscription_repository = MockSubscriptionRepository::new();
        subscription_repository
            .expect_find_active_by_id()
            .with(eq(77))
            .returning(|id| Ok(Some(owned_by(2, id))));
        subscription_repository.expect_deactivate().never();

        let result = usecase(
            subscription_repository,
            MockUserRepository::new(),
            MockMagazineRepository::new(),
            MockPlanRepository::new(),
        )
        .delete(&alice(), 77)
        .await;

        match result {
            Err(UseCaseError::NotFound(message)) => assert_eq!(message, "Subscription not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
