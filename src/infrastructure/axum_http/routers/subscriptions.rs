use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;

use crate::{
    application::usecases::{
        authentication::AuthenticationUseCase, subscriptions::SubscriptionUseCase,
    },
    auth::{AuthUser, authorize},
    domain::{
        repositories::{
            magazines::MagazineRepository, plans::PlanRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::subscriptions::{EditSubscriptionModel, InsertSubscriptionModel},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{
            magazines::MagazinePostgres, plans::PlanPostgres, subscriptions::SubscriptionPostgres,
            users::UserPostgres,
        },
    },
};

pub fn routes<A>(
    db_pool: Arc<PgPoolSquad>,
    authentication_usecase: Arc<AuthenticationUseCase<A>>,
) -> Router
where
    A: UserRepository + Send + Sync + 'static,
{
    let subscription_usecase = SubscriptionUseCase::new(
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MagazinePostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
    );

    router(subscription_usecase, authentication_usecase)
}

/// Every subscription route requires a bearer token and acts only on the
/// caller's own rows. `/:id` is a user id for GET and a subscription id for
/// PUT and DELETE.
pub fn router<S, U, M, P, A>(
    subscription_usecase: SubscriptionUseCase<S, U, M, P>,
    authentication_usecase: Arc<AuthenticationUseCase<A>>,
) -> Router
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MagazineRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    A: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(create::<S, U, M, P>))
        .route(
            "/:id",
            get(list_for_user::<S, U, M, P>)
                .put(modify::<S, U, M, P>)
                .delete(delete::<S, U, M, P>),
        )
        .route_layer(middleware::from_fn_with_state(
            authentication_usecase,
            authorize::<A>,
        ))
        .with_state(Arc::new(subscription_usecase))
}

pub async fn create<S, U, M, P>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, U, M, P>>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(insert_subscription_model): Json<InsertSubscriptionModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MagazineRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    info!(requested_by = auth_user.user_id, "subscriptions router: create");
    match subscription_usecase
        .create(&auth_user, insert_subscription_model)
        .await
    {
        Ok(subscription) => (StatusCode::CREATED, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_for_user<S, U, M, P>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, U, M, P>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MagazineRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    info!(requested_by = auth_user.user_id, user_id, "subscriptions router: list");
    match subscription_usecase.list_for_user(&auth_user, user_id).await {
        Ok(subscriptions) => (StatusCode::OK, Json(subscriptions)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn modify<S, U, M, P>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, U, M, P>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(subscription_id): Path<i64>,
    Json(edit_subscription_model): Json<EditSubscriptionModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MagazineRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    info!(requested_by = auth_user.user_id, subscription_id, "subscriptions router: modify");
    match subscription_usecase
        .modify(&auth_user, subscription_id, edit_subscription_model)
        .await
    {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete<S, U, M, P>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, U, M, P>>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(subscription_id): Path<i64>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MagazineRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    info!(requested_by = auth_user.user_id, subscription_id, "subscriptions router: delete");
    match subscription_usecase.delete(&auth_user, subscription_id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(err) => err.into_response(),
    }
}
