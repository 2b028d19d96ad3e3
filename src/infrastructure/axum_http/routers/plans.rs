use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::{
    application::usecases::{authentication::AuthenticationUseCase, plans::PlanUseCase},
    auth::authorize,
    domain::{
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository,
            users::UserRepository,
        },
        value_objects::plans::{EditPlanModel, InsertPlanModel},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{plans::PlanPostgres, subscriptions::SubscriptionPostgres},
    },
};

pub fn routes<A>(
    db_pool: Arc<PgPoolSquad>,
    authentication_usecase: Arc<AuthenticationUseCase<A>>,
) -> Router
where
    A: UserRepository + Send + Sync + 'static,
{
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_usecase = PlanUseCase::new(
        Arc::new(plan_repository),
        Arc::new(subscription_repository),
    );

    router(plan_usecase, authentication_usecase)
}

/// Reads are public; writes go through the bearer middleware.
pub fn router<P, S, A>(
    plan_usecase: PlanUseCase<P, S>,
    authentication_usecase: Arc<AuthenticationUseCase<A>>,
) -> Router
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: UserRepository + Send + Sync + 'static,
{
    let require_auth = middleware::from_fn_with_state(authentication_usecase, authorize::<A>);

    Router::new()
        .route(
            "/",
            get(list::<P, S>).merge(post(create::<P, S>).route_layer(require_auth.clone())),
        )
        .route(
            "/:plan_id",
            get(get_plan::<P, S>).merge(
                put(update::<P, S>)
                    .delete(delete::<P, S>)
                    .route_layer(require_auth),
            ),
        )
        .with_state(Arc::new(plan_usecase))
}

pub async fn create<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    Json(insert_plan_model): Json<InsertPlanModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match plan_usecase.create(insert_plan_model).await {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match plan_usecase.list().await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_plan<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    Path(plan_id): Path<i64>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match plan_usecase.get(plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    Path(plan_id): Path<i64>,
    Json(edit_plan_model): Json<EditPlanModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match plan_usecase.update(plan_id, edit_plan_model).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete<P, S>(
    State(plan_usecase): State<Arc<PlanUseCase<P, S>>>,
    Path(plan_id): Path<i64>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match plan_usecase.delete(plan_id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(err) => err.into_response(),
    }
}
