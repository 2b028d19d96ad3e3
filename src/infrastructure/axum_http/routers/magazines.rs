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
    application::usecases::{authentication::AuthenticationUseCase, magazines::MagazineUseCase},
    auth::authorize,
    domain::{
        repositories::{
            magazines::MagazineRepository, subscriptions::SubscriptionRepository,
            users::UserRepository,
        },
        value_objects::magazines::{EditMagazineModel, InsertMagazineModel},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{magazines::MagazinePostgres, subscriptions::SubscriptionPostgres},
    },
};

pub fn routes<A>(
    db_pool: Arc<PgPoolSquad>,
    authentication_usecase: Arc<AuthenticationUseCase<A>>,
) -> Router
where
    A: UserRepository + Send + Sync + 'static,
{
    let magazine_repository = MagazinePostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let magazine_usecase = MagazineUseCase::new(
        Arc::new(magazine_repository),
        Arc::new(subscription_repository),
    );

    router(magazine_usecase, authentication_usecase)
}

/// Reads are public; writes go through the bearer middleware.
pub fn router<M, S, A>(
    magazine_usecase: MagazineUseCase<M, S>,
    authentication_usecase: Arc<AuthenticationUseCase<A>>,
) -> Router
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: UserRepository + Send + Sync + 'static,
{
    let require_auth = middleware::from_fn_with_state(authentication_usecase, authorize::<A>);

    Router::new()
        .route(
            "/",
            get(list::<M, S>).merge(post(create::<M, S>).route_layer(require_auth.clone())),
        )
        .route(
            "/:magazine_id",
            get(get_magazine::<M, S>).merge(
                put(update::<M, S>)
                    .delete(delete::<M, S>)
                    .route_layer(require_auth),
            ),
        )
        .with_state(Arc::new(magazine_usecase))
}

pub async fn create<M, S>(
    State(magazine_usecase): State<Arc<MagazineUseCase<M, S>>>,
    Json(insert_magazine_model): Json<InsertMagazineModel>,
) -> impl IntoResponse
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match magazine_usecase.create(insert_magazine_model).await {
        Ok(magazine) => (StatusCode::CREATED, Json(magazine)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list<M, S>(
    State(magazine_usecase): State<Arc<MagazineUseCase<M, S>>>,
) -> impl IntoResponse
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match magazine_usecase.list().await {
        Ok(magazines) => (StatusCode::OK, Json(magazines)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_magazine<M, S>(
    State(magazine_usecase): State<Arc<MagazineUseCase<M, S>>>,
    Path(magazine_id): Path<i64>,
) -> impl IntoResponse
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match magazine_usecase.get(magazine_id).await {
        Ok(magazine) => (StatusCode::OK, Json(magazine)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<M, S>(
    State(magazine_usecase): State<Arc<MagazineUseCase<M, S>>>,
    Path(magazine_id): Path<i64>,
    Json(edit_magazine_model): Json<EditMagazineModel>,
) -> impl IntoResponse
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match magazine_usecase.update(magazine_id, edit_magazine_model).await {
        Ok(magazine) => (StatusCode::OK, Json(magazine)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete<M, S>(
    State(magazine_usecase): State<Arc<MagazineUseCase<M, S>>>,
    Path(magazine_id): Path<i64>,
) -> impl IntoResponse
where
    M: MagazineRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    match magazine_usecase.delete(magazine_id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(err) => err.into_response(),
    }
}
