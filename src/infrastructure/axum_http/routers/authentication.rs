use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::post,
};

use crate::{
    application::usecases::authentication::AuthenticationUseCase,
    auth::{AuthUser, authorize},
    domain::{
        repositories::users::UserRepository,
        value_objects::iam::{ChangePasswordModel, LoginModel, MessageModel, RegisterUserModel},
    },
};

pub fn routes<U>(authentication_usecase: Arc<AuthenticationUseCase<U>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    let require_auth =
        middleware::from_fn_with_state(Arc::clone(&authentication_usecase), authorize::<U>);

    Router::new()
        .route("/login", post(login::<U>))
        .route("/register", post(register::<U>))
        .route("/logout", post(logout))
        .route(
            "/change-password",
            post(change_password::<U>).route_layer(require_auth),
        )
        .with_state(authentication_usecase)
}

pub async fn login<U>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U>>>,
    Json(login_model): Json<LoginModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match authentication_usecase.login(login_model).await {
        Ok(access_token) => (StatusCode::OK, Json(access_token)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn register<U>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match authentication_usecase.register(register_user_model).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn change_password<U>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U>>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(change_password_model): Json<ChangePasswordModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match authentication_usecase
        .change_password(&auth_user, change_password_model)
        .await
    {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> impl IntoResponse {
    (StatusCode::OK, Json(MessageModel::new("Logout successful"))).into_response()
}
