pub mod password;
pub mod token;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    application::{errors::UseCaseError, usecases::authentication::AuthenticationUseCase},
    auth::token::TokenError,
    domain::repositories::users::UserRepository,
};

/// Caller identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Route layer for protected endpoints. Verifies the bearer token, re-resolves the user
/// and hands it to the handler as `Extension<AuthUser>`.
pub async fn authorize<U>(
    State(authentication_usecase): State<Arc<AuthenticationUseCase<U>>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, UseCaseError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(UseCaseError::Token(TokenError::MissingToken));
    };

    let auth_user = authentication_usecase.authenticate(bearer.token()).await?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
