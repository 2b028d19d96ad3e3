use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::{
    application::errors::{UseCaseError, UseCaseResult, is_unique_violation},
    auth::{
        AuthUser,
        password::PasswordHasher,
        token::{Claims, TokenError, TokenIssuer},
    },
    domain::{
        repositories::users::UserRepository,
        value_objects::iam::{
            AccessTokenModel, ChangePasswordModel, LoginModel, MessageModel, RegisterUserModel,
        },
    },
};

pub struct AuthenticationUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
    password_hasher: Arc<PasswordHasher>,
    token_issuer: Arc<TokenIssuer>,
}

impl<U> AuthenticationUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        user_repository: Arc<U>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_issuer,
        }
    }

    pub async fn register(&self, register_user_model: RegisterUserModel) -> UseCaseResult<MessageModel> {
        register_user_model.validate()?;
        let username = register_user_model.username.trim().to_string();
        info!(%username, "authentication: register requested");

        let existing = self
            .user_repository
            .find_by_username(username.clone())
            .await
            .map_err(|err| {
                error!(%username, db_error = ?err, "authentication: failed to look up username");
                UseCaseError::Internal(err)
            })?;
        if existing.is_some() {
            warn!(
                %username,
                status = axum::http::StatusCode::CONFLICT.as_u16(),
                "authentication: username already taken"
            );
            return Err(UseCaseError::conflict("User already exists"));
        }

        let password_hash = self.hash_password(register_user_model.password.clone()).await?;

        let user_id = self
            .user_repository
            .register(register_user_model.to_entity(password_hash))
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(%username, "authentication: username taken by a concurrent register");
                    return UseCaseError::conflict("User already exists");
                }
                error!(%username, db_error = ?err, "authentication: failed to store user");
                UseCaseError::Internal(err)
            })?;

        info!(%username, user_id, "authentication: user registered");
        Ok(MessageModel::new("User created successfully"))
    }

    pub async fn login(&self, login_model: LoginModel) -> UseCaseResult<AccessTokenModel> {
        let username = login_model.username.trim().to_string();
        info!(%username, "authentication: login requested");

        let user = self
            .user_repository
            .find_by_username(username.clone())
            .await
            .map_err(|err| {
                error!(%username, db_error = ?err, "authentication: failed to look up username");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%username, "authentication: login for unknown user");
                UseCaseError::not_found("User not found")
            })?;

        if !self
            .verify_password(login_model.password, user.password_hash.clone())
            .await?
        {
            warn!(%username, "authentication: password mismatch");
            return Err(UseCaseError::Unauthorized("Invalid password".to_string()));
        }

        let access_token = self
            .token_issuer
            .issue(Claims::for_subject(user.username.clone()))
            .map_err(|err| {
                error!(%username, error = ?err, "authentication: failed to issue token");
                UseCaseError::Internal(err)
            })?;

        info!(%username, user_id = user.id, "authentication: login succeeded");
        Ok(AccessTokenModel::bearer(
            access_token,
            self.token_issuer.ttl_seconds(),
        ))
    }

    /// Only the account owner may change its password.
    pub async fn change_password(
        &self,
        requested_by: &AuthUser,
        change_password_model: ChangePasswordModel,
    ) -> UseCaseResult<MessageModel> {
        let username = change_password_model.username.trim().to_string();
        info!(%username, requested_by = %requested_by.username, "authentication: change password requested");

        if requested_by.username != username {
            warn!(
                %username,
                requested_by = %requested_by.username,
                "authentication: attempt to change another user's password"
            );
            return Err(UseCaseError::Unauthorized(
                "Cannot change another user's password".to_string(),
            ));
        }
        change_password_model.validate()?;

        let user = self
            .user_repository
            .find_by_username(username.clone())
            .await
            .map_err(|err| {
                error!(%username, db_error = ?err, "authentication: failed to look up username");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::not_found("User not found"))?;

        let password_hash = self
            .hash_password(change_password_model.new_password.clone())
            .await?;

        self.user_repository
            .change_password(user.id, change_password_model.to_entity(password_hash))
            .await
            .map_err(|err| {
                error!(%username, db_error = ?err, "authentication: failed to store new password");
                UseCaseError::Internal(err)
            })?;

        info!(%username, "authentication: password changed");
        Ok(MessageModel::new("Password changed successfully"))
    }

    /// Resolves a bearer token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> UseCaseResult<AuthUser> {
        let token_claims = self.token_issuer.verify(token).map_err(|err| {
            warn!(error = %err, "authentication: bearer token rejected");
            err
        })?;
        let username = token_claims.subject().to_string();

        let user = self
            .user_repository
            .find_by_username(username.clone())
            .await
            .map_err(|err| {
                error!(%username, db_error = ?err, "authentication: failed to resolve token subject");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%username, "authentication: token subject has no user");
                UseCaseError::Token(TokenError::UnknownSubject)
            })?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }

    async fn hash_password(&self, password: String) -> UseCaseResult<String> {
        let password_hasher = Arc::clone(&self.password_hasher);
        let password_hash = tokio::task::spawn_blocking(move || password_hasher.hash(&password))
            .await
            .context("password hashing task failed")??;
        Ok(password_hash)
    }

    async fn verify_password(&self, password: String, password_hash: String) -> UseCaseResult<bool> {
        let password_hasher = Arc::clone(&self.password_hasher);
        let verified =
            tokio::task::spawn_blocking(move || password_hasher.verify(&password, &password_hash))
                .await
                .context("password verification task failed")?;
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::test_support::{cheap_hasher, test_issuer},
        domain::{
            entities::users::{ChangePasswordEntity, RegisterUserEntity, UserEntity},
            repositories::users::MockUserRepository,
        },
    };
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;
    use std::sync::Mutex;

    fn sample_user(username: &str, password: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: 1,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: cheap_hasher().hash(password).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn usecase<U>(user_repository: U) -> AuthenticationUseCase<U>
    where
        U: UserRepository + Send + Sync + 'static,
    {
        AuthenticationUseCase::new(
            Arc::new(user_repository),
            Arc::new(cheap_hasher()),
            Arc::new(test_issuer()),
        )
    }

    fn register_model(username: &str, password: &str) -> RegisterUserModel {
        RegisterUserModel {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
        }
    }

    /// Keeps registered users in memory so a flow can register, log in and retry.
    #[derive(Default)]
    struct InMemoryUsers {
        users: Mutex<Vec<UserEntity>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryUsers {
        async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|user| user.id == user_id).cloned())
        }

        async fn find_by_username(&self, username: String) -> Result<Option<UserEntity>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|user| user.username == username).cloned())
        }

        async fn register(&self, entity: RegisterUserEntity) -> Result<i64> {
            let mut users = self.users.lock().unwrap();
            let id = users.len() as i64 + 1;
            users.push(UserEntity {
                id,
                username: entity.username,
                email: entity.email,
                password_hash: entity.password_hash,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            });
            Ok(id)
        }

        async fn change_password(&self, user_id: i64, entity: ChangePasswordEntity) -> Result<()> {
            let mut users = self.users.lock().unwrap();
            if let Some(user) = users.iter_mut().find(|user| user.id == user_id) {
                user.password_hash = entity.password_hash;
                user.updated_at = entity.updated_at;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .with(eq("alice".to_string()))
            .returning(|_| Ok(None));
        user_repository
            .expect_register()
            .withf(|entity| {
                entity.username == "alice"
                    && entity.password_hash != "pw123"
                    && cheap_hasher().verify("pw123", &entity.password_hash)
            })
            .times(1)
            .returning(|_| Ok(1));

        let message = usecase(user_repository)
            .register(register_model("alice", "pw123"))
            .await
            .unwrap();

        assert_eq!(message.message, "User created successfully");
    }

    #[tokio::test]
    async fn register_rejects_a_taken_username() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .returning(|username| Ok(Some(sample_user(&username, "other"))));
        user_repository.expect_register().never();

        let result = usecase(user_repository)
            .register(register_model("alice", "pw123"))
            .await;

        assert!(matches!(result, Err(UseCaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_losing_a_race_on_the_username_conflicts() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .returning(|_| Ok(None));
        user_repository.expect_register().times(1).returning(|_| {
            Err(anyhow::Error::new(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                Box::new("duplicate key value violates unique constraint \"users_username_key\"".to_string()),
            )))
        });

        let result = usecase(user_repository)
            .register(register_model("alice", "pw123"))
            .await;

        match result {
            Err(UseCaseError::Conflict(message)) => assert_eq!(message, "User already exists"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_validates_the_payload_first() {
        let mut user_repository = MockUserRepository::new();
        user_repository.expect_find_by_username().never();
        user_repository.expect_register().never();

        let result = usecase(user_repository)
            .register(RegisterUserModel {
                username: "alice".to_string(),
                email: "not-an-email".to_string(),
                password: "pw123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn login_with_correct_password_returns_a_bearer_token() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .with(eq("alice".to_string()))
            .returning(|username| Ok(Some(sample_user(&username, "pw123"))));

        let token = usecase(user_repository)
            .login(LoginModel {
                username: "alice".to_string(),
                password: "pw123".to_string(),
            })
            .await
            .expect("matching password must log in");

        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 3600);
        let claims = test_issuer().verify(&token.access_token).unwrap();
        assert_eq!(claims.subject(), "alice");
    }

    #[tokio::test]
    async fn login_for_unknown_user_is_not_found() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let result = usecase(user_repository)
            .login(LoginModel {
                username: "ghost".to_string(),
                password: "pw123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .returning(|username| Ok(Some(sample_user(&username, "pw123"))));

        let result = usecase(user_repository)
            .login(LoginModel {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn register_login_then_register_again_conflicts() {
        let usecase = usecase(InMemoryUsers::default());

        usecase
            .register(register_model("alice", "pw123"))
            .await
            .unwrap();

        let token = usecase
            .login(LoginModel {
                username: "alice".to_string(),
                password: "pw123".to_string(),
            })
            .await
            .unwrap();
        let auth_user = usecase.authenticate(&token.access_token).await.unwrap();
        assert_eq!(auth_user.username, "alice");

        let second = usecase.register(register_model("alice", "pw123")).await;
        assert!(matches!(second, Err(UseCaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn changed_password_replaces_the_old_one() {
        let usecase = usecase(InMemoryUsers::default());
        usecase
            .register(register_model("alice", "pw123"))
            .await
            .unwrap();
        let alice = AuthUser {
            user_id: 1,
            username: "alice".to_string(),
        };

        usecase
            .change_password(
                &alice,
                ChangePasswordModel {
                    username: "alice".to_string(),
                    new_password: "s3cret".to_string(),
                },
            )
            .await
            .unwrap();

        let old = usecase
            .login(LoginModel {
                username: "alice".to_string(),
                password: "pw123".to_string(),
            })
            .await;
        assert!(matches!(old, Err(UseCaseError::Unauthorized(_))));

        let new = usecase
            .login(LoginModel {
                username: "alice".to_string(),
                password: "s3cret".to_string(),
            })
            .await;
        assert!(new.is_ok());
    }

    #[tokio::test]
    async fn change_password_for_missing_user_is_not_found() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .returning(|_| Ok(None));
        user_repository.expect_change_password().never();

        let result = usecase(user_repository)
            .change_password(
                &AuthUser {
                    user_id: 9,
                    username: "bob".to_string(),
                },
                ChangePasswordModel {
                    username: "bob".to_string(),
                    new_password: "s3cret".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn change_password_of_someone_else_is_unauthorized() {
        let mut user_repository = MockUserRepository::new();
        user_repository.expect_find_by_username().never();
        user_repository.expect_change_password().never();

        let result = usecase(user_repository)
            .change_password(
                &AuthUser {
                    user_id: 1,
                    username: "alice".to_string(),
                },
                ChangePasswordModel {
                    username: "bob".to_string(),
                    new_password: "s3cret".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UseCaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn authenticate_rejects_tokens_for_deleted_users() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let token = test_issuer().issue(Claims::for_subject("ghost")).unwrap();
        let result = usecase(user_repository).authenticate(&token).await;

        assert!(matches!(
            result,
            Err(UseCaseError::Token(TokenError::UnknownSubject))
        ));
    }

    #[tokio::test]
    async fn authenticate_rejects_expired_tokens_before_touching_the_store() {
        let mut user_repository = MockUserRepository::new();
        user_repository.expect_find_by_username().never();

        let token = test_issuer()
            .issue_at(
                Claims::for_subject("alice"),
                Utc::now() - Duration::minutes(61),
            )
            .unwrap();
        let result = usecase(user_repository).authenticate(&token).await;

        assert!(matches!(
            result,
            Err(UseCaseError::Token(TokenError::Expired))
        ));
    }
}
