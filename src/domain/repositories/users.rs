use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{ChangePasswordEntity, RegisterUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>>;
    async fn find_by_username(&self, username: String) -> Result<Option<UserEntity>>;
    async fn register(&self, register_user_entity: RegisterUserEntity) -> Result<i64>;
    async fn change_password(
        &self,
        user_id: i64,
        change_password_entity: ChangePasswordEntity,
    ) -> Result<()>;
}
