use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::magazines::{
    EditMagazineEntity, InsertMagazineEntity, MagazineEntity,
};

#[automock]
#[async_trait]
pub trait MagazineRepository {
    async fn create(&self, insert_magazine_entity: InsertMagazineEntity) -> Result<MagazineEntity>;
    async fn list(&self) -> Result<Vec<MagazineEntity>>;
    async fn find_by_id(&self, magazine_id: i64) -> Result<Option<MagazineEntity>>;
    async fn find_by_title(&self, title: String) -> Result<Option<MagazineEntity>>;
    async fn update(
        &self,
        magazine_id: i64,
        edit_magazine_entity: EditMagazineEntity,
    ) -> Result<MagazineEntity>;
    async fn delete(&self, magazine_id: i64) -> Result<()>;
}
