use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::magazines::{EditMagazineEntity, InsertMagazineEntity, MagazineEntity},
        repositories::magazines::MagazineRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::magazines},
};

pub struct MagazinePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MagazinePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MagazineRepository for MagazinePostgres {
    async fn create(&self, insert_magazine_entity: InsertMagazineEntity) -> Result<MagazineEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(magazines::table)
            .values(&insert_magazine_entity)
            .returning(MagazineEntity::as_returning())
            .get_result::<MagazineEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list(&self) -> Result<Vec<MagazineEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = magazines::table
            .order(magazines::id.asc())
            .select(MagazineEntity::as_select())
            .load::<MagazineEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, magazine_id: i64) -> Result<Option<MagazineEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = magazines::table
            .filter(magazines::id.eq(magazine_id))
            .select(MagazineEntity::as_select())
            .first::<MagazineEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_title(&self, title: String) -> Result<Option<MagazineEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = magazines::table
            .filter(magazines::title.eq(title))
            .select(MagazineEntity::as_select())
            .first::<MagazineEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update(
        &self,
        magazine_id: i64,
        edit_magazine_entity: EditMagazineEntity,
    ) -> Result<MagazineEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(magazines::table)
            .filter(magazines::id.eq(magazine_id))
            .set(&edit_magazine_entity)
            .returning(MagazineEntity::as_returning())
            .get_result::<MagazineEntity>(&mut conn)?;

        Ok(result)
    }

    async fn delete(&self, magazine_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(magazines::table)
            .filter(magazines::id.eq(magazine_id))
            .execute(&mut conn)?;

        Ok(())
    }
}
