use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::plans::{EditPlanEntity, InsertPlanEntity, PlanEntity};

#[automock]
#[async_trait]
pub trait PlanRepository {
    async fn create(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity>;
    async fn list(&self) -> Result<Vec<PlanEntity>>;
    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>>;
    async fn find_by_title(&self, title: String) -> Result<Option<PlanEntity>>;
    async fn update(&self, plan_id: i64, edit_plan_entity: EditPlanEntity) -> Result<PlanEntity>;
    async fn delete(&self, plan_id: i64) -> Result<()>;
}
