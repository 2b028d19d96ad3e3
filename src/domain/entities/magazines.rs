use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::magazines;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = magazines)]
pub struct MagazineEntity {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = magazines)]
pub struct InsertMagazineEntity {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = magazines)]
pub struct EditMagazineEntity {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub updated_at: DateTime<Utc>,
}
