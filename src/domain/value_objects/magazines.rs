use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::magazines::{EditMagazineEntity, InsertMagazineEntity, MagazineEntity},
    value_objects::validation::{
        ValidationError, require_discount, require_non_empty, require_non_negative,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MagazineModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MagazineEntity> for MagazineModel {
    fn from(entity: MagazineEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            price: entity.price,
            discount: entity.discount,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertMagazineModel {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
}

impl InsertMagazineModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, self.price, self.discount)
    }

    pub fn to_entity(&self) -> InsertMagazineEntity {
        let now = Utc::now();
        InsertMagazineEntity {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            price: self.price,
            discount: self.discount,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Full replacement of a magazine's editable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditMagazineModel {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
}

impl EditMagazineModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, self.price, self.discount)
    }

    pub fn to_entity(&self) -> EditMagazineEntity {
        EditMagazineEntity {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            price: self.price,
            discount: self.discount,
            updated_at: Utc::now(),
        }
    }
}

fn validate_fields(title: &str, price: f64, discount: f64) -> Result<(), ValidationError> {
    require_non_empty("title", title)?;
    require_non_negative("price", price)?;
    require_discount(discount)
}
