//! `SeaORM` Entity, @generated manually
//!
//! Single global row with the incoming-deposit details shown to users.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub upi_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub qr_code_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bank_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub account_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ifsc_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub account_holder: Option<String>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
