//! `SeaORM` Entity for stock_opnames table.
//!
//! `applied_at` is the one-shot guard for the reconciling adjustment that
//! consumes the counted differences.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OpnameStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_opnames")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub number: String,
    pub status: OpnameStatus,
    pub applied_at: Option<DateTimeWithTimeZone>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_opname_items::Entity")]
    StockOpnameItems,
}

impl Related<super::stock_opname_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockOpnameItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
