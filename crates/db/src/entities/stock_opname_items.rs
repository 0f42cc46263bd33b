//! `SeaORM` Entity for stock_opname_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_opname_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub opname_id: Uuid,
    pub product_id: Uuid,
    pub system_stock: i64,
    pub physical_stock: i64,
    /// physical_stock - system_stock, frozen at count time.
    pub difference: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock_opnames::Entity",
        from = "Column::OpnameId",
        to = "super::stock_opnames::Column::Id"
    )]
    StockOpnames,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::stock_opnames::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockOpnames.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
