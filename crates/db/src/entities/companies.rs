//! `SeaORM` Entity for companies table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub default_currency: String,
    pub default_receivable_account: Option<String>,
    pub default_payable_account: Option<String>,
    pub default_cash_account: Option<String>,
    pub default_cost_center: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
    #[sea_orm(has_many = "super::cost_centers::Entity")]
    CostCenters,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::cost_centers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CostCenters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
