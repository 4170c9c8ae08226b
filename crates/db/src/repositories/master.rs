//! Master data repository: companies, accounts, cost centers, parties and items.
//!
//! Builders never query the database themselves. Handlers collect the names a
//! request references, load a `KnownEntities` snapshot here with one query per
//! kind, and pass the snapshot to the builder as its lookup.

use chrono::Utc;
use ledgerbridge_core::master::{CompanyDefaults, MasterRecordPlan};
use ledgerbridge_core::{EntityKind, EntityRefs, KnownEntities};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set,
};

use crate::entities::{accounts, companies, cost_centers, customers, items, suppliers};

/// Master data repository.
#[derive(Debug, Clone)]
pub struct MasterRepository {
    db: DatabaseConnection,
}

impl MasterRepository {
    /// Creates a new master data repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads which of the referenced names exist.
    ///
    /// Companies are loaded with their posting defaults, and the default
    /// accounts and cost centers of those companies are checked too, so
    /// builders can resolve defaults without another round trip.
    pub async fn snapshot(&self, refs: &EntityRefs) -> Result<KnownEntities, DbErr> {
        let mut known = KnownEntities::new();
        let mut account_names = refs.names(EntityKind::Account);
        let mut cost_center_names = refs.names(EntityKind::CostCenter);

        let company_names = refs.names(EntityKind::Company);
        if !company_names.is_empty() {
            let rows = companies::Entity::find()
                .filter(companies::Column::Name.is_in(company_names))
                .all(&self.db)
                .await?;
            for row in rows {
                account_names.extend(
                    [
                        &row.default_receivable_account,
                        &row.default_payable_account,
                        &row.default_cash_account,
                    ]
                    .into_iter()
                    .flatten()
                    .cloned(),
                );
                cost_center_names.extend(row.default_cost_center.clone());
                known.insert_company(row.into());
            }
        }
        account_names.sort_unstable();
        account_names.dedup();
        cost_center_names.sort_unstable();
        cost_center_names.dedup();

        let accounts =
            existing::<accounts::Entity>(&self.db, accounts::Column::Name, account_names).await?;
        let cost_centers =
            existing::<cost_centers::Entity>(&self.db, cost_centers::Column::Name, cost_center_names)
                .await?;
        let customers = existing::<customers::Entity>(
            &self.db,
            customers::Column::Name,
            refs.names(EntityKind::Customer),
        )
        .await?;
        let suppliers = existing::<suppliers::Entity>(
            &self.db,
            suppliers::Column::Name,
            refs.names(EntityKind::Supplier),
        )
        .await?;
        let items =
            existing::<items::Entity>(&self.db, items::Column::ItemCode, refs.names(EntityKind::Item))
                .await?;

        for (kind, names) in [
            (EntityKind::Account, accounts),
            (EntityKind::CostCenter, cost_centers),
            (EntityKind::Customer, customers),
            (EntityKind::Supplier, suppliers),
            (EntityKind::Item, items),
        ] {
            for name in names {
                known.insert(kind, name);
            }
        }

        tracing::debug!(referenced = ?refs, found = known.len(), "Loaded master data snapshot");
        Ok(known)
    }

    /// Finds a company and its posting defaults.
    pub async fn company(&self, name: &str) -> Result<Option<CompanyDefaults>, DbErr> {
        let row = companies::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Creates the planned customers, suppliers and items that do not exist yet.
    pub async fn apply_plan(&self, plan: &MasterRecordPlan) -> Result<u64, DbErr> {
        apply_plan(&self.db, plan).await
    }

    /// Inserts or updates a company and its posting defaults.
    pub async fn upsert_company(&self, defaults: &CompanyDefaults) -> Result<(), DbErr> {
        let model = companies::ActiveModel {
            name: Set(defaults.name.clone()),
            default_currency: Set(defaults.default_currency.clone()),
            default_receivable_account: Set(defaults.default_receivable_account.clone()),
            default_payable_account: Set(defaults.default_payable_account.clone()),
            default_cash_account: Set(defaults.default_cash_account.clone()),
            default_cost_center: Set(defaults.default_cost_center.clone()),
            created_at: Set(Utc::now().into()),
        };

        companies::Entity::insert(model)
            .on_conflict(
                OnConflict::column(companies::Column::Name)
                    .update_columns([
                        companies::Column::DefaultCurrency,
                        companies::Column::DefaultReceivableAccount,
                        companies::Column::DefaultPayableAccount,
                        companies::Column::DefaultCashAccount,
                        companies::Column::DefaultCostCenter,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Creates an account under a company unless it exists.
    pub async fn ensure_account(
        &self,
        name: &str,
        company: &str,
        account_type: Option<&str>,
    ) -> Result<(), DbErr> {
        let model = accounts::ActiveModel {
            name: Set(name.to_string()),
            company: Set(company.to_string()),
            account_type: Set(account_type.map(str::to_string)),
            is_group: Set(false),
            created_at: Set(Utc::now().into()),
        };

        accounts::Entity::insert(model)
            .on_conflict(OnConflict::column(accounts::Column::Name).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Creates a cost center under a company unless it exists.
    pub async fn ensure_cost_center(&self, name: &str, company: &str) -> Result<(), DbErr> {
        let model = cost_centers::ActiveModel {
            name: Set(name.to_string()),
            company: Set(company.to_string()),
            created_at: Set(Utc::now().into()),
        };

        cost_centers::Entity::insert(model)
            .on_conflict(
                OnConflict::column(cost_centers::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

/// Creates the planned master records on `conn`.
///
/// Rows created concurrently by another request are left alone. Returns the
/// number of rows actually inserted.
pub(crate) async fn apply_plan<C: ConnectionTrait>(
    conn: &C,
    plan: &MasterRecordPlan,
) -> Result<u64, DbErr> {
    if plan.is_empty() {
        return Ok(0);
    }

    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let mut inserted = 0;

    if !plan.customers.is_empty() {
        let rows = plan.customers.iter().map(|c| customers::ActiveModel {
            name: Set(c.customer_name.clone()),
            customer_type: Set(c.customer_type.clone()),
            created_at: Set(now),
        });
        inserted += customers::Entity::insert_many(rows)
            .on_conflict(OnConflict::column(customers::Column::Name).do_nothing().to_owned())
            .exec_without_returning(conn)
            .await?;
    }

    if !plan.suppliers.is_empty() {
        let rows = plan.suppliers.iter().map(|s| suppliers::ActiveModel {
            name: Set(s.supplier_name.clone()),
            supplier_type: Set(s.supplier_type.clone()),
            created_at: Set(now),
        });
        inserted += suppliers::Entity::insert_many(rows)
            .on_conflict(OnConflict::column(suppliers::Column::Name).do_nothing().to_owned())
            .exec_without_returning(conn)
            .await?;
    }

    if !plan.items.is_empty() {
        let rows = plan.items.iter().map(|i| items::ActiveModel {
            item_code: Set(i.item_code.clone()),
            item_name: Set(i.item_name.clone()),
            item_group: Set(i.item_group.clone()),
            is_stock_item: Set(i.is_stock_item),
            is_sales_item: Set(i.is_sales_item),
            is_purchase_item: Set(i.is_purchase_item),
            created_at: Set(now),
        });
        inserted += items::Entity::insert_many(rows)
            .on_conflict(OnConflict::column(items::Column::ItemCode).do_nothing().to_owned())
            .exec_without_returning(conn)
            .await?;
    }

    if inserted > 0 {
        tracing::info!(inserted, "Created missing master records");
    }
    Ok(inserted)
}

/// Returns which of `names` exist in the key column of `E`.
async fn existing<E>(
    db: &DatabaseConnection,
    column: E::Column,
    names: Vec<String>,
) -> Result<Vec<String>, DbErr>
where
    E: EntityTrait,
{
    if names.is_empty() {
        return Ok(Vec::new());
    }

    E::find()
        .select_only()
        .column(column)
        .filter(column.is_in(names))
        .into_tuple::<String>()
        .all(db)
        .await
}

impl From<companies::Model> for CompanyDefaults {
    fn from(model: companies::Model) -> Self {
        Self {
            name: model.name,
            default_currency: model.default_currency,
            default_receivable_account: model.default_receivable_account,
            default_payable_account: model.default_payable_account,
            default_cash_account: model.default_cash_account,
            default_cost_center: model.default_cost_center,
        }
    }
}
