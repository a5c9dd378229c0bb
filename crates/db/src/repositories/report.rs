//! Report repository: aggregation queries feeding the statement math.
//!
//! Every number here is derived from posted journal lines or the
//! business tables at query time. Nothing is cached or stored.

use chrono::NaiveDate;
use kopra_core::coa::{self, default_chart::well_known, signed_balance};
use kopra_core::reports::{AccountBalance, LedgerMovement};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use crate::entities::{
    accounts, journal_entries, journal_lines, members, products, sales, savings_transactions,
    sea_orm_active_enums::SavingsDirection,
};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Account code not present in the chart.
    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, FromQueryResult)]
struct BalanceRow {
    account_id: Uuid,
    total_debit: Option<Decimal>,
    total_credit: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct MovementRow {
    entry_date: NaiveDate,
    journal_number: String,
    description: String,
    debit: Decimal,
    credit: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct SumRow {
    total: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct DirectionSumRow {
    direction: SavingsDirection,
    total: Option<Decimal>,
}

/// Headline numbers the dashboard route assembles.
#[derive(Debug, Clone)]
pub struct DailyActivity {
    /// Debits to the cash account on the day.
    pub cash_in: Decimal,
    /// Credits to the cash account on the day.
    pub cash_out: Decimal,
    /// Journal entries posted on the day.
    pub entry_count: u64,
    /// Sales rung up on the day.
    pub sales_count: u64,
    /// Sales total for the day.
    pub sales_total: Decimal,
    /// Savings deposits recorded on the day.
    pub deposit_count: u64,
    /// Deposits total for the day.
    pub deposit_total: Decimal,
}

/// Counts and balances for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardCounts {
    /// Active members.
    pub member_count: u64,
    /// Active products.
    pub product_count: u64,
    /// Today's sales total.
    pub sales_today: Decimal,
    /// Net savings held across all members.
    pub total_savings: Decimal,
    /// Derived cash balance.
    pub cash_balance: Decimal,
    /// Active products at or below their low-stock threshold.
    pub low_stock_count: u64,
}

/// Report repository for derived balances and activity sums.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Per-account debit and credit totals up to a date, inclusive.
    ///
    /// Accounts without postings come back with zero totals so the
    /// statements can still list or skip them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_balances_as_of(
        &self,
        cooperative_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountBalance>, ReportError> {
        self.account_balances(cooperative_id, None, Some(as_of)).await
    }

    /// Per-account debit and credit totals within a period, inclusive
    /// on both ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_balances_between(
        &self,
        cooperative_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AccountBalance>, ReportError> {
        self.account_balances(cooperative_id, Some(from), Some(to)).await
    }

    /// Finds an account by code for the general ledger report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::AccountNotFound`] for an unknown code.
    pub async fn account_by_code(
        &self,
        cooperative_id: Uuid,
        code: &str,
    ) -> Result<accounts::Model, ReportError> {
        accounts::Entity::find()
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .ok_or_else(|| ReportError::AccountNotFound(code.to_owned()))
    }

    /// Signed balance of one account before a date, for general ledger
    /// opening balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn opening_balance(
        &self,
        cooperative_id: Uuid,
        account: &accounts::Model,
        before: NaiveDate,
    ) -> Result<Decimal, ReportError> {
        let row = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::AccountId)
            .column_as(journal_lines::Column::Debit.sum(), "total_debit")
            .column_as(journal_lines::Column::Credit.sum(), "total_credit")
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id))
            .filter(journal_entries::Column::EntryDate.lt(before))
            .filter(journal_lines::Column::AccountId.eq(account.id))
            .group_by(journal_lines::Column::AccountId)
            .into_model::<BalanceRow>()
            .one(&self.db)
            .await?;

        let (debit, credit) = row.map_or((Decimal::ZERO, Decimal::ZERO), |r| {
            (
                r.total_debit.unwrap_or(Decimal::ZERO),
                r.total_credit.unwrap_or(Decimal::ZERO),
            )
        });
        let account_type: coa::AccountType = account.account_type.into();
        Ok(signed_balance(account_type.normal_balance(), debit, credit))
    }

    /// Chronological movements on one account within a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_movements(
        &self,
        cooperative_id: Uuid,
        account_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LedgerMovement>, ReportError> {
        let rows = journal_lines::Entity::find()
            .select_only()
            .column_as(journal_entries::Column::EntryDate, "entry_date")
            .column_as(journal_entries::Column::JournalNumber, "journal_number")
            .column_as(journal_entries::Column::Description, "description")
            .column(journal_lines::Column::Debit)
            .column(journal_lines::Column::Credit)
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id))
            .filter(journal_entries::Column::EntryDate.gte(from))
            .filter(journal_entries::Column::EntryDate.lte(to))
            .filter(journal_lines::Column::AccountId.eq(account_id))
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::JournalNumber)
            .into_model::<MovementRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| LedgerMovement {
                date: r.entry_date,
                journal_number: r.journal_number,
                description: r.description,
                debit: r.debit,
                credit: r.credit,
            })
            .collect())
    }

    /// Cash movement, posting, sales, and deposit sums for one day.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn daily_activity(
        &self,
        cooperative_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyActivity, ReportError> {
        let cash = self.account_by_code(cooperative_id, well_known::CASH).await?;
        let cash_row = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::AccountId)
            .column_as(journal_lines::Column::Debit.sum(), "total_debit")
            .column_as(journal_lines::Column::Credit.sum(), "total_credit")
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id))
            .filter(journal_entries::Column::EntryDate.eq(date))
            .filter(journal_lines::Column::AccountId.eq(cash.id))
            .group_by(journal_lines::Column::AccountId)
            .into_model::<BalanceRow>()
            .one(&self.db)
            .await?;
        let (cash_in, cash_out) = cash_row.map_or((Decimal::ZERO, Decimal::ZERO), |r| {
            (
                r.total_debit.unwrap_or(Decimal::ZERO),
                r.total_credit.unwrap_or(Decimal::ZERO),
            )
        });

        let entry_count = journal_entries::Entity::find()
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id))
            .filter(journal_entries::Column::EntryDate.eq(date))
            .count(&self.db)
            .await?;

        let sales_count = sales::Entity::find()
            .filter(sales::Column::CooperativeId.eq(cooperative_id))
            .filter(sales::Column::SaleDate.eq(date))
            .count(&self.db)
            .await?;
        let sales_total = self.sales_total_on(cooperative_id, date).await?;

        let deposit_filter = savings_transactions::Entity::find()
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .filter(savings_transactions::Column::TransactionDate.eq(date))
            .filter(savings_transactions::Column::Direction.eq(SavingsDirection::Deposit));
        let deposit_count = deposit_filter.clone().count(&self.db).await?;
        let deposit_total = deposit_filter
            .select_only()
            .column_as(savings_transactions::Column::Amount.sum(), "total")
            .into_model::<SumRow>()
            .one(&self.db)
            .await?
            .and_then(|r| r.total)
            .unwrap_or(Decimal::ZERO);

        Ok(DailyActivity {
            cash_in,
            cash_out,
            entry_count,
            sales_count,
            sales_total,
            deposit_count,
            deposit_total,
        })
    }

    /// Counts and balances for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn dashboard_counts(
        &self,
        cooperative_id: Uuid,
        today: NaiveDate,
    ) -> Result<DashboardCounts, ReportError> {
        let member_count = members::Entity::find()
            .filter(members::Column::CooperativeId.eq(cooperative_id))
            .filter(members::Column::Active.eq(true))
            .count(&self.db)
            .await?;

        let product_count = products::Entity::find()
            .filter(products::Column::CooperativeId.eq(cooperative_id))
            .filter(products::Column::Active.eq(true))
            .count(&self.db)
            .await?;

        let low_stock_count = products::Entity::find()
            .filter(products::Column::CooperativeId.eq(cooperative_id))
            .filter(products::Column::Active.eq(true))
            .filter(
                sea_orm::sea_query::Expr::col(products::Column::Stock)
                    .lte(sea_orm::sea_query::Expr::col(products::Column::LowStockThreshold)),
            )
            .count(&self.db)
            .await?;

        let sales_today = self.sales_total_on(cooperative_id, today).await?;
        let total_savings = self.net_savings(cooperative_id).await?;

        let cash = self.account_by_code(cooperative_id, well_known::CASH).await?;
        let cash_balance = self.opening_balance(cooperative_id, &cash, today + chrono::Duration::days(1)).await?;

        Ok(DashboardCounts {
            member_count,
            product_count,
            sales_today,
            total_savings,
            cash_balance,
            low_stock_count,
        })
    }

    async fn account_balances(
        &self,
        cooperative_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AccountBalance>, ReportError> {
        let account_rows = accounts::Entity::find()
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        let mut query = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::AccountId)
            .column_as(journal_lines::Column::Debit.sum(), "total_debit")
            .column_as(journal_lines::Column::Credit.sum(), "total_credit")
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id));
        if let Some(from) = from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        let totals: Vec<BalanceRow> = query
            .group_by(journal_lines::Column::AccountId)
            .into_model::<BalanceRow>()
            .all(&self.db)
            .await?;

        let mut by_account: std::collections::HashMap<Uuid, (Decimal, Decimal)> =
            std::collections::HashMap::with_capacity(totals.len());
        for row in totals {
            by_account.insert(
                row.account_id,
                (
                    row.total_debit.unwrap_or(Decimal::ZERO),
                    row.total_credit.unwrap_or(Decimal::ZERO),
                ),
            );
        }

        Ok(account_rows
            .into_iter()
            .map(|a| {
                let (total_debit, total_credit) = by_account
                    .get(&a.id)
                    .copied()
                    .unwrap_or((Decimal::ZERO, Decimal::ZERO));
                AccountBalance {
                    account_id: a.id,
                    code: a.code,
                    name: a.name,
                    account_type: a.account_type.into(),
                    total_debit,
                    total_credit,
                }
            })
            .collect())
    }

    async fn sales_total_on(
        &self,
        cooperative_id: Uuid,
        date: NaiveDate,
    ) -> Result<Decimal, ReportError> {
        Ok(sales::Entity::find()
            .select_only()
            .column_as(sales::Column::Total.sum(), "total")
            .filter(sales::Column::CooperativeId.eq(cooperative_id))
            .filter(sales::Column::SaleDate.eq(date))
            .into_model::<SumRow>()
            .one(&self.db)
            .await?
            .and_then(|r| r.total)
            .unwrap_or(Decimal::ZERO))
    }

    async fn net_savings(&self, cooperative_id: Uuid) -> Result<Decimal, ReportError> {
        let rows = savings_transactions::Entity::find()
            .select_only()
            .column(savings_transactions::Column::Direction)
            .column_as(savings_transactions::Column::Amount.sum(), "total")
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .group_by(savings_transactions::Column::Direction)
            .into_model::<DirectionSumRow>()
            .all(&self.db)
            .await?;

        let mut net = Decimal::ZERO;
        for row in rows {
            let amount = row.total.unwrap_or(Decimal::ZERO);
            match row.direction {
                SavingsDirection::Deposit => net += amount,
                SavingsDirection::Withdrawal => net -= amount,
            }
        }
        Ok(net)
    }
}
