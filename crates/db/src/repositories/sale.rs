//! Sale repository for the member store checkout.
//!
//! A sale writes its header, its items, the guarded stock decrements,
//! and the ledger posting in one database transaction. If any step
//! fails, nothing is recorded.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use kopra_core::ledger::{
    self, DocumentKind, EntryInput, LineInput, document_number, next_sequence,
};
use kopra_core::pos::{PosError, PricedItem, SaleItemInput, validate_payment, validate_sale};
use kopra_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{members, products, sale_items, sales};
use crate::repositories::account::AccountRepository;
use crate::repositories::journal::{JournalError, JournalRepository};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// A point-of-sale rule was violated.
    #[error(transparent)]
    Rule(#[from] PosError),

    /// A product on the ticket does not exist or is inactive.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Member attached to the sale does not exist.
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(Uuid),

    /// The chart is missing a required posting account.
    #[error("Required account '{0}' is missing from the chart")]
    MissingAccount(String),

    /// The ledger posting failed.
    #[error(transparent)]
    Posting(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A sale with its item lines.
#[derive(Debug, Clone)]
pub struct SaleWithItems {
    /// The sale header.
    pub sale: sales::Model,
    /// The item lines.
    pub items: Vec<sale_items::Model>,
}

/// Sales totals for a single day.
#[derive(Debug, Clone, Serialize)]
pub struct DailySales {
    /// The day covered.
    pub date: NaiveDate,
    /// Number of sales recorded that day.
    pub sales_count: u64,
    /// Sum of sale totals that day.
    pub sales_total: Decimal,
}

/// One row of the best-seller ranking.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct TopProduct {
    /// Product id.
    pub product_id: Uuid,
    /// Product name as captured on the sale lines.
    pub product_name: String,
    /// Units sold over the period.
    pub quantity_sold: i64,
    /// Revenue over the period.
    pub revenue: Decimal,
}

#[derive(FromQueryResult)]
struct SumRow {
    total: Option<Decimal>,
}

/// Sale repository for checkout and history.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Processes a sale: prices the ticket, validates payment, takes
    /// stock with guarded decrements, and posts revenue and cost of
    /// goods to the ledger, all atomically.
    ///
    /// # Errors
    ///
    /// Returns [`SaleError::Rule`] for quantity, stock, or payment
    /// violations, or posting and database errors.
    pub async fn process_sale(
        &self,
        cooperative_id: Uuid,
        cashier_id: Uuid,
        member_id: Option<Uuid>,
        items: Vec<SaleItemInput>,
        paid: Decimal,
    ) -> Result<SaleWithItems, SaleError> {
        let txn = self.db.begin().await?;

        if let Some(member_id) = member_id {
            let member = members::Entity::find_by_id(member_id)
                .filter(members::Column::CooperativeId.eq(cooperative_id))
                .one(&txn)
                .await?;
            if member.is_none() {
                return Err(SaleError::MemberNotFound(member_id));
            }
        }

        let priced = Self::price_items(&txn, cooperative_id, &items).await?;
        let totals = validate_sale(&priced)?;
        let change = validate_payment(totals.total, paid)?;

        for item in &priced {
            Self::take_stock(&txn, cooperative_id, item).await?;
        }

        let sale_date = Utc::now().date_naive();
        let sale_number = Self::next_sale_number(&txn, cooperative_id, sale_date).await?;

        let posting = ledger::sale_lines(totals.total, totals.cost_of_goods);
        let lines = Self::resolve_posting(&txn, cooperative_id, &posting).await?;
        let entry = JournalRepository::post_on(
            &txn,
            cooperative_id,
            Some(cashier_id),
            EntryInput {
                date: sale_date,
                description: format!("Store sale {sale_number}"),
                reference: Some(sale_number.clone()),
                lines,
            },
            ledger::EntrySource::Pos,
            None,
        )
        .await?;

        let sale_id = Uuid::new_v4();
        let sale = sales::ActiveModel {
            id: Set(sale_id),
            cooperative_id: Set(cooperative_id),
            sale_number: Set(sale_number),
            sale_date: Set(sale_date),
            cashier_id: Set(cashier_id),
            member_id: Set(member_id),
            total: Set(totals.total),
            paid: Set(paid),
            change: Set(change),
            journal_entry_id: Set(entry.entry.id),
            created_at: Set(Utc::now().into()),
        };
        let sale = sale.insert(&txn).await?;

        let item_models: Vec<sale_items::ActiveModel> = priced
            .iter()
            .map(|item| sale_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                product_id: Set(item.product_id),
                product_name: Set(item.name.clone()),
                quantity: Set(i32::try_from(item.quantity).unwrap_or(i32::MAX)),
                unit_price: Set(item.unit_price),
                unit_cost: Set(item.unit_cost),
                subtotal: Set(item.subtotal()),
            })
            .collect();
        sale_items::Entity::insert_many(item_models).exec(&txn).await?;

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(sale_id))
            .all(&txn)
            .await?;

        txn.commit().await?;
        Ok(SaleWithItems { sale, items })
    }

    /// Fetches a sale with its items.
    ///
    /// # Errors
    ///
    /// Returns [`SaleError::SaleNotFound`] when the id does not exist
    /// under this cooperative.
    pub async fn get_sale(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
    ) -> Result<SaleWithItems, SaleError> {
        let sale = sales::Entity::find_by_id(id)
            .filter(sales::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?
            .ok_or(SaleError::SaleNotFound(id))?;

        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(id))
            .all(&self.db)
            .await?;

        Ok(SaleWithItems { sale, items })
    }

    /// Lists sales newest first, optionally bounded by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sales(
        &self,
        cooperative_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        cashier_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<PageResponse<sales::Model>, SaleError> {
        let page = page.clamped();

        let mut query =
            sales::Entity::find().filter(sales::Column::CooperativeId.eq(cooperative_id));
        if let Some(from) = from {
            query = query.filter(sales::Column::SaleDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(sales::Column::SaleDate.lte(to));
        }
        if let Some(cashier_id) = cashier_id {
            query = query.filter(sales::Column::CashierId.eq(cashier_id));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(sales::Column::SaleDate)
            .order_by_desc(sales::Column::SaleNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Totals and counts the sales recorded on one day.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn daily_sales(
        &self,
        cooperative_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailySales, SaleError> {
        let filter = sales::Entity::find()
            .filter(sales::Column::CooperativeId.eq(cooperative_id))
            .filter(sales::Column::SaleDate.eq(date));

        let sales_count = filter.clone().count(&self.db).await?;
        let sales_total = filter
            .select_only()
            .column_as(sales::Column::Total.sum(), "total")
            .into_model::<SumRow>()
            .one(&self.db)
            .await?
            .and_then(|r| r.total)
            .unwrap_or(Decimal::ZERO);

        Ok(DailySales {
            date,
            sales_count,
            sales_total,
        })
    }

    /// Ranks products by units sold over a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn top_products(
        &self,
        cooperative_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
        limit: u64,
    ) -> Result<Vec<TopProduct>, SaleError> {
        let rows = sale_items::Entity::find()
            .select_only()
            .column(sale_items::Column::ProductId)
            .column(sale_items::Column::ProductName)
            .column_as(sale_items::Column::Quantity.sum(), "quantity_sold")
            .column_as(sale_items::Column::Subtotal.sum(), "revenue")
            .join(JoinType::InnerJoin, sale_items::Relation::Sale.def())
            .filter(sales::Column::CooperativeId.eq(cooperative_id))
            .filter(sales::Column::SaleDate.gte(from))
            .filter(sales::Column::SaleDate.lte(to))
            .group_by(sale_items::Column::ProductId)
            .group_by(sale_items::Column::ProductName)
            .order_by_desc(sale_items::Column::Quantity.sum())
            .limit(limit)
            .into_model::<TopProduct>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Loads and prices the ticket, merging duplicate product rows.
    async fn price_items(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        items: &[SaleItemInput],
    ) -> Result<Vec<PricedItem>, SaleError> {
        let mut quantities: HashMap<Uuid, u32> = HashMap::new();
        let mut order: Vec<Uuid> = Vec::new();
        for item in items {
            let entry = quantities.entry(item.product_id).or_insert(0);
            if *entry == 0 {
                order.push(item.product_id);
            }
            *entry = entry.saturating_add(item.quantity);
        }

        let rows = products::Entity::find()
            .filter(products::Column::CooperativeId.eq(cooperative_id))
            .filter(products::Column::Id.is_in(order.clone()))
            .filter(products::Column::Active.eq(true))
            .all(txn)
            .await?;
        let by_id: HashMap<Uuid, products::Model> =
            rows.into_iter().map(|p| (p.id, p)).collect();

        let mut priced = Vec::with_capacity(order.len());
        for product_id in order {
            let product = by_id
                .get(&product_id)
                .ok_or(SaleError::ProductNotFound(product_id))?;
            priced.push(PricedItem {
                product_id,
                name: product.name.clone(),
                quantity: quantities[&product_id],
                unit_price: product.selling_price,
                unit_cost: product.cost_price,
                available_stock: product.stock,
            });
        }
        Ok(priced)
    }

    /// Decrements stock with a guard, so a concurrent sale of the last
    /// units fails here instead of going negative.
    async fn take_stock(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        item: &PricedItem,
    ) -> Result<(), SaleError> {
        let quantity = i64::from(item.quantity);
        let result = products::Entity::update_many()
            .col_expr(
                products::Column::Stock,
                Expr::col(products::Column::Stock).sub(quantity),
            )
            .filter(products::Column::Id.eq(item.product_id))
            .filter(products::Column::CooperativeId.eq(cooperative_id))
            .filter(products::Column::Stock.gte(quantity))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            let current = products::Entity::find_by_id(item.product_id)
                .filter(products::Column::CooperativeId.eq(cooperative_id))
                .one(txn)
                .await?
                .ok_or(SaleError::ProductNotFound(item.product_id))?;
            return Err(PosError::InsufficientStock {
                product: item.name.clone(),
                available: current.stock,
                requested: item.quantity,
            }
            .into());
        }
        Ok(())
    }

    /// Maps account codes from the sale posting template to ids.
    async fn resolve_posting(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        posting: &[ledger::PostingLine],
    ) -> Result<Vec<LineInput>, SaleError> {
        let mut lines = Vec::with_capacity(posting.len());
        for p in posting {
            let account = AccountRepository::find_by_code_on(txn, cooperative_id, p.account_code)
                .await?
                .ok_or_else(|| SaleError::MissingAccount(p.account_code.to_owned()))?;
            lines.push(LineInput {
                account_id: account.id,
                debit: p.debit,
                credit: p.credit,
                memo: None,
            });
        }
        Ok(lines)
    }

    /// Produces the next `POS` number for the day under an exclusive
    /// lock.
    async fn next_sale_number(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        date: NaiveDate,
    ) -> Result<String, DbErr> {
        let kind = DocumentKind::Sale;
        let prefix = format!("{}-{}-", kind.prefix(), date.format("%Y%m%d"));
        let last = sales::Entity::find()
            .filter(sales::Column::CooperativeId.eq(cooperative_id))
            .filter(sales::Column::SaleNumber.starts_with(&prefix))
            .order_by_desc(sales::Column::SaleNumber)
            .lock_exclusive()
            .one(txn)
            .await?;

        let seq = next_sequence(last.as_ref().map(|m| m.sale_number.as_str()));
        Ok(document_number(kind, date, seq))
    }
}
