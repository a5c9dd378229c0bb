//! Product repository for the member store catalog.

use kopra_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::products;

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Barcode already assigned to another product.
    #[error("Barcode '{0}' is already in use")]
    DuplicateBarcode(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// A stock adjustment would push stock below zero.
    #[error("Stock adjustment would make product {0} negative")]
    StockWouldGoNegative(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Product name.
    pub name: String,
    /// Optional barcode, unique within the cooperative.
    pub barcode: Option<String>,
    /// Selling price.
    pub selling_price: Decimal,
    /// Cost price, used for cost of goods postings.
    pub cost_price: Decimal,
    /// Opening stock.
    pub stock: i64,
    /// Stock level that flags the product as low.
    pub low_stock_threshold: i64,
}

/// Input for updating a product. Stock moves only through sales and
/// explicit adjustments.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// New name.
    pub name: Option<String>,
    /// New barcode, `Some(None)` clears it.
    pub barcode: Option<Option<String>>,
    /// New selling price.
    pub selling_price: Option<Decimal>,
    /// New cost price.
    pub cost_price: Option<Decimal>,
    /// New low-stock threshold.
    pub low_stock_threshold: Option<i64>,
    /// New active flag.
    pub active: Option<bool>,
}

/// Product repository for catalog CRUD and stock adjustments.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product, enforcing barcode uniqueness per cooperative.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::DuplicateBarcode`] when the barcode is
    /// taken.
    pub async fn create_product(
        &self,
        cooperative_id: Uuid,
        input: CreateProductInput,
    ) -> Result<products::Model, ProductError> {
        if let Some(barcode) = &input.barcode {
            self.ensure_barcode_free(cooperative_id, barcode, None).await?;
        }

        let now = chrono::Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            cooperative_id: Set(cooperative_id),
            barcode: Set(input.barcode),
            name: Set(input.name),
            selling_price: Set(input.selling_price),
            cost_price: Set(input.cost_price),
            stock: Set(input.stock),
            low_stock_threshold: Set(input.low_stock_threshold),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(product.insert(&self.db).await?)
    }

    /// Lists products, optionally matching a name or barcode search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(
        &self,
        cooperative_id: Uuid,
        search: Option<&str>,
        active: Option<bool>,
        page: PageRequest,
    ) -> Result<PageResponse<products::Model>, ProductError> {
        let page = page.clamped();

        let mut query = products::Entity::find()
            .filter(products::Column::CooperativeId.eq(cooperative_id));

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(products::Column::Name.like(&pattern))
                    .add(products::Column::Barcode.like(&pattern)),
            );
        }
        if let Some(active) = active {
            query = query.filter(products::Column::Active.eq(active));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(products::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Finds a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::ProductNotFound`] when the id does not
    /// exist under this cooperative.
    pub async fn find_product(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
    ) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .filter(products::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?
            .ok_or(ProductError::ProductNotFound(id))
    }

    /// Updates a product's catalog fields.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::DuplicateBarcode`] when the new barcode
    /// is taken by another product.
    pub async fn update_product(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        let product = self.find_product(cooperative_id, id).await?;

        if let Some(Some(barcode)) = &input.barcode {
            self.ensure_barcode_free(cooperative_id, barcode, Some(id))
                .await?;
        }

        let mut active: products::ActiveModel = product.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(barcode) = input.barcode {
            active.barcode = Set(barcode);
        }
        if let Some(price) = input.selling_price {
            active.selling_price = Set(price);
        }
        if let Some(cost) = input.cost_price {
            active.cost_price = Set(cost);
        }
        if let Some(threshold) = input.low_stock_threshold {
            active.low_stock_threshold = Set(threshold);
        }
        if let Some(flag) = input.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deactivates a product. Sales history keeps its captured name
    /// and prices.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::ProductNotFound`] when the id does not
    /// exist under this cooperative.
    pub async fn deactivate_product(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
    ) -> Result<(), ProductError> {
        let product = self.find_product(cooperative_id, id).await?;

        let mut active: products::ActiveModel = product.into();
        active.active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Adjusts stock by a signed delta with a guarded update, so a
    /// concurrent decrement can never drive stock below zero.
    ///
    /// Stock corrections do not post to the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::StockWouldGoNegative`] when the delta
    /// exceeds the available stock.
    pub async fn adjust_stock(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
        delta: i64,
    ) -> Result<products::Model, ProductError> {
        let mut update = products::Entity::update_many()
            .col_expr(
                products::Column::Stock,
                Expr::col(products::Column::Stock).add(delta),
            )
            .col_expr(
                products::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(
                    chrono::Utc::now(),
                )),
            )
            .filter(products::Column::Id.eq(id))
            .filter(products::Column::CooperativeId.eq(cooperative_id));

        if delta < 0 {
            update = update.filter(products::Column::Stock.gte(-delta));
        }

        let result = update.exec(&self.db).await?;
        if result.rows_affected == 0 {
            // Distinguish a missing product from an overdraw
            let _ = self.find_product(cooperative_id, id).await?;
            return Err(ProductError::StockWouldGoNegative(id));
        }

        self.find_product(cooperative_id, id).await
    }

    /// Lists active products at or below their low-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn low_stock(&self, cooperative_id: Uuid) -> Result<Vec<products::Model>, ProductError> {
        let rows = products::Entity::find()
            .filter(products::Column::CooperativeId.eq(cooperative_id))
            .filter(products::Column::Active.eq(true))
            .filter(
                Expr::col(products::Column::Stock)
                    .lte(Expr::col(products::Column::LowStockThreshold)),
            )
            .order_by_asc(products::Column::Stock)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    async fn ensure_barcode_free(
        &self,
        cooperative_id: Uuid,
        barcode: &str,
        except: Option<Uuid>,
    ) -> Result<(), ProductError> {
        let mut query = products::Entity::find()
            .filter(products::Column::CooperativeId.eq(cooperative_id))
            .filter(products::Column::Barcode.eq(barcode));
        if let Some(id) = except {
            query = query.filter(products::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(ProductError::DuplicateBarcode(barcode.to_owned()));
        }
        Ok(())
    }
}
