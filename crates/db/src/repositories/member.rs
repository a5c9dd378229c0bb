//! Member repository for the cooperative member registry.

use chrono::{NaiveDate, Utc};
use kopra_core::auth::{PasswordError, hash_password, verify_password};
use kopra_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    members, savings_transactions, sea_orm_active_enums::SavingsDirection,
};

/// Member numbers carry this prefix followed by a running sequence.
const MEMBER_NUMBER_PREFIX: &str = "AGT";

/// Error types for member operations.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// Member not found.
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    /// Cannot deactivate a member still holding savings.
    #[error("Member still holds {0} in savings")]
    HasSavings(Decimal),

    /// Portal PIN has not been set.
    #[error("Member has no portal PIN")]
    PinNotSet,

    /// Portal credentials were wrong.
    #[error("Invalid member number or PIN")]
    InvalidCredentials,

    /// PIN hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a member.
#[derive(Debug, Clone)]
pub struct CreateMemberInput {
    /// Member name.
    pub name: String,
    /// National identity number.
    pub national_id: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Date the member joined.
    pub join_date: NaiveDate,
}

/// Input for updating a member's contact details.
#[derive(Debug, Clone, Default)]
pub struct UpdateMemberInput {
    /// New name.
    pub name: Option<String>,
    /// New national identity number.
    pub national_id: Option<Option<String>>,
    /// New phone number.
    pub phone: Option<Option<String>>,
    /// New address.
    pub address: Option<Option<String>>,
}

#[derive(Debug, FromQueryResult)]
struct DirectionTotal {
    direction: SavingsDirection,
    total: Option<Decimal>,
}

/// Member repository for registry CRUD and portal PINs.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a member with the next `AGT-NNNN` number.
    ///
    /// The number is taken under an exclusive lock so two concurrent
    /// registrations cannot collide.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn create_member(
        &self,
        cooperative_id: Uuid,
        input: CreateMemberInput,
    ) -> Result<members::Model, MemberError> {
        let txn = self.db.begin().await?;

        let last = members::Entity::find()
            .filter(members::Column::CooperativeId.eq(cooperative_id))
            .order_by_desc(members::Column::MemberNumber)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let seq = kopra_core::ledger::next_sequence(
            last.as_ref().map(|m| m.member_number.as_str()),
        );
        let member_number = format!("{MEMBER_NUMBER_PREFIX}-{seq:04}");

        let now = Utc::now().into();
        let member = members::ActiveModel {
            id: Set(Uuid::new_v4()),
            cooperative_id: Set(cooperative_id),
            member_number: Set(member_number),
            name: Set(input.name),
            national_id: Set(input.national_id),
            phone: Set(input.phone),
            address: Set(input.address),
            join_date: Set(input.join_date),
            pin_hash: Set(None),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let member = member.insert(&txn).await?;

        txn.commit().await?;
        Ok(member)
    }

    /// Lists members, optionally matching a name or number search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_members(
        &self,
        cooperative_id: Uuid,
        search: Option<&str>,
        active: Option<bool>,
        page: PageRequest,
    ) -> Result<PageResponse<members::Model>, MemberError> {
        let page = page.clamped();

        let mut query =
            members::Entity::find().filter(members::Column::CooperativeId.eq(cooperative_id));

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(members::Column::Name.like(&pattern))
                    .add(members::Column::MemberNumber.like(&pattern)),
            );
        }
        if let Some(active) = active {
            query = query.filter(members::Column::Active.eq(active));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(members::Column::MemberNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Finds a member by id.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::MemberNotFound`] when the id does not
    /// exist under this cooperative.
    pub async fn find_member(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
    ) -> Result<members::Model, MemberError> {
        members::Entity::find_by_id(id)
            .filter(members::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?
            .ok_or(MemberError::MemberNotFound(id))
    }

    /// Updates a member's contact details.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::MemberNotFound`] when the id does not
    /// exist under this cooperative.
    pub async fn update_member(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
        input: UpdateMemberInput,
    ) -> Result<members::Model, MemberError> {
        let member = self.find_member(cooperative_id, id).await?;

        let mut active: members::ActiveModel = member.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(national_id) = input.national_id {
            active.national_id = Set(national_id);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deactivates a member whose savings balance is zero.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::HasSavings`] when the member still holds
    /// savings.
    pub async fn deactivate_member(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
    ) -> Result<(), MemberError> {
        let member = self.find_member(cooperative_id, id).await?;

        let balance = self.total_savings(cooperative_id, id).await?;
        if balance != Decimal::ZERO {
            return Err(MemberError::HasSavings(balance));
        }

        let mut active: members::ActiveModel = member.into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Sets or replaces a member's portal PIN.
    ///
    /// # Errors
    ///
    /// Returns a hashing error or [`MemberError::MemberNotFound`].
    pub async fn set_pin(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
        pin: &str,
    ) -> Result<(), MemberError> {
        let member = self.find_member(cooperative_id, id).await?;

        let hash = hash_password(pin)?;
        let mut active: members::ActiveModel = member.into();
        active.pin_hash = Set(Some(hash));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Verifies portal credentials and returns the member on success.
    ///
    /// A wrong number, an inactive member, and a wrong PIN all report
    /// the same error, so the portal leaks nothing about which failed.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::InvalidCredentials`] unless everything
    /// checks out.
    pub async fn verify_pin(
        &self,
        cooperative_id: Uuid,
        member_number: &str,
        pin: &str,
    ) -> Result<members::Model, MemberError> {
        let member = members::Entity::find()
            .filter(members::Column::CooperativeId.eq(cooperative_id))
            .filter(members::Column::MemberNumber.eq(member_number))
            .one(&self.db)
            .await?
            .ok_or(MemberError::InvalidCredentials)?;

        if !member.active {
            return Err(MemberError::InvalidCredentials);
        }
        let hash = member
            .pin_hash
            .as_deref()
            .ok_or(MemberError::InvalidCredentials)?;
        if !verify_password(pin, hash)? {
            return Err(MemberError::InvalidCredentials);
        }

        Ok(member)
    }

    /// Derives the member's total savings across all types.
    async fn total_savings(
        &self,
        cooperative_id: Uuid,
        member_id: Uuid,
    ) -> Result<Decimal, MemberError> {
        let rows = savings_transactions::Entity::find()
            .select_only()
            .column(savings_transactions::Column::Direction)
            .column_as(savings_transactions::Column::Amount.sum(), "total")
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .filter(savings_transactions::Column::MemberId.eq(member_id))
            .group_by(savings_transactions::Column::Direction)
            .into_model::<DirectionTotal>()
            .all(&self.db)
            .await?;

        let mut balance = Decimal::ZERO;
        for row in rows {
            let amount = row.total.unwrap_or(Decimal::ZERO);
            match row.direction {
                SavingsDirection::Deposit => balance += amount,
                SavingsDirection::Withdrawal => balance -= amount,
            }
        }
        Ok(balance)
    }
}
