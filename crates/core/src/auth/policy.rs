//! Role policy table.
//!
//! Every protected operation is listed here with the roles allowed to
//! perform it. Handlers call [`authorize`] through the API layer before
//! touching any data; there are no ad-hoc role strings at call sites.

use thiserror::Error;

use kopra_shared::Role;

/// Protected operations, grouped by resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create, update, or deactivate chart-of-accounts entries.
    ManageAccounts,
    /// Read accounts and balances.
    ViewAccounts,
    /// Create manual journal entries.
    PostJournal,
    /// Reverse a posted entry.
    ReverseJournal,
    /// Read journal entries and the general ledger.
    ViewJournal,
    /// Record savings deposits and withdrawals.
    RecordSavings,
    /// Read savings transactions and balances.
    ViewSavings,
    /// Create or update members, set portal PINs.
    ManageMembers,
    /// Read member data.
    ViewMembers,
    /// Create, update, or restock products.
    ManageProducts,
    /// Read the product catalog.
    ViewProducts,
    /// Ring up a sale.
    ProcessSale,
    /// Read sales and the daily summary.
    ViewSales,
    /// Read financial statements and the dashboard.
    ViewReports,
    /// Create staff users.
    ManageUsers,
}

impl Operation {
    /// Roles allowed to perform this operation.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [Role] {
        use Role::{Admin, Cashier, Treasurer};

        match self {
            Self::ManageAccounts
            | Self::ViewAccounts
            | Self::PostJournal
            | Self::ReverseJournal
            | Self::ViewJournal
            | Self::RecordSavings
            | Self::ViewSavings
            | Self::ManageMembers
            | Self::ViewReports => &[Admin, Treasurer],
            Self::ViewMembers | Self::ViewProducts | Self::ViewSales => {
                &[Admin, Treasurer, Cashier]
            }
            Self::ProcessSale => &[Admin, Cashier],
            Self::ManageProducts | Self::ManageUsers => &[Admin],
        }
    }
}

/// Authorization failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    /// The role is not in the operation's allow list.
    #[error("role {role} may not perform this operation")]
    NotAllowed {
        /// The role that was refused.
        role: Role,
    },
}

/// Checks a role against the policy table.
///
/// # Errors
///
/// Returns [`AuthzError::NotAllowed`] when the role is not permitted.
pub fn authorize(role: Role, operation: Operation) -> Result<(), AuthzError> {
    if operation.allowed_roles().contains(&role) {
        Ok(())
    } else {
        Err(AuthzError::NotAllowed { role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_do_everything() {
        for op in [
            Operation::ManageAccounts,
            Operation::PostJournal,
            Operation::ReverseJournal,
            Operation::RecordSavings,
            Operation::ManageMembers,
            Operation::ManageProducts,
            Operation::ProcessSale,
            Operation::ViewReports,
            Operation::ManageUsers,
        ] {
            assert!(authorize(Role::Admin, op).is_ok(), "{op:?}");
        }
    }

    #[test]
    fn test_treasurer_handles_bookkeeping_not_pos() {
        assert!(authorize(Role::Treasurer, Operation::PostJournal).is_ok());
        assert!(authorize(Role::Treasurer, Operation::RecordSavings).is_ok());
        assert!(authorize(Role::Treasurer, Operation::ViewReports).is_ok());
        assert_eq!(
            authorize(Role::Treasurer, Operation::ProcessSale),
            Err(AuthzError::NotAllowed {
                role: Role::Treasurer
            })
        );
        assert!(authorize(Role::Treasurer, Operation::ManageProducts).is_err());
    }

    #[test]
    fn test_cashier_handles_pos_not_ledger() {
        assert!(authorize(Role::Cashier, Operation::ProcessSale).is_ok());
        assert!(authorize(Role::Cashier, Operation::ViewProducts).is_ok());
        assert!(authorize(Role::Cashier, Operation::ViewSales).is_ok());
        assert!(authorize(Role::Cashier, Operation::PostJournal).is_err());
        assert!(authorize(Role::Cashier, Operation::RecordSavings).is_err());
        assert!(authorize(Role::Cashier, Operation::ViewReports).is_err());
    }
}
