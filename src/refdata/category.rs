//! Classification tables: balance-sheet categories, income/expense
//! categories, banks, and risk grades

use serde::{Deserialize, Serialize};

/// Balance-sheet placement of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    CurrentAsset,
    CurrentLiability,
    FixedAsset,
    LongTermLiability,
    Investment,
}

impl CategoryKind {
    /// All kinds in balance-sheet presentation order
    pub const ALL: [CategoryKind; 5] = [
        CategoryKind::CurrentAsset,
        CategoryKind::CurrentLiability,
        CategoryKind::FixedAsset,
        CategoryKind::LongTermLiability,
        CategoryKind::Investment,
    ];

    /// Whether this kind contributes to the asset side of the sheet
    pub fn is_asset(&self) -> bool {
        matches!(
            self,
            CategoryKind::CurrentAsset | CategoryKind::FixedAsset | CategoryKind::Investment
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::CurrentAsset => "CurrentAsset",
            CategoryKind::CurrentLiability => "CurrentLiability",
            CategoryKind::FixedAsset => "FixedAsset",
            CategoryKind::LongTermLiability => "LongTermLiability",
            CategoryKind::Investment => "Investment",
        }
    }
}

/// Asset/liability category, optionally wired to a quote driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,

    /// Quote driver id used to refresh current prices of projects in this
    /// category; None for categories without market quotes
    pub driver: Option<String>,
}

/// Direction of an account entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Income => "Income",
            FlowKind::Expense => "Expense",
        }
    }
}

/// Income/expense category for account entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCategory {
    pub name: String,
    pub kind: FlowKind,
}

/// Bank holding one or more accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
}

/// Risk grade label for investment projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_side() {
        assert!(CategoryKind::CurrentAsset.is_asset());
        assert!(CategoryKind::FixedAsset.is_asset());
        assert!(CategoryKind::Investment.is_asset());
        assert!(!CategoryKind::CurrentLiability.is_asset());
        assert!(!CategoryKind::LongTermLiability.is_asset());
    }
}
