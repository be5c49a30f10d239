//! `SeaORM` Entity prelude

pub use super::investment_items::Entity as InvestmentItems;
