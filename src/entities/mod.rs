pub mod prelude;

pub mod investment_items;
