//! SeaORM entities

pub mod tariff_plan;
