pub mod auth;
pub mod health;
pub mod request_id;
pub mod tariff_plans;
