//! Non-database storage implementations

mod memory;

pub use memory::InMemoryTariffPlanRepository;
