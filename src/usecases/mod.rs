//! Application use cases. Orchestrate domain logic via ports.

pub mod auth_service;
pub mod expense_service;
pub mod group_service;
pub mod payment_service;

pub use auth_service::AuthService;
pub use expense_service::ExpenseService;
pub use group_service::GroupService;
pub use payment_service::PaymentService;
