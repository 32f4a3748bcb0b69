pub mod health_check;
pub mod subscriptions;

pub use health_check::check_health;
pub use subscriptions::create_subscription;
