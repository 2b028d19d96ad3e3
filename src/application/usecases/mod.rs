pub mod authentication;
pub mod magazines;
pub mod plans;
pub mod subscriptions;
