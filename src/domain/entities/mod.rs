pub mod magazines;
pub mod plans;
pub mod subscriptions;
pub mod users;
