pub mod enums;
pub mod iam;
pub mod magazines;
pub mod plans;
pub mod subscriptions;
pub mod validation;
