pub mod plan_tiers;
