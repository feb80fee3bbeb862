pub mod agent_bans;
pub mod banners;
pub mod earnings;
pub mod form;
pub mod payouts;
pub mod properties;
