pub mod audit;
pub mod branch;
pub mod entity;
pub mod export;
pub mod filter;
pub mod part;
pub mod payment;
pub mod policy;
