pub mod branch_api;
pub mod http;
pub mod part_api;
pub mod payment_api;
pub mod policy_api;

pub use branch_api::{BranchApi, BranchRemote};
pub use http::HttpApi;
pub use part_api::{PartApi, PartRemote};
pub use payment_api::{PaymentApi, PaymentRemote};
pub use policy_api::{PolicyApi, PolicyRemote};
