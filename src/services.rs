pub mod branch_service;
pub mod part_service;
pub mod payment_service;
pub mod policy_service;

pub use branch_service::BranchService;
pub use part_service::PartService;
pub use payment_service::{PaymentBoard, PaymentService};
pub use policy_service::PolicyService;
