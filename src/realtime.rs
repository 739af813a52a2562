mod connection;
pub mod notifier;

pub use notifier::{PaymentNotifier, Subscription};
