//! Alert evaluation: trigger rule, evaluation cycle, subscriber loop, registration

pub mod evaluator;
pub mod registration;
pub mod subscription;
pub mod trigger;

pub use evaluator::{AlertEvaluator, CycleReport};
pub use registration::CreateAlertRequest;
pub use subscription::{run_subscription, AlertSink, SubscriptionEnd};
pub use trigger::{current_value, is_triggered};
