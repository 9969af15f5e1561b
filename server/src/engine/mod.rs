pub mod events;
pub mod membership;
pub mod notifier;
pub mod relay;
pub mod snapshot;
pub mod thresholds;
pub mod validation;
