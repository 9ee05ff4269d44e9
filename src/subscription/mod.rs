mod response;
mod workflow;

pub use response::{EmailSubscriptionMessage, SubscriptionConfirmation, SubscriptionResponder};
pub use workflow::{SubscribeOutcome, SubscriptionService};
