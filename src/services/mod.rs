// Service exports
pub mod billing;
pub mod llm;
pub mod store;

pub use billing::{BillingClient, BillingError, SubscriptionStatus};
pub use llm::{LlmClient, LlmError, LlmMessage, LlmOptions};
pub use store::{Filter, StoreClient, StoreError, StoreTables};
