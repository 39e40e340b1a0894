pub mod issuer;
pub mod queue;

pub use issuer::TokenIssuerService;
pub use queue::TokenQueueService;
