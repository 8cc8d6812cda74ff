pub mod connection;
pub mod endpoints;
pub mod retry;

pub use connection::{CompletionClient, CompletionTransport, TransportError};
pub use retry::RetryPolicy;
