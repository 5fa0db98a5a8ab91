mod client;
pub mod http;
mod invoker;
mod scripted;
mod types;

pub use client::{DynLlmClient, LlmClient};
#[cfg(feature = "http-client")]
pub use http::GenericHttpClient;
pub use invoker::{parse_output, ModelInvoker};
pub use scripted::ScriptedClient;
pub use types::{ApiFormat, LlmRequest, LlmResponse, ModelConfig};
