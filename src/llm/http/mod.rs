//! HTTP 客户端实现模块
//!
//! `GenericHttpClient` 按 `ApiFormat` 组装请求体与端点，
//! 所有参数来自 `ProviderConfig`，不硬编码厂商细节。

#[cfg(feature = "http-client")]
pub mod generic;

#[cfg(feature = "http-client")]
pub use generic::GenericHttpClient;
