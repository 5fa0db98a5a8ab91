pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod llm;
pub mod prompt;
pub mod schema;
pub mod state;
pub mod utils;

pub use cli::{schema_exports, SchemaExportEntry};
pub use client::{
    DataUri, FileAttachment, FormRule, HistoryEntry, HistoryStore, InterviewSession,
    PageController, PageState, SubmitOutcome, HISTORY_CAPACITY,
};
pub use config::{EnvConfig, ProviderConfig};
pub use error::{CareerFlowError, Result, GENERIC_FAILURE_MESSAGE};
pub use flow::{default_registry, FlowEngine, FlowRegistry, FlowSpec};
#[cfg(feature = "http-client")]
pub use llm::GenericHttpClient;
pub use llm::{
    ApiFormat, DynLlmClient, LlmClient, LlmRequest, LlmResponse, ModelConfig, ModelInvoker,
    ScriptedClient,
};
pub use prompt::{FlowInput, PromptWriter, RenderedPrompt};
pub use schema::{validate, FieldViolation, Schema, SchemaKind, ValidationErrors, ViolationKind};
pub use state::{FileStore, KeyValueStore, MemoryStore};
pub use utils::{logging, validation};
