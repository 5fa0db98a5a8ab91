// 客户端侧：页面生命周期、附件编码、本地历史

mod attachment;
mod chat;
mod controller;
mod history;

pub use attachment::{detect_mime, DataUri, FileAttachment};
pub use chat::InterviewSession;
pub use controller::{FormRule, PageController, PageState, SubmitOutcome};
pub use history::{HistoryEntry, HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};
