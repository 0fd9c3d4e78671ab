//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! app (加载问卷文件，处理 Vec<SurveyFile>)
//!     ↓
//! session_runner (单份问卷：注册 → 打乱 → 模拟答题)
//!     ↓
//! workflow::Sequencer (状态机)
//!     ↓
//! services (能力层：随机数 / 打乱)
//! ```
//!
//! `console_host` 是命令行下的宿主实现，只把显示操作写进日志。

pub mod app;
pub mod console_host;
pub mod session_runner;

pub use app::App;
pub use console_host::ConsoleHost;
pub use session_runner::{drive, run_session, SessionStats};
