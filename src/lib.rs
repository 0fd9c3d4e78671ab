//! # Question Randomizer
//!
//! 把问卷题目按组别随机排序，并按答题进度逐个展示
//!
//! ## 架构设计
//!
//! ### ① 模型层（Models）
//! - `models/` - 单元、题目句柄、注册表、问卷文件加载
//! - `Registry` - 单元 arena，开始打乱后锁定
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯算法，不接触宿主
//! - `RandomSource` - 可注入的随机数来源
//! - `ConstrainedShuffle` - 限制同组连续次数的随机打乱，死局时整体重试
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 展示状态机
//! - `Sequencer` - `Idle → Active → Complete`，宿主回调以消息形式传入
//! - `HostAdapter` - 宿主问卷系统需要提供的显示/隐藏能力
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 加载问卷文件，用控制台宿主和模拟答题者运行
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Algorithm, Config};
pub use error::{AppError, AppResult, ConfigError, RegistryError, ShuffleError};
pub use models::{AdvancePolicy, QuestionRef, Registry, Unit, UnitId, UnitSpec};
pub use orchestrator::App;
pub use services::{ChaChaSource, ConstrainedShuffle, RandomSource, ScriptedSource, ShuffleOptions};
pub use workflow::{
    HostAdapter, HostCall, Interaction, RecordingHost, Sequencer, SequencerEvent,
    SequencerState, Transition,
};
