//! Core data types for the agent orchestration engine.
//!
//! This crate provides the domain entities (`Plan`/`Task`/`Skill`/`PlanLog`/`MCPServer`)
//! and the LLM message types (`Role`/`Message`/`Input`/`Output`) shared across the
//! workspace.

mod domain;
mod input;
mod message;
mod output;
mod request;
mod role;

pub use domain::{
    MCPServer, MCPTool, Plan, PlanContext, PlanLog, PlanLogType, PlanStatus, Skill, SkillArg,
    Task, TaskStatus,
};
pub use input::Input;
pub use message::Message;
pub use output::{Output, ToolCall};
pub use request::{GenerateRequest, GenerateResponse};
pub use role::Role;
