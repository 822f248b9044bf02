//! Response envelopes the persistence service wraps single entities in
//! (`{"plan": {...}}`, `{"user": {...}}`, etc).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PlanEnvelope<T> {
    pub plan: T,
}

#[derive(Debug, Deserialize)]
pub struct TaskEnvelope<T> {
    pub task: T,
}

#[derive(Debug, Deserialize)]
pub struct TasksEnvelope<T> {
    pub tasks: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

#[derive(Debug, Deserialize)]
pub struct UsersEnvelope<T> {
    pub users: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct LogEnvelope<T> {
    pub log: T,
}

#[derive(Debug, Deserialize)]
pub struct SkillEnvelope<T> {
    pub skill: T,
}
