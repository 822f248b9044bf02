//! Plan JSON extraction from a raw LLM completion (spec.md §4.3).
//!
//! The planner prompt asks for a fenced ` ```json ` block but models routinely
//! emit bare JSON or wrap it in prose, so extraction tries three tiers: fenced
//! block, whole-body parse, then gives up.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("static regex"));

/// Extracted plan, or the verdict that no tools are needed.
#[derive(Debug, Clone)]
pub enum ExtractedPlan {
    /// A plan with at least one step to execute.
    Plan(Value),
    /// The LLM decided no tools are needed: empty `plan`, an explicit
    /// `no_skills_needed` flag, or `plan_name == "null_plan"`.
    NoSkillsNeeded,
    /// The response contained no parseable JSON at all.
    Unparseable,
}

/// Try a fenced ```json block first, then the whole response body.
pub fn extract_plan_json(response_text: &str) -> Option<Value> {
    if let Some(captures) = FENCED_JSON.captures(response_text) {
        if let Some(body) = captures.get(1) {
            if let Ok(value) = serde_json::from_str(body.as_str()) {
                return Some(value);
            }
        }
    }
    serde_json::from_str(response_text).ok()
}

/// Classify a parsed plan JSON per spec.md §4.3's `no_skills_needed` rule:
/// missing/empty `plan`, an explicit `no_skills_needed` flag, or a
/// `plan_name` of `null_plan` (case-insensitive).
pub fn classify_plan(plan_json: &Value) -> ExtractedPlan {
    let plan_field = plan_json.get("plan");
    let plan_is_empty = match plan_field {
        None => true,
        Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(arr)) => arr.is_empty(),
        Some(_) => false,
    };
    let explicit_flag = plan_json
        .get("no_skills_needed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let is_null_plan = plan_json
        .get("plan_name")
        .and_then(Value::as_str)
        .map(|name| name.eq_ignore_ascii_case("null_plan"))
        .unwrap_or(false);

    if plan_is_empty || explicit_flag || is_null_plan {
        ExtractedPlan::NoSkillsNeeded
    } else {
        ExtractedPlan::Plan(plan_json.clone())
    }
}

/// Extract and classify a planner completion in one call.
pub fn extract_plan(response_text: &str) -> ExtractedPlan {
    match extract_plan_json(response_text) {
        Some(plan_json) => classify_plan(&plan_json),
        None => ExtractedPlan::Unparseable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_fenced_json_block() {
        let text = "here is the plan:\n```json\n{\"plan_name\": \"do it\"}\n```\ndone";
        let value = extract_plan_json(text).unwrap();
        assert_eq!(value["plan_name"], "do it");
    }

    #[test]
    fn falls_back_to_whole_body_parse() {
        let text = r#"{"plan_name": "do it"}"#;
        let value = extract_plan_json(text).unwrap();
        assert_eq!(value["plan_name"], "do it");
    }

    #[test]
    fn unparseable_prose_returns_none() {
        assert!(extract_plan_json("sorry, I can't help with that").is_none());
    }

    #[test]
    fn empty_plan_field_is_no_skills_needed() {
        let plan = json!({"plan_name": "x", "plan": []});
        assert!(matches!(classify_plan(&plan), ExtractedPlan::NoSkillsNeeded));
    }

    #[test]
    fn explicit_flag_is_no_skills_needed() {
        let plan = json!({"plan_name": "x", "plan": {"1": {}}, "no_skills_needed": true});
        assert!(matches!(classify_plan(&plan), ExtractedPlan::NoSkillsNeeded));
    }

    #[test]
    fn null_plan_name_is_no_skills_needed_case_insensitive() {
        let plan = json!({"plan_name": "Null_Plan", "plan": {"1": {}}});
        assert!(matches!(classify_plan(&plan), ExtractedPlan::NoSkillsNeeded));
    }

    #[test]
    fn nonempty_plan_with_no_flags_is_a_real_plan() {
        let plan = json!({"plan_name": "x", "plan": {"1": {"task_name": "t"}}});
        assert!(matches!(classify_plan(&plan), ExtractedPlan::Plan(_)));
    }
}
