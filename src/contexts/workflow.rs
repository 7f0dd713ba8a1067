use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::data::GenerationBackend;

const PREVIEW_CHARS: usize = 100;

/// Text produced for one task. `thinking` and `plan` are only present when
/// the three-stage workflow ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default)]
    pub implementation: String,
}

/// Generates with `backend`, degrading any failure to an empty string.
pub fn generate_or_empty<B: GenerationBackend + ?Sized>(backend: &B, prompt: &str) -> String {
    match backend.generate(prompt) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            error!("Generation failed: {}", e);
            String::new()
        }
    }
}

/// Analyse, plan, then implement. Each stage feeds the next; a failed
/// stage hands an empty string forward instead of aborting.
pub fn think_plan_implement<B: GenerationBackend + ?Sized>(
    prompt: &str,
    backend: &B,
) -> WorkflowResult {
    let think_prompt = format!(
        "Analyze this request and break down what needs to be done:\n{}\n\nProvide a clear analysis in 2-3 sentences.",
        prompt
    );
    let thinking = generate_or_empty(backend, &think_prompt);
    info!("Thinking: {}...", preview(&thinking));

    let plan_prompt = format!(
        "Based on this analysis:\n{}\n\nCreate a detailed step-by-step plan to execute this request. Be specific and actionable.",
        thinking
    );
    let plan = generate_or_empty(backend, &plan_prompt);
    info!("Plan: {}...", preview(&plan));

    let implement_prompt = format!(
        "Following this plan:\n{}\n\nNow provide the implementation code, commands, or detailed steps to execute this. Be thorough and production-ready.",
        plan
    );
    let implementation = generate_or_empty(backend, &implement_prompt);
    info!("Implementation: {}...", preview(&implementation));

    WorkflowResult {
        thinking: Some(thinking),
        plan: Some(plan),
        implementation,
    }
}

/// One generation straight from the prompt.
pub fn single_shot<B: GenerationBackend + ?Sized>(prompt: &str, backend: &B) -> WorkflowResult {
    WorkflowResult {
        thinking: None,
        plan: None,
        implementation: generate_or_empty(backend, prompt),
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BackendError;
    use std::cell::RefCell;

    struct ScriptedBackend {
        replies: RefCell<Vec<Result<String, BackendError>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, BackendError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into_iter().rev().collect()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl GenerationBackend for ScriptedBackend {
        fn generate(&self, prompt: &str) -> Result<String, BackendError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok(String::new()))
        }
        fn list_models(&self) -> Result<Vec<String>, BackendError> {
            Ok(vec![])
        }
        fn is_available(&self) -> bool {
            true
        }
        fn model(&self) -> &str {
            "scripted"
        }
        fn set_model(&mut self, _model: &str) {}
        fn endpoint(&self) -> &str {
            "memory"
        }
    }

    #[test]
    fn stages_feed_each_other() {
        let backend = ScriptedBackend::new(vec![
            Ok("  analysis  ".to_string()),
            Ok("the plan".to_string()),
            Ok("the code".to_string()),
        ]);

        let result = think_plan_implement("make a calculator", &backend);

        assert_eq!(result.thinking.as_deref(), Some("analysis"));
        assert_eq!(result.plan.as_deref(), Some("the plan"));
        assert_eq!(result.implementation, "the code");

        let prompts = backend.prompts.borrow();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("make a calculator"));
        assert!(prompts[1].contains("analysis"));
        assert!(prompts[2].contains("the plan"));
    }

    #[test]
    fn failed_stage_propagates_empty_text() {
        let backend = ScriptedBackend::new(vec![
            Err(BackendError::Transport {
                url: "http://x".to_string(),
                message: "refused".to_string(),
            }),
            Ok("plan anyway".to_string()),
            Ok("code".to_string()),
        ]);

        let result = think_plan_implement("task", &backend);

        assert_eq!(result.thinking.as_deref(), Some(""));
        assert_eq!(result.implementation, "code");
        assert!(backend.prompts.borrow()[1].starts_with("Based on this analysis:\n\n"));
    }

    #[test]
    fn single_shot_only_implements() {
        let backend = ScriptedBackend::new(vec![Ok("done".to_string())]);
        let result = single_shot("task", &backend);
        assert_eq!(result.thinking, None);
        assert_eq!(result.plan, None);
        assert_eq!(result.implementation, "done");
        assert_eq!(backend.prompts.borrow().as_slice(), ["task".to_string()]);
    }
}
