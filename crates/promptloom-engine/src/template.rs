//! Stored template records and thinking-mode prompt prefixes.
//!
//! These are the two value shapes the engine consumes but does not manage:
//! a [`PromptTemplate`] holds raw template text plus catalog metadata, and
//! a [`ThinkingTemplate`] produces the opaque instruction prefix that
//! [`render_thinking_prompt`](crate::render::TemplateEngine::render_thinking_prompt)
//! prepends to a rendered base template. Storage, collections, and backup
//! of these records belong to the calling application.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::extract::extract_variables;

/// A stored prompt template with catalog metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// The raw template text rendered by the engine.
    pub template: String,
    /// Variable names the author declared as inputs.
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PromptTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            template: template.into(),
            variables: Vec::new(),
            category: String::new(),
            tags: Vec::new(),
        }
    }

    /// The variables the template text actually references, independent of
    /// the declared `variables` list.
    pub fn referenced_variables(&self) -> BTreeSet<String> {
        extract_variables(&self.template)
    }
}

/// Reasoning style for a thinking-mode prompt prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingStyle {
    #[default]
    StepByStep,
    ProsCons,
    FirstPrinciples,
    Analytical,
    Creative,
}

impl FromStr for ThinkingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "step_by_step" | "step-by-step" => Ok(Self::StepByStep),
            "pros_cons" | "pros-cons" => Ok(Self::ProsCons),
            "first_principles" | "first-principles" => Ok(Self::FirstPrinciples),
            "analytical" => Ok(Self::Analytical),
            "creative" => Ok(Self::Creative),
            other => Err(format!("unknown thinking style: {other}")),
        }
    }
}

/// How far the model is asked to take its reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingDepth {
    Brief,
    #[default]
    Moderate,
    Deep,
}

/// Configuration for a thinking-mode instruction prefix.
///
/// The engine treats [`to_thinking_prompt`](Self::to_thinking_prompt)
/// output as opaque text; nothing in it is templated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkingTemplate {
    pub style: ThinkingStyle,
    #[serde(default)]
    pub depth: ThinkingDepth,
    #[serde(default = "default_show_reasoning")]
    pub show_reasoning: bool,
    #[serde(default = "default_reasoning_format")]
    pub reasoning_format: String,
}

fn default_show_reasoning() -> bool {
    true
}

fn default_reasoning_format() -> String {
    "markdown".to_string()
}

impl Default for ThinkingTemplate {
    fn default() -> Self {
        Self {
            style: ThinkingStyle::default(),
            depth: ThinkingDepth::default(),
            show_reasoning: default_show_reasoning(),
            reasoning_format: default_reasoning_format(),
        }
    }
}

impl ThinkingTemplate {
    pub fn new(style: ThinkingStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Produce the instruction prefix to prepend to a rendered prompt.
    pub fn to_thinking_prompt(&self) -> String {
        let style_line = match self.style {
            ThinkingStyle::StepByStep => "Work through this step by step.",
            ThinkingStyle::ProsCons => "Weigh the pros and cons of each option before answering.",
            ThinkingStyle::FirstPrinciples => {
                "Reason from first principles rather than by analogy."
            }
            ThinkingStyle::Analytical => "Analyze the problem systematically before answering.",
            ThinkingStyle::Creative => "Explore unconventional approaches before settling on one.",
        };
        let depth_line = match self.depth {
            ThinkingDepth::Brief => "Keep the reasoning brief.",
            ThinkingDepth::Moderate => "Reason at a moderate level of detail.",
            ThinkingDepth::Deep => "Reason thoroughly, considering edge cases.",
        };
        let mut prompt = format!("{style_line}\n{depth_line}\n");
        if self.show_reasoning {
            prompt.push_str(&format!(
                "Show your reasoning in {} format before the final answer.\n",
                self.reasoning_format
            ));
        }
        prompt.push('\n');
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prompt_template_round_trip() {
        let template = PromptTemplate {
            id: "greet-1".into(),
            name: "Greeting".into(),
            description: "Basic greeting".into(),
            template: "Hello {name}!".into(),
            variables: vec!["name".into()],
            category: "smalltalk".into(),
            tags: vec!["greeting".into()],
        };
        let json = serde_json::to_string(&template).unwrap();
        let back: PromptTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.template, "Hello {name}!");
        assert_eq!(back.variables, vec!["name".to_string()]);
    }

    #[test]
    fn test_referenced_variables_ignores_declared_list() {
        let mut template = PromptTemplate::new("t", "t", "{a} and {b.c}");
        template.variables = vec!["declared_but_unused".into()];
        let referenced: Vec<_> = template.referenced_variables().into_iter().collect();
        assert_eq!(referenced, vec!["a", "b"]);
    }

    #[test]
    fn test_thinking_prompt_reflects_config() {
        let thinking = ThinkingTemplate {
            style: ThinkingStyle::ProsCons,
            depth: ThinkingDepth::Deep,
            show_reasoning: false,
            reasoning_format: "markdown".into(),
        };
        let prompt = thinking.to_thinking_prompt();
        assert!(prompt.contains("pros and cons"));
        assert!(prompt.contains("thoroughly"));
        assert!(!prompt.contains("markdown"));
    }

    #[test]
    fn test_thinking_style_from_str() {
        assert_eq!(
            "step-by-step".parse::<ThinkingStyle>().unwrap(),
            ThinkingStyle::StepByStep
        );
        assert!("unknown".parse::<ThinkingStyle>().is_err());
    }
}
