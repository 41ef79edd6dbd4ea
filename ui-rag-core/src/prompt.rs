//! Prompt assembly
//!
//! Turns ranked search results into `{system, user}` prompt text for an LLM
//! assistant. Pure templating: the output depends only on the inputs and the
//! timestamp recorded in the metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::RetrievedDocument;
use crate::search::SearchResult;

const MAX_IMPROVEMENTS: usize = 3;
const MAX_KEYWORDS: usize = 5;
const DEFAULT_EXCERPT_CHARS: usize = 500;

const DEFAULT_COMPARISON_CRITERIA: [&str; 5] = [
    "Implementation complexity",
    "Accessibility",
    "Performance",
    "Maintainability",
    "Browser support",
];

const ANSWER_FORMAT: &str = "You are an expert in UI/UX design and front-end development. \
Acting as a technical mentor, answer in the following format:

**Purpose of the code**
(What this UI component does)

**Issues and improvements**
(Problems in the current implementation or common pitfalls)

**Improved code**
```typescript
// improved implementation
```

**Learning points**
(What can be learned from this implementation and where to apply it)

---
";

const GUIDELINES: &str = "
---
## Answer guidelines:
1. **Implementation first**: provide code examples that actually work
2. **Explain the why**: make clear why the implementation looks the way it does
3. **Alternatives**: suggest better implementations or alternatives where they exist
4. **Terminology**: add a short explanation to specialist terms
5. **Structure**: keep strictly to the four-part answer format above

Use the reference material above to give practical, instructive advice for the question.";

/// Optional project details appended to the system prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectContext {
    pub tech_stack: Option<String>,
    pub design_system: Option<String>,
    /// Defaults to "web" when absent
    pub target_device: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    pub results_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// What is handed to the LLM call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub system: String,
    pub user: String,
    pub metadata: PromptMetadata,
}

/// Builds design-advice and comparison prompts from search results
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    excerpt_chars: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self {
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum characters of content quoted per result
    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    /// Design-advice prompt stamped with the current time
    pub fn assemble(
        &self,
        query: &str,
        results: &[SearchResult],
        context: Option<&ProjectContext>,
    ) -> PromptPayload {
        self.assemble_at(query, results, context, Utc::now())
    }

    /// Design-advice prompt with an explicit timestamp
    pub fn assemble_at(
        &self,
        query: &str,
        results: &[SearchResult],
        context: Option<&ProjectContext>,
        generated_at: DateTime<Utc>,
    ) -> PromptPayload {
        let mut system = String::from(ANSWER_FORMAT);
        system.push_str(&format!(
            "## Retrieved UI reference material ({} results):\n",
            results.len()
        ));

        for (i, result) in results.iter().enumerate() {
            self.push_result_block(&mut system, i + 1, result);
        }

        if let Some(context) = context {
            push_context_block(&mut system, context);
        }

        system.push_str(GUIDELINES);

        PromptPayload {
            system,
            user: user_prompt(query, results.len()),
            metadata: PromptMetadata {
                search_query: Some(query.to_string()),
                results_count: results.len(),
                generated_at,
            },
        }
    }

    /// Side-by-side comparison prompt
    pub fn assemble_comparison(
        &self,
        results: &[SearchResult],
        criteria: Option<&[String]>,
    ) -> PromptPayload {
        let criteria: Vec<String> = match criteria {
            Some(criteria) if !criteria.is_empty() => criteria.to_vec(),
            _ => DEFAULT_COMPARISON_CRITERIA
                .iter()
                .map(|c| c.to_string())
                .collect(),
        };

        let mut system = format!(
            "Compare and analyse the following {} UI components.\n\n## Comparison criteria:\n",
            results.len()
        );
        for criterion in &criteria {
            system.push_str(&format!("- {}\n", criterion));
        }
        system.push_str("\n## Components:");

        for (i, result) in results.iter().enumerate() {
            let document = &result.document;
            system.push_str(&format!(
                "\n\n### {}. {}\n- UI type: {}\n- Evaluation score: {:.2}\n- Description: {}\n",
                i + 1,
                document.title,
                document.ui_type,
                evaluation_score(document),
                description_or_none(document)
            ));
        }

        let user = "Compare the components above in a table and make the strengths and \
weaknesses of each one clear.\n\nFinally, recommend a component for each use case \
(prototype, production, learning)."
            .to_string();

        PromptPayload {
            system,
            user,
            metadata: PromptMetadata {
                search_query: None,
                results_count: results.len(),
                generated_at: Utc::now(),
            },
        }
    }

    fn push_result_block(&self, out: &mut String, rank: usize, result: &SearchResult) {
        let document = &result.document;

        out.push_str(&format!(
            "\n### {}. {} (similarity: {:.2})\n**UI type**: {}\n**Description**: {}\n**Evaluation score**: {:.2}\n",
            rank,
            document.title,
            result.similarity,
            document.ui_type,
            description_or_none(document),
            evaluation_score(document)
        ));

        if let Some(evaluation) = &document.evaluation {
            if let Some(quality) = &evaluation.quality {
                out.push_str(&format!(
                    "**Quality**: reusability={}, maintainability={}, accessibility={}\n",
                    quality.reusability.as_deref().unwrap_or("N/A"),
                    quality.maintainability.as_deref().unwrap_or("N/A"),
                    quality.accessibility.as_deref().unwrap_or("N/A")
                ));
            }

            if !evaluation.improvements.is_empty() {
                let improvements: Vec<&str> = evaluation
                    .improvements
                    .iter()
                    .take(MAX_IMPROVEMENTS)
                    .map(String::as_str)
                    .collect();
                out.push_str(&format!("**Improvements**: {}\n", improvements.join(", ")));
            }

            if let Some(classification) = &evaluation.classification {
                if !classification.secondary_types.is_empty() {
                    out.push_str(&format!(
                        "**Classification**: {} ({})\n",
                        classification.primary_type,
                        classification.secondary_types.join(", ")
                    ));
                }
            }
        }

        if !document.keywords.is_empty() {
            let keywords: Vec<&str> = document
                .keywords
                .iter()
                .take(MAX_KEYWORDS)
                .map(String::as_str)
                .collect();
            out.push_str(&format!("**Keywords**: {}\n", keywords.join(", ")));
        }

        if let Some(content) = document.content.as_deref().filter(|c| !c.is_empty()) {
            let excerpt: String = content.chars().take(self.excerpt_chars).collect();
            let ellipsis = if content.chars().count() > self.excerpt_chars {
                "..."
            } else {
                ""
            };
            out.push_str(&format!(
                "**Implementation example**:\n```\n{}{}\n```\n",
                excerpt, ellipsis
            ));
        }

        out.push('\n');
    }
}

fn push_context_block(out: &mut String, context: &ProjectContext) {
    out.push_str(&format!(
        "\n---\n## Project information:\n- **Tech stack**: {}\n- **Design system**: {}\n- **Target device**: {}\n- **Requirements**: {}\n",
        context.tech_stack.as_deref().unwrap_or("unspecified"),
        context.design_system.as_deref().unwrap_or("unspecified"),
        context.target_device.as_deref().unwrap_or("web"),
        context.requirements.as_deref().unwrap_or("unspecified")
    ));
}

fn user_prompt(query: &str, results_count: usize) -> String {
    format!(
        "Question: {}\n\nAnswer concretely from the following angles:\n\n\
1. **Analysis**: summarise the background and key points of the question\n\
2. **Implementation**: concrete code examples in TypeScript/React/HTML/CSS\n\
3. **Best practices**: accessibility, SEO and performance\n\
4. **Next steps**: improvements toward a better design and implementation\n\n\
Ground your answer in the {} reference results above and give examples usable in a real project.",
        query, results_count
    )
}

fn description_or_none(document: &RetrievedDocument) -> &str {
    if document.description.is_empty() {
        "none"
    } else {
        &document.description
    }
}

fn evaluation_score(document: &RetrievedDocument) -> f32 {
    document
        .evaluation
        .as_ref()
        .map_or(0.0, |evaluation| evaluation.consistency_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Evaluation, QualityScores, UiClassification};
    use crate::search::QueryOrigin;
    use crate::testing::fixture;

    fn result(title: &str, similarity: f32) -> SearchResult {
        SearchResult {
            document: fixture(title, "navigation", vec![1.0, 0.0]).to_retrieved(false),
            similarity,
            origin: QueryOrigin::Text("q".to_string()),
        }
    }

    fn timestamp() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_result_block() {
        let mut navbar = result("Bootstrap Navbar", 0.9234);
        navbar.document.keywords = (1..=7).map(|i| format!("k{}", i)).collect();
        navbar.document.evaluation = Some(Evaluation {
            consistency_score: 0.85,
            quality: Some(QualityScores {
                reusability: Some("high".to_string()),
                maintainability: None,
                accessibility: Some("medium".to_string()),
            }),
            improvements: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            classification: Some(UiClassification {
                primary_type: "navigation".to_string(),
                secondary_types: vec!["header".to_string()],
            }),
        });

        let payload = PromptAssembler::new().assemble_at(
            "responsive navigation bar",
            &[navbar],
            None,
            timestamp(),
        );

        let system = &payload.system;
        assert!(system.contains("### 1. Bootstrap Navbar (similarity: 0.92)"));
        assert!(system.contains("**UI type**: navigation"));
        assert!(system.contains("**Evaluation score**: 0.85"));
        assert!(system.contains("reusability=high, maintainability=N/A, accessibility=medium"));
        assert!(system.contains("**Improvements**: a, b, c\n"));
        assert!(system.contains("**Classification**: navigation (header)"));
        assert!(system.contains("**Keywords**: k1, k2, k3, k4, k5\n"));
        assert!(!system.contains("Implementation example"));
        assert!(!system.contains("Project information"));
        assert!(system.ends_with(GUIDELINES));
    }

    #[test]
    fn test_ranks_and_user_prompt() {
        let payload = PromptAssembler::new().assemble_at(
            "modal dialog",
            &[result("Modal", 0.8), result("Dialog", 0.75)],
            None,
            timestamp(),
        );

        assert!(payload.system.contains("(2 results)"));
        assert!(payload.system.contains("### 2. Dialog (similarity: 0.75)"));
        assert!(payload.user.starts_with("Question: modal dialog"));
        assert!(payload.user.contains("the 2 reference results"));
        assert_eq!(payload.metadata.results_count, 2);
        assert_eq!(payload.metadata.search_query.as_deref(), Some("modal dialog"));
        assert_eq!(payload.metadata.generated_at, timestamp());
    }

    #[test]
    fn test_deterministic_for_fixed_timestamp() {
        let assembler = PromptAssembler::new();
        let results = [result("Modal", 0.8)];
        let a = assembler.assemble_at("q", &results, None, timestamp());
        let b = assembler.assemble_at("q", &results, None, timestamp());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_description_and_missing_evaluation() {
        let mut bare = result("Bare", 0.7);
        bare.document.description = String::new();
        bare.document.evaluation = None;
        bare.document.keywords.clear();

        let payload = PromptAssembler::new().assemble_at("q", &[bare], None, timestamp());
        assert!(payload.system.contains("**Description**: none"));
        assert!(payload.system.contains("**Evaluation score**: 0.00"));
        assert!(!payload.system.contains("**Keywords**"));
    }

    #[test]
    fn test_content_excerpt_truncated() {
        let mut with_code = result("Card", 0.8);
        with_code.document.content = Some("x".repeat(600));

        let payload = PromptAssembler::new().assemble_at("q", &[with_code], None, timestamp());
        let expected = format!("```\n{}...\n```", "x".repeat(500));
        assert!(payload.system.contains(&expected));
        assert!(!payload.system.contains(&"x".repeat(501)));
    }

    #[test]
    fn test_short_content_quoted_whole() {
        let mut with_code = result("Card", 0.8);
        with_code.document.content = Some("<div class=\"card\"></div>".to_string());

        let payload = PromptAssembler::new().assemble_at("q", &[with_code], None, timestamp());
        assert!(payload.system.contains("```\n<div class=\"card\"></div>\n```"));
    }

    #[test]
    fn test_project_context_defaults() {
        let context = ProjectContext {
            tech_stack: Some("React + TypeScript".to_string()),
            ..ProjectContext::default()
        };

        let payload = PromptAssembler::new().assemble_at(
            "q",
            &[result("A", 0.8)],
            Some(&context),
            timestamp(),
        );
        assert!(payload.system.contains("- **Tech stack**: React + TypeScript"));
        assert!(payload.system.contains("- **Design system**: unspecified"));
        assert!(payload.system.contains("- **Target device**: web"));
        assert!(payload.system.contains("- **Requirements**: unspecified"));
    }

    #[test]
    fn test_comparison_default_criteria() {
        let payload =
            PromptAssembler::new().assemble_comparison(&[result("A", 0.9), result("B", 0.8)], None);

        assert!(payload.system.starts_with("Compare and analyse the following 2 UI components."));
        for criterion in DEFAULT_COMPARISON_CRITERIA {
            assert!(payload.system.contains(&format!("- {}\n", criterion)));
        }
        assert!(payload.system.contains("### 2. B\n- UI type: navigation"));
        assert!(payload.metadata.search_query.is_none());
    }

    #[test]
    fn test_comparison_custom_criteria() {
        let criteria = vec!["Bundle size".to_string()];
        let payload = PromptAssembler::new()
            .assemble_comparison(&[result("A", 0.9)], Some(criteria.as_slice()));
        assert!(payload.system.contains("- Bundle size\n"));
        assert!(!payload.system.contains("- Accessibility\n"));
    }
}
