//! Search-then-assemble in one call

use serde::Serialize;

use crate::error::Result;
use crate::prompt::{ProjectContext, PromptAssembler, PromptPayload};
use crate::search::{AdvancedSearcher, SearchOptions, SearchResult};

/// Results together with the prompt built from them
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPrompt {
    pub results: Vec<SearchResult>,
    pub prompt: PromptPayload,
}

/// Runs a filtered search and turns the hits into a prompt
pub struct PromptPipeline {
    searcher: AdvancedSearcher,
    assembler: PromptAssembler,
}

impl PromptPipeline {
    pub fn new(searcher: AdvancedSearcher, assembler: PromptAssembler) -> Self {
        Self {
            searcher,
            assembler,
        }
    }

    /// Design-advice prompt for `query`
    ///
    /// `limit` defaults to the configured prompt search limit. With
    /// `include_code` the results carry their content and the prompt quotes it.
    pub fn generate(
        &self,
        query: &str,
        limit: Option<usize>,
        include_code: bool,
        context: Option<&ProjectContext>,
    ) -> Result<GeneratedPrompt> {
        log::info!("Generating prompt for: '{}'", query);

        let options = SearchOptions {
            limit: limit.unwrap_or(self.searcher.config().prompt_search_limit),
            include_content: include_code,
            ..SearchOptions::default()
        };
        let results = self.searcher.search_with_filters(query, &options)?;
        let prompt = self.assembler.assemble(query, &results, context);

        Ok(GeneratedPrompt { results, prompt })
    }

    /// Comparison prompt over the components found for `query`
    pub fn compare(
        &self,
        query: &str,
        limit: Option<usize>,
        criteria: Option<&[String]>,
    ) -> Result<GeneratedPrompt> {
        let options = SearchOptions {
            limit: limit.unwrap_or(self.searcher.config().prompt_search_limit),
            ..SearchOptions::default()
        };
        let results = self.searcher.search_with_filters(query, &options)?;
        let prompt = self.assembler.assemble_comparison(&results, criteria);

        Ok(GeneratedPrompt { results, prompt })
    }
}
