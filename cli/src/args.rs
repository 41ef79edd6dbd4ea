//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ui_rag_core::search::params;
use ui_rag_core::{Aggregation, DocumentId, ProjectContext, Result};

#[derive(Debug, Parser)]
#[command(name = "ui-rag")]
#[command(about = "Semantic search over UI components and prompt generation")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Document store directory (overrides config and UI_RAG_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Default tracing filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "ui_rag=debug,ui_rag_cli=debug,ui_rag_core=debug"
        } else {
            "ui_rag=info,ui_rag_cli=info,ui_rag_core=warn"
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Single-query search
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
        /// Defaults to search.default_min_similarity (0.7)
        #[arg(long)]
        min_similarity: Option<f32>,
    },

    /// Search with category filters and optional content
    Filter {
        query: String,
        /// Allowed ui_type values (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Defaults to search.default_limit (10)
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0.0)]
        min_similarity: f32,
        #[arg(long)]
        include_content: bool,
    },

    /// Several queries merged per document
    Multi {
        #[arg(required = true, num_args = 1..)]
        queries: Vec<String>,
        /// Comma-separated, one per query
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f32>>,
        /// max, mean or weighted
        #[arg(long, default_value = "max")]
        aggregation: Aggregation,
    },

    /// Search a UI category through its canned phrases
    Category {
        category: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Components similar to a stored document
    Similar {
        id: DocumentId,
        #[arg(long, default_value_t = 5)]
        limit: usize,
        #[arg(long, default_value_t = 0.0)]
        min_similarity: f32,
    },

    /// Search and build a design-advice prompt
    Prompt {
        query: String,
        /// Defaults to search.prompt_search_limit (5)
        #[arg(long)]
        limit: Option<usize>,
        /// Leave component code out of the prompt
        #[arg(long)]
        no_code: bool,
        #[arg(long)]
        tech_stack: Option<String>,
        #[arg(long)]
        design_system: Option<String>,
        #[arg(long)]
        target_device: Option<String>,
        #[arg(long)]
        requirements: Option<String>,
    },

    /// Search and build a comparison prompt
    Compare {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        /// Comparison criteria (repeatable)
        #[arg(long = "criterion")]
        criteria: Vec<String>,
    },

    /// Document store statistics
    Stats,
}

impl Command {
    /// Reject malformed parameters before anything is loaded
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Search {
                query,
                limit,
                min_similarity,
            } => {
                params::validate_query(query)?;
                params::validate_limit(*limit)?;
                if let Some(min) = min_similarity {
                    params::validate_threshold(*min)?;
                }
            }
            Command::Filter {
                query,
                limit,
                min_similarity,
                ..
            } => {
                params::validate_query(query)?;
                if let Some(limit) = limit {
                    params::validate_limit(*limit)?;
                }
                params::validate_threshold(*min_similarity)?;
            }
            Command::Multi {
                queries, weights, ..
            } => params::validate_multi_query(queries, weights.as_deref())?,
            Command::Category { category, limit } => {
                params::validate_query(category)?;
                params::validate_limit(*limit)?;
            }
            Command::Similar {
                limit,
                min_similarity,
                ..
            } => {
                params::validate_limit(*limit)?;
                params::validate_threshold(*min_similarity)?;
            }
            Command::Prompt { query, limit, .. } | Command::Compare { query, limit, .. } => {
                params::validate_query(query)?;
                if let Some(limit) = limit {
                    params::validate_limit(*limit)?;
                }
            }
            Command::Stats => {}
        }
        Ok(())
    }

    /// Whether the command needs the embedding model
    pub fn needs_embeddings(&self) -> bool {
        !matches!(self, Command::Stats)
    }
}

/// Project context from the prompt flags, None when no flag was given
pub fn project_context(
    tech_stack: &Option<String>,
    design_system: &Option<String>,
    target_device: &Option<String>,
    requirements: &Option<String>,
) -> Option<ProjectContext> {
    let context = ProjectContext {
        tech_stack: tech_stack.clone(),
        design_system: design_system.clone(),
        target_device: target_device.clone(),
        requirements: requirements.clone(),
    };
    (context != ProjectContext::default()).then_some(context)
}
