//! Portal navigation assembly
//!
//! Builds the navigation tree of a micro-frontend shell from configuration
//! fragments contributed by independent extension providers, and resolves
//! cross-provider navigation intents across that tree.
//!
//! ## Pipeline
//! raw fragment -> Locale Resolver -> Node Tree Builder (+ transfer side
//! channel) -> Intent Resolution -> Extended-Data Merger -> provider nodes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use portal_nav::{AssemblerConfig, NavigationAssembler, RequestContext, StaticDiscovery};
//!
//! # async fn run() -> Result<(), portal_nav::AssemblyError> {
//! let discovery = Arc::new(StaticDiscovery::new(vec![]));
//! let assembler = NavigationAssembler::with_http(discovery, AssemblerConfig::default())?;
//! let providers = assembler.assemble(&RequestContext::new("token", "de")).await?;
//! println!("{}", serde_json::to_string_pretty(&providers)?);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

pub mod config;
pub mod model;

// Pipeline stages
pub mod extended;
pub mod intent;
pub mod localization;
pub mod tree;

// Collaborators and orchestration
pub mod discovery;
pub mod fetch;
pub mod orchestrator;

pub use config::AssemblerConfig;
pub use discovery::{ServiceProviderDiscovery, StaticDiscovery};
pub use error::{AssemblyError, AssemblyResult};
pub use extended::apply_extended_data;
pub use fetch::{FragmentFetcher, HttpFragmentFetcher, RequestScopedFetcher};
pub use intent::{resolve_intents, IntentResolution};
pub use localization::{localize_fragment, select_dictionary};
pub use model::{
    ConfigurationFragment, ContentFormat, EntityRelativePathEntry, ExtendedData,
    FragmentReference, FragmentResult, RawNode, RawServiceProvider, RequestContext,
    ResolvedIntent, ResolvedNode, RootSideChannel, ServiceProvider,
};
pub use orchestrator::{process_fragment, url_template_url, NavigationAssembler};
pub use tree::TreeBuilder;
