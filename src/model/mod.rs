//! Data model for navigation assembly
//!
//! - `fragment`: configuration as authored
//! - `resolved`: canonical nodes handed to the shell
//! - `provider`: provider listings, fragment references and overlays

pub mod fragment;
pub mod provider;
pub mod resolved;

pub use fragment::{
    Compound, CompoundChild, ConfigurationFragment, CrossNavigation, DefineEntity, Inbound,
    NodeDefaults, NodeTarget, RawNode, TextDictionary, UserSettingsConfig, UserSettingsGroup,
    ViewGroupSettings,
};
pub use provider::{
    ContentFormat, ExtendedData, FragmentReference, InlineConfiguration, RawServiceProvider,
    RemoteConfiguration, RequestContext, ServiceProvider,
};
pub use resolved::{
    EntityRelativePathEntry, FragmentResult, ResolvedCompound, ResolvedCompoundChild,
    ResolvedIntent, ResolvedNode, RootSideChannel,
};
