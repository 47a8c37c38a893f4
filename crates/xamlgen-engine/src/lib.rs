//! # xamlgen-engine
//!
//! Turns profiles (type-to-markup rules) plus facts about a type's properties
//! into XAML.
//!
//! ## Pipeline
//!
//! ```text
//! PropertyDescriptor ─► resolve ─► Mapping / inline expansion / fallback
//!                                        │
//!                                        ▼
//!                        format (template + FormatContext) ─► text
//!                                        │
//!                                        ▼
//!                    Generator: class / selection wrapping ─► GeneratedXaml
//! ```
//!
//! - [`profile`] holds the rule model.
//! - [`property`] holds what an adapter knows about one property.
//! - [`catalog`] is the seam through which the engine asks about a type's own
//!   properties and enum members.
//! - [`resolve`] picks the mapping.
//! - [`format`] expands templates.
//! - [`generate`] assembles whole outputs.
//!
//! ## Quick Start
//!
//! ```
//! use xamlgen_engine::{EmptyCatalog, Profile, PropertyDescriptor, generate_for_type};
//!
//! let profile = Profile {
//!     name: "Demo".into(),
//!     class_grouping: "StackPanel".into(),
//!     fallback_output: Some("<TextBlock Text=\"{x:Bind $name$}\" />".into()),
//!     ..Profile::default()
//! };
//! let props = vec![PropertyDescriptor::new("Title", "string")];
//!
//! let out = generate_for_type(&profile, "Book", &props, &EmptyCatalog).unwrap();
//! assert_eq!(out.output, "<StackPanel>\n    <TextBlock Text=\"{x:Bind Title}\" />\n</StackPanel>");
//! ```
//!
//! Every pass owns its [`FormatContext`]; nothing is shared between calls, so
//! generation for different classes can run concurrently.

pub mod catalog;
pub mod error;
pub mod format;
pub mod generate;
pub mod profile;
pub mod property;
pub mod resolve;

pub use catalog::{EmptyCatalog, MemberInfo, TypeCatalog, TypeInfo, TypeTable};
pub use error::EngineError;
pub use format::{FormatContext, FormatEnv, NumericState, SubPropertyProducer, format};
pub use generate::{
    GeneratedXaml, Generator, SpannedProperty, generate_for_property, generate_for_selection,
    generate_for_type, properties_in_range, selection_name,
};
pub use profile::{ClassGrouping, Mapping, Profile};
pub use property::{AttributeArgument, AttributeDescriptor, PropertyDescriptor};
pub use resolve::{Resolution, resolve, resolve_output};
