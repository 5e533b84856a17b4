//! Template conversion and dynamic form generation
//!
//! `TemplateConverter` turns a `DocumentAnalysis` into a `ConvertedTemplate` (typed
//! fields plus a form schema). `FormGenerator` renders a template into a
//! `FormStructure` for a layout and theme, and `validate_instance` checks submitted
//! data against the template.

pub mod converter;
pub mod generator;
pub mod instance;
pub mod layout;
pub mod logic;
pub mod normalize;
pub mod options;
pub mod sample;
pub mod schema;
pub mod theme;

pub use converter::{ConversionError, ConversionOptions, TemplateConverter};
pub use generator::{FormGenerator, GeneratorConfig};
pub use instance::validate_instance;
pub use normalize::{generate_label, normalize_name};
