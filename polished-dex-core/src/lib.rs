//! Shared vocabulary for the polished-dex workspace: the two balance
//! variants, identity normalization, field provenance, diagnostics and the
//! record data model.

pub mod diagnostics;
pub mod identity;
pub mod provenance;
pub mod types;
pub mod variant;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use identity::{
    PLAIN_FORM, capitalize, display_name, form_key, reduce, split_form_suffix, strip_numeric_suffix,
    title_case,
};
pub use provenance::Field;
pub use types::*;
pub use variant::{Variant, VariantMap, VariantParseError};
