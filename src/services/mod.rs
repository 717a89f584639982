pub mod field_resolver;
pub mod outcome_recorder;
pub mod page_meta;
pub mod registry;
pub mod stability;

pub use field_resolver::{FieldResolver, Strategy};
pub use outcome_recorder::OutcomeRecorder;
pub use page_meta::{extract_meta, PageMeta};
pub use registry::{FieldKind, SemanticField};
pub use stability::{wait_for_stability, StabilityOptions};
