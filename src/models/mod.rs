pub mod job_record;
pub mod loaders;
pub mod profile;

pub use job_record::{JobRecord, JobStatus};
pub use loaders::{load_profile, load_urls_file, validate_urls};
pub use profile::{Profile, RawProfile};
