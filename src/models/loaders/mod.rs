pub mod profile_loader;
pub mod url_loader;

pub use profile_loader::load_profile;
pub use url_loader::{load_urls_file, validate_urls};
