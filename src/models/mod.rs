pub mod credential;
pub mod loaders;
pub mod record;
pub mod site_profile;
pub mod target;

pub use credential::{normalize_same_site, NormalizedCredential, SameSitePolicy, SessionCredential};
pub use loaders::load_target_file;
pub use record::{
    normalize_text, ConvergedReason, Keyed, PairedRecord, PairedStatus, Phase, PrimaryRecord,
    RunResult,
};
pub use site_profile::{ContentFilter, SiteProfile};
pub use target::{Target, TargetFile, DEFAULT_OUTPUT_DIR};
