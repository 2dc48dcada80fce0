pub mod error;
pub mod layout;
pub mod lexicon;
pub mod sessions;
pub mod settings;

pub use error::{Result, StoreError};
pub use layout::{default_base_dir, sessions_dir, settings_path};
pub use lexicon::{LoadReport, SkippedFile, load_dictionaries};
pub use sessions::SessionStore;
pub use settings::SettingsStore;
