mod error;
mod options;
mod record;

pub use error::UpdateError;
pub use options::{InstallMode, InstallOptions, InstallOverrides};
pub use record::{DiffManifest, PackageRecord};

#[cfg(test)]
mod tests;
