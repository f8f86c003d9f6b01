//! Built-in decision rules

mod custom_format_allowed;
mod cutoff;
mod quality_allowed;
mod upgradable;

pub use custom_format_allowed::CustomFormatAllowedByProfileSpecification;
pub use cutoff::CutoffSpecification;
pub use quality_allowed::QualityAllowedByProfileSpecification;
pub use upgradable::{UpgradableSpecification, UpgradeRejection};
