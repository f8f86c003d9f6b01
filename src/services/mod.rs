//! Stores and helpers the decision engine is wired to

pub mod custom_format_service;
pub mod held_file_store;
pub mod logging;
pub mod profile_store;
pub mod quality_parser;

pub use custom_format_service::{
    CustomFormatEvent, CustomFormatRepository, CustomFormatService, InMemoryCustomFormatRepository,
};
pub use held_file_store::HeldFileStore;
pub use logging::init_tracing;
pub use profile_store::ProfileStore;
