//! Core infrastructure shared by every stage of the pipeline.
//!
//! - [`types`]: identifiers, partitions and join keys
//! - [`constants`]: sentinel value, default column names, model defaults
//! - [`error`]: the [`RatingError`] taxonomy
//! - [`traits`]: the [`Regressor`] seam between the dataset and the model

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{RatingError, Result};
pub use traits::*;
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

/// Version information for the core module
pub const CORE_MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

static CORE_INIT: Once = Once::new();
static CORE_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize logging for the process.
///
/// Safe to call more than once; only the first call configures the logger.
/// `RUST_LOG` defaults to `info` when it is not set.
pub fn initialize_core() -> Result<()> {
    CORE_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "info");
        }

        // A host application may already own the logger
        let _ = env_logger::try_init();

        CORE_INITIALIZED.store(true, Ordering::SeqCst);
        log::debug!("Core module {} initialized", CORE_MODULE_VERSION);
    });

    Ok(())
}

/// Check if the core module is initialized
pub fn is_core_initialized() -> bool {
    CORE_INITIALIZED.load(Ordering::SeqCst)
}
