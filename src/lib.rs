//! Scrollshot — screenshot engine for a browser extension.
//!
//! Captures the visible viewport, a user-selected area, or the whole page
//! by scrolling and stitching. This file only wires the domains together:
//!
//!   - capture/     — capture driver, browser host seam, full-page pass
//!   - probe/       — in-page measurement and DOM primitives
//!   - compositor/  — crop and stitch, data URL codec, compositor context
//!   - commands.rs  — protocol message handlers
//!   - results.rs   — pending results awaiting their presentation surface
//!   - selection.rs — selection overlay state machine
//!   - settings.rs  — timing and title configuration

pub mod capture;
pub mod commands;
pub mod compositor;
pub mod messages;
pub mod probe;
pub mod results;
pub mod selection;
pub mod settings;
pub mod types;

pub use capture::{BrowserHost, CaptureDriver, CaptureError, HostError, TabInfo};
pub use commands::ScreenshotService;
pub use messages::Message;
pub use probe::{PageProbe, ProbeError, ScriptExecutor, ScriptedProbe};
pub use settings::CaptureSettings;

/// Load environment overrides and start logging, then read settings.
///
/// `.env.local` wins over `.env`; only the first one found is loaded.
/// Safe to call more than once.
pub fn init() -> CaptureSettings {
    'env_load: for env_file in [".env.local", ".env"] {
        let path = std::path::Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break 'env_load;
        }
    }

    if env_logger::try_init().is_ok() {
        log::info!("Scrollshot starting up");
    }

    let settings = CaptureSettings::from_env();
    log::debug!("[STARTUP] {:?}", settings);
    settings
}
