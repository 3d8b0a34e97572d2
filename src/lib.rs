//! # GarmentStudio
//!
//! A garment customization studio: place uploaded 2D artwork onto named UV
//! regions of a 3D garment and composite a single printable texture map.
//!
//! ## Architecture
//!
//! GarmentStudio is organized as a workspace:
//!
//! 1. **garmentstudio-core** - Geometry types, errors, constants, event bus
//! 2. **garmentstudio-designer** - Compositing and placement engine
//! 3. **garmentstudio** - Binary driving the engine headlessly

pub use garmentstudio_designer as designer;

pub use garmentstudio_core::{
    ConfigError, DecodeError, DisplayPoint, ElementEvent, Error, ErrorEvent, EventBus,
    EventCategory, EventFilter, GeometryError, PartEvent, Result, StudioEvent, TexturePoint,
    TextureEvent, UploadEvent, UvPoint, UvRect, UvSize,
};

pub use garmentstudio_designer::{
    composite, CoordinateMapper, DesignElement, ElementStore, GarmentPart, ImageSlot,
    InteractionController, PartId, PartLayout, PartRegistry, PointerOutcome, PointerState,
    RecompositeScheduler, StudioSession, TextureMap, TextureSink, UploadQueue, UploadTicket,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output and `RUST_LOG`
/// environment variable support, defaulting to INFO.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
