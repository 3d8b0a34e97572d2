//! # GarmentStudio Designer
//!
//! This crate is the texture compositing and artwork placement engine. It
//! lets a user place uploaded 2D artwork onto named UV regions of a garment
//! (front, back, arms) and regenerates a single composite raster texture
//! that a 3D viewer applies as a material map.
//!
//! ## Core Components
//!
//! ### Coordinate spaces
//! - **CoordinateMapper**: conversion among display pixels, normalized UV,
//!   and texture pixels
//! - **PartRegistry**: named UV regions with configurable default placement
//!   boxes, priority-ordered hit-testing
//!
//! ### Editing
//! - **ElementStore**: placed artwork with stable ids and explicit z-order
//! - **InteractionController**: pointer state machine (select, drag with
//!   threshold, part activation)
//! - **StudioCommand**: undo/redo history
//!
//! ### Output
//! - **Compositor**: deterministic rasterization of base + elements into an
//!   immutable texture snapshot
//! - **RecompositeScheduler**: trailing-edge debounce so dragging never
//!   stalls on full-resolution renders
//! - **UploadQueue**: non-blocking image decoding with per-slot
//!   supersession
//!
//! ## Architecture
//!
//! ```text
//! StudioSession (one editing workflow)
//!   ├── CoordinateMapper (display <-> UV <-> texture)
//!   ├── PartRegistry (garment part configuration)
//!   ├── ElementStore (placed artwork, z-ordered)
//!   ├── InteractionController (pointer state machine)
//!   ├── UploadQueue (async decode, supersession)
//!   ├── RecompositeScheduler (debounced full renders)
//!   └── Compositor (preview + texture snapshots)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use garmentstudio_designer::StudioSession;
//!
//! let mut session = StudioSession::new();
//! session.upload_artwork(Some("front".into()), artwork_bytes)?;
//! session.pump_uploads();
//! let texture = session.composite_now();
//! ```

pub mod commands;
pub mod compositor;
pub mod element;
pub mod element_store;
pub mod interaction;
pub mod mapper;
pub mod parts;
pub mod scheduler;
pub mod session;
pub mod upload;

pub use commands::StudioCommand;
pub use compositor::{composite, TextureMap, TextureSink};
pub use element::{DesignElement, ImageSlot};
pub use element_store::ElementStore;
pub use interaction::{InteractionController, PointerOutcome, PointerState};
pub use mapper::CoordinateMapper;
pub use parts::{GarmentPart, PartId, PartLayout, PartRegistry};
pub use scheduler::{RecompositeScheduler, SchedulerStats};
pub use session::StudioSession;
pub use upload::{decode_image, DecodeOutcome, UploadQueue, UploadTarget, UploadTicket};
