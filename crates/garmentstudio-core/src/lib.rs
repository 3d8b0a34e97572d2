//! # GarmentStudio Core
//!
//! Core types, traits, and utilities shared across the GarmentStudio
//! workspace:
//!
//! - Geometry primitives for the three coordinate spaces the editor works
//!   in (display pixels, normalized UV, texture pixels)
//! - Error types for all layers of the engine
//! - Engine-wide constants (texture resolution, interaction thresholds)
//! - An event bus for decoupled notification of editor state changes

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod geometry;

pub use error::{ConfigError, DecodeError, Error, GeometryError, Result};
pub use event_bus::{
    ElementEvent, ErrorEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter,
    PartEvent, StudioEvent, SubscriptionId, TextureEvent, UploadEvent,
};
pub use geometry::{DisplayPoint, TexturePoint, UvPoint, UvRect, UvSize};
