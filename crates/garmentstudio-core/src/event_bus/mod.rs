//! Event bus for editor state notifications.
//!
//! Collaborators outside the engine (preview renderers, persistence glue,
//! logging) observe the editor through events rather than by polling its
//! state. Events are cloneable and serializable for logging/replay.

mod bus;
mod events;

pub use bus::{EventBus, EventBusConfig, EventBusError, EventFilter, SubscriptionId};
pub use events::{
    ElementEvent, ErrorEvent, EventCategory, PartEvent, StudioEvent, TextureEvent, UploadEvent,
};
