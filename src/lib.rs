//! # scratch-heart
//!
//! A save-the-date scratch card: a gold, heart-shaped coating that the pointer
//! scratches away to reveal an invitation, with glitter thrown off the brush.
//!
//! [`ScratchCard`] is the whole widget. It is driven by two calls from the host,
//! [`ScratchCard::handle_event`] for pointer/touch input and
//! [`ScratchCard::on_frame`] once per display refresh, and it reports completion
//! through the callback registered with [`ScratchCard::on_complete`].

pub mod assets;
pub mod card;
pub mod coating;
pub mod config;
pub mod draw;
pub mod error;
pub mod gamma;
pub mod gesture;
pub mod particles;
pub mod scheduler;
pub mod silhouette;
pub mod surface;
pub mod types;

pub use card::ScratchCard;
pub use config::{CardConfig, CardStyle, MessageLine, ParticleTuning, RevealTuning};
pub use error::{Error, Result};
pub use gesture::{ClientPoint, PointerEvent, SurfaceGeometry};
pub use types::{FrameBuffer, SurfacePoint};
