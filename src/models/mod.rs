//! Data models for the berth reservation admin

pub mod enums;
pub mod filter;
pub mod form;
pub mod localized;
pub mod reservation;
pub mod resource;

// Re-export commonly used types
pub use enums::{BerthType, ReservationState};
pub use filter::{FilterKind, FilterSet, FilterValue};
pub use form::{FieldErrors, FieldFeedback, ReservationDraft};
pub use localized::LocalizedText;
pub use reservation::{Reservation, ReservationDetails, ReservationId, SavedReservation, UserRef};
pub use resource::{Berth, BoatResource, ResourceCatalog, ResourceRef, Unit};
