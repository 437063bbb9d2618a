//! Reservation edit-and-validate workflow
//!
//! Turns the loosely typed edit form into a confirmed [`Reservation`], asks
//! the persistence collaborator to store it and announces the change on the
//! event bus. Form dates use the display format `D.M.YYYY HH:mm` as wall
//! clock time in the configured display time zone, daylight saving included;
//! the stored instants are UTC.

use std::sync::Arc;

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::{
    config::DisplayConfig,
    error::AppResult,
    models::{
        form::fields, FieldErrors, FieldFeedback, LocalizedText, Reservation, ReservationDraft,
        ReservationId, ReservationState, ResourceCatalog, Unit, UserRef,
    },
    repository::{PersistenceError, ReservationPersistence},
    services::events::{AppEvent, EventBus},
};

/// Parse format of form dates (`1.6.2024 10:00`)
const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";
/// Date-only fallback, read as midnight
const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";
/// Output format without zero padding on day and month
const DISPLAY_OUTPUT_FORMAT: &str = "%-d.%-m.%Y %H:%M";

/// Shown next to the begin field when the period is inverted
pub const DATE_ORDER_MESSAGE: &str =
    "Alkupäivämäärän pitää olla ennen loppupäivämäärää.";

/// Parse a form date in display format
pub fn parse_display(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DISPLAY_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, DISPLAY_DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn format_display(value: &NaiveDateTime) -> String {
    value.format(DISPLAY_OUTPUT_FORMAT).to_string()
}

/// Default end of a berth reservation: one calendar year after `begin`.
///
/// Feb 29 maps to Feb 28 of the following year.
pub fn derive_end_from_begin(begin: NaiveDateTime) -> Option<String> {
    begin
        .checked_add_months(Months::new(12))
        .map(|end| format_display(&end))
}

/// Outcome of comparing the begin and end form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrdering {
    /// At least one side did not parse; nothing was flagged or cleared
    Indeterminate,
    /// `end` is not before `begin`
    Ordered,
    /// `end` is before `begin`
    Inverted,
}

/// Why a save attempt stopped before reaching the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Required fields missing: {}", .0.join(", "))]
    Required(Vec<String>),

    #[error("Field {0} is not a valid date")]
    UnparseableDate(String),
}

/// State of one save attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState {
    Idle,
    Validating,
    Rejected(ValidationFailure),
    Transformed,
    Committing,
    Committed(ReservationId),
    Failed(FieldErrors),
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptState::Rejected(_) | AttemptState::Committed(_) | AttemptState::Failed(_)
        )
    }

    fn label(&self) -> &'static str {
        match self {
            AttemptState::Idle => "idle",
            AttemptState::Validating => "validating",
            AttemptState::Rejected(_) => "rejected",
            AttemptState::Transformed => "transformed",
            AttemptState::Committing => "committing",
            AttemptState::Committed(_) => "committed",
            AttemptState::Failed(_) => "failed",
        }
    }
}

/// Select option for the berth picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOption {
    pub resource_id: String,
    pub berth_id: i64,
    pub name: String,
    pub unit_name: String,
}

/// Reservation edit workflow bound to a bus and a display time zone
#[derive(Clone)]
pub struct ReservationEditor {
    bus: Arc<EventBus>,
    time_zone: Tz,
    language: String,
}

impl ReservationEditor {
    pub fn new(bus: Arc<EventBus>, time_zone: Tz, language: impl Into<String>) -> Self {
        Self {
            bus,
            time_zone,
            language: language.into(),
        }
    }

    pub fn from_config(bus: Arc<EventBus>, display: &DisplayConfig) -> AppResult<Self> {
        Ok(Self::new(bus, display.time_zone()?, display.language.clone()))
    }

    /// Flag every empty required field. Returns false if any was empty.
    pub fn check_required(&self, draft: &ReservationDraft, feedback: &mut FieldFeedback) -> bool {
        let mut ok = true;
        for field in draft.required_fields() {
            if draft.value(field).is_empty() {
                feedback.mark_invalid(field);
                ok = false;
            } else {
                feedback.clear(field);
            }
        }
        ok
    }

    /// Flag both date fields when `end` precedes `begin`, clear them otherwise.
    ///
    /// Unparseable input leaves the feedback as it was.
    pub fn check_date_ordering(
        &self,
        begin_text: &str,
        end_text: &str,
        feedback: &mut FieldFeedback,
    ) -> DateOrdering {
        let (Some(begin), Some(end)) = (parse_display(begin_text), parse_display(end_text)) else {
            return DateOrdering::Indeterminate;
        };

        if end < begin {
            feedback.mark_invalid(fields::BEGIN);
            feedback.mark_invalid(fields::END);
            feedback.set_message(fields::BEGIN, DATE_ORDER_MESSAGE);
            DateOrdering::Inverted
        } else {
            feedback.clear(fields::BEGIN);
            feedback.clear(fields::END);
            DateOrdering::Ordered
        }
    }

    /// Begin picker changed: validate and return the default end text
    pub fn on_begin_changed(
        &self,
        draft: &ReservationDraft,
        feedback: &mut FieldFeedback,
    ) -> Option<String> {
        self.check_date_required(draft, fields::BEGIN, feedback);
        self.check_date_ordering(draft.begin_text(), draft.end_text(), feedback);
        parse_display(draft.begin_text()).and_then(derive_end_from_begin)
    }

    /// End picker changed
    pub fn on_end_changed(&self, draft: &ReservationDraft, feedback: &mut FieldFeedback) {
        self.check_date_required(draft, fields::END, feedback);
        self.check_date_ordering(draft.begin_text(), draft.end_text(), feedback);
    }

    fn check_date_required(
        &self,
        draft: &ReservationDraft,
        field: &str,
        feedback: &mut FieldFeedback,
    ) {
        if !draft.is_required(field) {
            return;
        }
        if draft.value(field).is_empty() {
            feedback.mark_invalid(field);
        } else {
            feedback.clear(field);
        }
    }

    /// Enabled resources as picker options, with their unit names
    pub fn selectable_resources(
        &self,
        catalog: &ResourceCatalog,
        units: &[Unit],
    ) -> Vec<ResourceOption> {
        catalog
            .enabled()
            .map(|resource| ResourceOption {
                resource_id: resource.resource_id().to_string(),
                berth_id: resource.id,
                name: resource.resource.name.get(&self.language).to_string(),
                unit_name: resource
                    .unit_id()
                    .and_then(|id| units.iter().find(|u| u.id == id))
                    .map(|u| u.name.get(&self.language).to_string())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Wall clock time skipped by a spring change does not exist and is
    /// rejected; a repeated autumn hour resolves to its first occurrence.
    fn to_instant(
        &self,
        draft: &ReservationDraft,
        field: &str,
        feedback: &mut FieldFeedback,
    ) -> Result<DateTime<Utc>, ValidationFailure> {
        parse_display(draft.value(field))
            .and_then(|local| self.time_zone.from_local_datetime(&local).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                feedback.mark_invalid(field);
                ValidationFailure::UnparseableDate(field.to_string())
            })
    }

    /// Build the confirmed reservation from `base` and the form.
    ///
    /// A resource id that matches no enabled catalog entry leaves `berth`
    /// empty; the caller decides whether to save such a reservation.
    pub fn validate_and_transform(
        &self,
        base: &Reservation,
        draft: &ReservationDraft,
        catalog: &ResourceCatalog,
        feedback: &mut FieldFeedback,
    ) -> Result<Reservation, ValidationFailure> {
        if !self.check_required(draft, feedback) {
            let missing = draft
                .required_fields()
                .filter(|f| draft.value(f).is_empty())
                .map(str::to_string)
                .collect();
            return Err(ValidationFailure::Required(missing));
        }

        let begin = self.to_instant(draft, fields::BEGIN, feedback)?;
        let end = self.to_instant(draft, fields::END, feedback)?;

        let mut reservation = base.clone();
        reservation.begin = Some(begin);
        reservation.end = Some(end);
        reservation.state = ReservationState::Confirmed;
        reservation.reservable = false;
        reservation.user = Some(UserRef {
            id: draft.user_id().to_string(),
        });
        reservation.reserver_ssn = draft.value(fields::RESERVER_SSN).to_string();

        reservation.berth = catalog
            .find_by_resource_id(draft.resource_id())
            .filter(|resource| resource.is_enabled())
            .cloned();
        if reservation.berth.is_none() {
            tracing::warn!(
                "No enabled berth matches resource '{}', saving without berth",
                draft.resource_id()
            );
        }

        let details = &mut reservation.reservation;
        details.reserver_name = draft.value(fields::RESERVER_NAME).to_string();
        details.reserver_email_address = draft.value(fields::RESERVER_EMAIL_ADDRESS).to_string();
        details.reserver_phone_number = draft.value(fields::RESERVER_PHONE_NUMBER).to_string();
        details.reserver_address_street = draft.value(fields::RESERVER_ADDRESS_STREET).to_string();
        details.reserver_address_zip = draft.value(fields::RESERVER_ADDRESS_ZIP).to_string();
        details.reserver_address_city = draft.value(fields::RESERVER_ADDRESS_CITY).to_string();
        details.description =
            LocalizedText::new(self.language.clone(), draft.value(fields::DESCRIPTION));

        if !reservation.has_valid_period() {
            tracing::warn!("Saving reservation whose end does not follow its begin");
        }

        Ok(reservation)
    }

    /// Save through the collaborator and announce the new id.
    ///
    /// Backend errors are shown on the form as reported; nothing is retried.
    pub async fn commit(
        &self,
        reservation: &Reservation,
        persistence: &dyn ReservationPersistence,
        feedback: &mut FieldFeedback,
    ) -> Result<ReservationId, PersistenceError> {
        match persistence.save(reservation).await {
            Ok(saved) => {
                tracing::info!("Reservation {} saved", saved.id);
                self.bus.publish(AppEvent::ReservationChanged(saved.id));
                Ok(saved.id)
            }
            Err(e) => {
                tracing::warn!("Reservation save failed: {}", e);
                feedback.apply_field_errors(&e.field_errors());
                Err(e)
            }
        }
    }

    /// Run one full save attempt and return its terminal state.
    ///
    /// `reservation` is replaced by the transformed reservation once
    /// validation passes and gets its id once the backend accepts it. Nothing
    /// prevents a second attempt while one is still committing.
    pub async fn save(
        &self,
        reservation: &mut Reservation,
        draft: &ReservationDraft,
        catalog: &ResourceCatalog,
        persistence: &dyn ReservationPersistence,
        feedback: &mut FieldFeedback,
    ) -> AttemptState {
        let mut state = AttemptState::Idle;

        advance(&mut state, AttemptState::Validating);
        let transformed = match self.validate_and_transform(reservation, draft, catalog, feedback) {
            Ok(transformed) => transformed,
            Err(failure) => {
                advance(&mut state, AttemptState::Rejected(failure));
                return state;
            }
        };
        *reservation = transformed;
        advance(&mut state, AttemptState::Transformed);

        advance(&mut state, AttemptState::Committing);
        match self.commit(reservation, persistence, feedback).await {
            Ok(id) => {
                reservation.id = Some(id);
                advance(&mut state, AttemptState::Committed(id));
            }
            Err(e) => advance(&mut state, AttemptState::Failed(e.field_errors())),
        }
        state
    }
}

fn advance(state: &mut AttemptState, next: AttemptState) {
    tracing::debug!(from = state.label(), to = next.label(), "Save attempt transition");
    *state = next;
}
