//! The marker creation flow.
//!
//! A [`CreationFlow`] starts from the coordinates produced by location
//! acquisition and tracks the map center, the displayed address label and the
//! naming dialog's confirm step. Map events come in as [`FlowEvent`]s; the
//! flow answers with a [`FlowEffect`] for the caller to execute (issue a
//! reverse lookup, pan the map) and the result is fed back through
//! [`CreationFlow::apply_reverse_lookup`].
//!
//! Reverse lookups are tagged with a monotonic sequence number. Only the most
//! recently issued lookup may update the label; responses for any earlier
//! sequence are discarded, so an out-of-order arrival can never regress the
//! displayed address.

use thiserror::Error;

use crate::geo::{describe, GeoError, Geocoder};
use crate::models::{Coordinates, CreateMarkerInput, Marker};
use crate::store::MarkerStore;

/// Map and search events consumed by the flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    DragStarted,
    /// Drag gesture settled with the map centered on `center`.
    DragEnded { center: Coordinates },
    /// Zoom settled with the map centered on `center`.
    ZoomChanged { center: Coordinates },
    /// The user picked a search result; its label is authoritative and no
    /// reverse lookup is needed.
    SearchSelected {
        label: String,
        coordinates: Coordinates,
    },
}

/// What the caller must do after handing the flow an event.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEffect {
    None,
    /// Ask the place resolver to describe `coordinates` and feed the answer
    /// back with this sequence number.
    ReverseLookup { seq: u64, coordinates: Coordinates },
    /// Pan the map widget to the selected place.
    PanTo(Coordinates),
}

#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("Marker name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct CreationFlow {
    center: Coordinates,
    label: Option<String>,
    dragging: bool,
    resolving_label: bool,
    /// Next sequence number to hand out.
    next_seq: u64,
    /// Latest issued lookup still allowed to update the label. `None` means
    /// every in-flight lookup is stale.
    current_seq: Option<u64>,
}

impl CreationFlow {
    /// Start the flow with the map centered on the acquired location.
    pub fn new(initial_center: Coordinates) -> Self {
        Self {
            center: initial_center,
            label: None,
            dragging: false,
            resolving_label: false,
            next_seq: 0,
            current_seq: None,
        }
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    /// The address label currently displayed, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether a reverse lookup is outstanding for the current center.
    pub fn is_resolving_label(&self) -> bool {
        self.resolving_label
    }

    pub fn handle(&mut self, event: FlowEvent) -> FlowEffect {
        match event {
            FlowEvent::DragStarted => {
                self.dragging = true;
                FlowEffect::None
            }
            FlowEvent::DragEnded { center } => {
                self.dragging = false;
                self.issue_reverse_lookup(center)
            }
            FlowEvent::ZoomChanged { center } => self.issue_reverse_lookup(center),
            FlowEvent::SearchSelected {
                label,
                coordinates,
            } => {
                // The search result carries its own label; any in-flight
                // reverse lookup must not overwrite it.
                self.center = coordinates;
                self.label = Some(label);
                self.current_seq = None;
                self.resolving_label = false;
                FlowEffect::PanTo(coordinates)
            }
        }
    }

    fn issue_reverse_lookup(&mut self, center: Coordinates) -> FlowEffect {
        self.center = center;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.current_seq = Some(seq);
        self.resolving_label = true;
        FlowEffect::ReverseLookup {
            seq,
            coordinates: center,
        }
    }

    /// Feed back the outcome of a reverse lookup issued by [`handle`].
    ///
    /// Responses for anything but the latest issued sequence are discarded.
    /// A failed or empty lookup keeps the previous label on screen rather
    /// than flashing an empty state.
    ///
    /// [`handle`]: CreationFlow::handle
    pub fn apply_reverse_lookup(&mut self, seq: u64, result: Result<Option<String>, GeoError>) {
        if self.current_seq != Some(seq) {
            tracing::debug!(seq, "Discarding stale reverse-lookup response");
            return;
        }
        self.current_seq = None;
        self.resolving_label = false;

        match result {
            Ok(Some(label)) => self.label = Some(label),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!("Reverse lookup failed: {}", error);
            }
        }
    }

    /// Handle a settle event and drive the resulting reverse lookup to
    /// completion against a real resolver. Used by callers with no event
    /// loop of their own (the CLI); interactive callers issue and apply the
    /// lookup themselves so later events can supersede it.
    pub async fn settle<G: Geocoder>(&mut self, geocoder: &G, center: Coordinates) {
        if let FlowEffect::ReverseLookup { seq, coordinates } =
            self.handle(FlowEvent::DragEnded { center })
        {
            let result = describe(geocoder, coordinates).await;
            self.apply_reverse_lookup(seq, result);
        }
    }

    /// Confirm the naming dialog: validate the name and save a marker at the
    /// current center. The store itself is lenient; the non-empty-name rule
    /// lives here at the boundary.
    pub fn confirm(&self, name: &str, store: &MarkerStore) -> Result<Marker, ConfirmError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfirmError::EmptyName);
        }

        let marker = store.create(CreateMarkerInput {
            name: name.to_string(),
            latitude: self.center.latitude,
            longitude: self.center.longitude,
        })?;

        tracing::info!(%marker.id, "Marker created");
        Ok(marker)
    }
}
