//! Typed outcomes that drive escalation between pipeline steps.

use lotscan_core::Vehicle;

/// Result of one pipeline step (catalog fetch, a tier run).
///
/// `NotFound` means the step ran cleanly but had nothing to offer;
/// `TransientError` means it could not run to completion. Both escalate to
/// the next step, but they are logged differently.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    Found(T),
    NotFound,
    TransientError(String),
}

impl<T> StepOutcome<T> {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, StepOutcome::Found(_))
    }

    /// Converts to an `Option`, discarding the failure detail.
    pub fn found(self) -> Option<T> {
        match self {
            StepOutcome::Found(value) => Some(value),
            StepOutcome::NotFound | StepOutcome::TransientError(_) => None,
        }
    }
}

/// Why a single candidate (product, linked-data entry, DOM element, vision
/// entry) did not become a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The source item could not be decoded into the adapter's input shape.
    Malformed(String),
    /// The item decoded, but carried none of the tier's identifying fields.
    NoIdentifyingSignal,
    /// The element or block could not be read from the page.
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Malformed(detail) => write!(f, "malformed item: {detail}"),
            SkipReason::NoIdentifyingSignal => write!(f, "no identifying field present"),
            SkipReason::Unreadable(detail) => write!(f, "unreadable item: {detail}"),
        }
    }
}

/// Result of turning one candidate into a vehicle.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Parsed(Vehicle),
    Skipped(SkipReason),
}

/// Vehicles retained by a tier plus the reasons the rest were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierOutput {
    pub vehicles: Vec<Vehicle>,
    pub skipped: Vec<SkipReason>,
}

impl TierOutput {
    /// Partitions item outcomes, preserving the order of parsed vehicles.
    pub fn from_items(items: impl IntoIterator<Item = ItemOutcome>) -> Self {
        let mut output = Self::default();
        output.extend(items);
        output
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ItemOutcome>) {
        for item in items {
            match item {
                ItemOutcome::Parsed(vehicle) => self.vehicles.push(vehicle),
                ItemOutcome::Skipped(reason) => self.skipped.push(reason),
            }
        }
    }

    /// `Found` when at least one vehicle was retained, `NotFound` otherwise.
    #[must_use]
    pub fn into_outcome(self) -> StepOutcome<TierOutput> {
        if self.vehicles.is_empty() {
            StepOutcome::NotFound
        } else {
            StepOutcome::Found(self)
        }
    }
}
