// Copyright 2025 Cowboy AI, LLC.

//! Error types for simulation domain operations

use thiserror::Error;

/// Errors that can occur while validating commands, folding events, or
/// talking to the event log.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Agent lacks the cash plus available credit to cover a cost
    #[error("Insufficient funds: need {required:.2}, available {available:.2}")]
    InsufficientFunds {
        /// Amount the command requires
        required: f64,
        /// Cash plus remaining line-of-credit capacity
        available: f64,
    },

    /// A command parameter is out of range or references a missing entity
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Credit rating is below the floor for the requested loan product
    #[error("Credit error: {0}")]
    CreditError(String),

    /// Location not found
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Machine not found
    #[error("Machine not found: {machine_id} at {location_id}")]
    MachineNotFound {
        /// Location that was searched
        location_id: String,
        /// Machine id that was requested
        machine_id: String,
    },

    /// Vendor not found
    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    /// Staff member not found
    #[error("Staff member not found: {0}")]
    StaffNotFound(String),

    /// An exclusive-contract invariant forbids the requested action
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Generic validation failure
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No handler is registered for the command kind
    #[error("Unknown command kind: {0}")]
    UnknownCommand(String),

    /// No reducer is registered for the event kind; fatal during fold
    #[error("Unknown event kind: {0}")]
    UnknownEvent(String),

    /// The operation deadline passed before any event was appended
    #[error("Deadline exceeded before {operation} started")]
    DeadlineExceeded {
        /// Operation that was abandoned
        operation: String,
    },

    /// Event log failure; the current operation must not report success
    #[error("Storage error: {0}")]
    Storage(String),

    /// A reducer or handler bug; fatal at process level
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Failed to serialize or deserialize a record
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl DomainError {
    /// Check if this is a handler-level validation error (command rejected,
    /// no events written) as opposed to a fatal engine error.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            DomainError::Storage(_)
                | DomainError::InvariantViolation(_)
                | DomainError::UnknownEvent(_)
        )
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::LocationNotFound(_)
                | DomainError::MachineNotFound { .. }
                | DomainError::VendorNotFound(_)
                | DomainError::StaffNotFound(_)
        )
    }

    /// Terse machine-readable kind for the caller's result tuple
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            DomainError::InvalidState(_) => "INVALID_STATE",
            DomainError::CreditError(_) => "CREDIT_ERROR",
            DomainError::LocationNotFound(_) => "LOCATION_NOT_FOUND",
            DomainError::MachineNotFound { .. } => "MACHINE_NOT_FOUND",
            DomainError::VendorNotFound(_) => "VENDOR_NOT_FOUND",
            DomainError::StaffNotFound(_) => "STAFF_NOT_FOUND",
            DomainError::ContractViolation(_) => "CONTRACT_VIOLATION",
            DomainError::ValidationError(_) => "VALIDATION_ERROR",
            DomainError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            DomainError::UnknownEvent(_) => "UNKNOWN_EVENT",
            DomainError::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
            DomainError::Storage(_) => "STORAGE_ERROR",
            DomainError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            DomainError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }
}
