use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("lead not found: {0}")]
    NotFound(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<CatalogError> for ApplicationError {
    fn from(value: CatalogError) -> Self {
        Self::Configuration(value.to_string())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested lead does not exist.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    /// Text safe to return to a client. Only bad-request and not-found details
    /// are surfaced; everything else uses the generic user message.
    pub fn client_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::NotFound { message, .. } => message,
            Self::ServiceUnavailable { .. } | Self::Internal { .. } => self.user_message(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            // Invalid arguments carry caller-safe text; it goes back to the client as-is.
            ApplicationError::Domain(DomainError::InvalidArgument(message)) => {
                Self::BadRequest { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Domain(DomainError::InvariantViolation(message))
            | ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::NotFound(message) => {
                Self::NotFound { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::CatalogError;
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn invalid_argument_maps_to_bad_request_with_message() {
        let interface = ApplicationError::from(DomainError::InvalidArgument(
            "carpet area and budget are required".to_owned(),
        ))
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest { ref message, ref correlation_id }
                if correlation_id == "req-1" && message == "carpet area and budget are required"
        ));
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn invariant_violation_is_internal() {
        let interface =
            ApplicationError::from(DomainError::InvariantViolation("negative total".to_owned()))
                .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn persistence_error_maps_to_service_unavailable() {
        let interface = ApplicationError::Persistence("database lock timeout".to_owned())
            .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
        assert!(!interface.client_message().contains("lock timeout"));
    }

    #[test]
    fn bad_request_detail_reaches_client() {
        let interface =
            ApplicationError::from(DomainError::InvalidArgument("name is required".to_owned()))
                .into_interface("req-6");

        assert_eq!(interface.client_message(), "name is required");
    }

    #[test]
    fn missing_lead_maps_to_not_found() {
        let interface = ApplicationError::NotFound("lead-1".to_owned()).into_interface("req-4");

        assert!(matches!(interface, InterfaceError::NotFound { .. }));
        assert_eq!(interface.user_message(), "The requested lead does not exist.");
    }

    #[test]
    fn catalog_error_becomes_configuration_failure() {
        let error = ApplicationError::from(CatalogError::UnknownMaterialKey {
            room: "Kitchen".to_owned(),
            item: "Loft".to_owned(),
            key: "teak".to_owned(),
        });

        assert!(matches!(error, ApplicationError::Configuration(ref message) if message.contains("teak")));
        assert!(matches!(error.into_interface("req-5"), InterfaceError::Internal { .. }));
    }
}
