//! Domain types, services and ports.
//!
//! Nothing in here depends on actix, Diesel or reqwest. Inbound adapters call
//! the services; outbound adapters implement [`ports`].

pub mod accounts;
pub mod assistant;
pub mod auth;
pub mod error;
pub mod history;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::accounts::{AccountService, AssistantImageSource, AssistantUpdateRequest};
pub use self::auth::{AuthValidationError, LoginCredentials, PASSWORD_MIN, SignupDetails};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::history::{DEFAULT_HISTORY_LIMIT, HistoryService};
pub use self::trace_id::TraceId;
pub use self::user::{
    AssistantImage, AssistantName, AssistantProfileUpdate, DisplayName, EmailAddress, User,
    UserId, UserParts, UserValidationError,
};
