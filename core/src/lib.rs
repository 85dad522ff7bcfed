// Client core for Mini Tweeter:
// - Session store persisting the authenticated user's tokens and profile
// - API gateway attaching the bearer token to every outbound call
// - Error normalization into a uniform result shape
// - Auth service for register / login / logout / profile update
// - Configuration loading and shared error types

// Export session module - Session store and storage backends
pub mod session;
pub use session::*;

// Export gateway module - Outbound HTTP client
pub mod gateway;
pub use gateway::{ApiGateway, ApiResponse};

// Export result module - Normalized call results
pub mod result;
pub use result::*;

// Export auth module - Authentication and profile calls
pub mod auth;
pub use auth::{AuthService, LoginRequest, ProfileUpdate, RegisterRequest};

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

/// Re-exported so callers can cancel in-flight calls without depending on tokio-util directly
pub use tokio_util::sync::CancellationToken;
