//! Router Module Index
//!
//! Organizes routing into modules by access rule, so the gating layer is applied once per
//! module in `create_router` instead of per handler.

/// Routes accessible to anyone: health, auth flow pages, sign-out.
pub mod public;

/// JSON API routes protected by the `AuthUser` extractor middleware (401 without a session).
pub mod authenticated;

/// HTML dashboard pages. Requests without a session are redirected to sign in.
pub mod dashboard;
