// Auth actions: sign-up, sign-in, sign-out and current-user lookup.
// Identity verification is delegated to the IdentityGateway; this module only
// shapes user records and the session cookie.

pub mod handlers;
pub mod service;
