//! HTTP-level integration tests driving the full router.

mod helpers;

mod auth_test;
mod csrf_test;
mod entity_test;
mod users_test;
