/// CRUD and cascade tests for the entity helpers.
/// These need a reachable Postgres; set SKIP_DB_TESTS to opt out.
pub mod crud_tests;
