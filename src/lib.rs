//! Workspace-level integration test package. See `tests/` for the
//! golden-file suite; the library target is intentionally empty.
