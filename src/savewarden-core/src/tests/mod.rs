//! Test modules for savewarden-core.

mod reconcile_tests;
