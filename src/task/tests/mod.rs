//! Unit test suites for the task module.
