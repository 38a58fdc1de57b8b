//! Cross-module test suites.
