//! Integration tests for the crawl engine
//!
//! These tests use wiremock to stand up mock HTTP servers and a
//! scripted renderer double to exercise full crawl sessions end-to-end.

mod crawl_tests;
mod support;
