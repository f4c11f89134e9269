//! Shared helpers for integration tests
#![allow(dead_code)]

mod repository;

pub use repository::FakeRepository;
