//! # chat-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
