#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard;
pub mod error;
pub mod progress_service;
pub mod sessions;

pub use uky_core::Clock;

pub use app_services::AppServices;
pub use dashboard::DashboardSummary;
pub use error::{AppServicesError, ProgressServiceError, ReviewSessionError};
pub use progress_service::ProgressService;
pub use sessions::{ReviewAnswer, ReviewSession, SessionProgress};
