//! Terminal UI layer for Spend Insights.
//!
//! Provides themes, the header component, the spending, household and
//! assistant views, the plain-text report and the dashboard event loop built
//! on top of [`ratatui`].

pub mod app;
pub mod assistant_view;
pub mod components;
pub mod household_view;
pub mod report;
pub mod spending_view;
pub mod themes;

pub use insights_core as core;
