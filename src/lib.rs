pub mod batch;
pub mod config;
pub mod document;
pub mod i18n;
pub mod pipeline;
pub mod providers;
pub mod retry;
pub mod translation;
