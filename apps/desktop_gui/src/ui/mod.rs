//! egui presentation: the question card and the floating logo.

pub mod app;
pub mod logo;

pub use app::AskApp;
