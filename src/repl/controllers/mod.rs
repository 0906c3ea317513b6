//! # Controllers Module
//!
//! The controller wiring terminal events into the typewriter.

pub mod app_controller;

pub use app_controller::AppController;
