//! Dataset exploration: column classification, descriptive statistics and
//! chart projections over decoded tables.

pub mod charts;
pub mod controller;
pub mod logic;

pub use controller::{Exploration, Outcome, View, ViewResult, explore_frame};
pub use logic::ClassifiedFrame;
