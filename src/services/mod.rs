pub mod assist;
pub mod cards;
pub mod engine;
pub mod generation;
pub mod intent;
pub mod providers;
