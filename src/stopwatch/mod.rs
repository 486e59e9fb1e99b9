pub mod controller;
pub mod state;
pub mod viewmodel;

pub use controller::StopwatchController;
pub use state::{Lap, StopwatchSnapshot, StopwatchState, StopwatchStatus};
pub use viewmodel::ViewMode;
