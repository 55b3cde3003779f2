pub mod constants;
pub mod elements;
pub mod env_state;
pub mod illumination;
pub mod observation;
pub mod observers;
pub mod propagation;
pub mod ref_system;
pub mod report;
pub mod time;
pub mod tracker;
pub mod tracker_errors;
