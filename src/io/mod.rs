pub mod csv_export;
pub mod file;

pub use file::{load_schedule, save_schedule};
