pub mod axis;
pub mod category;
pub mod task;

pub use axis::{TimeAxis, ViewWindow, ZoomLevel};
pub use category::{BudgetCategory, LaneKey, SchedulePayload};
pub use task::{ScheduleTask, TaskStatus};
