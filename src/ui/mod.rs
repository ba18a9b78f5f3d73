pub mod dependency;
pub mod dialogs;
pub mod gantt;
pub mod interaction;
pub mod lane;
pub mod task_visual;
pub mod theme;
pub mod toolbar;
