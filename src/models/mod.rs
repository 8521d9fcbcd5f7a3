pub mod category;
pub mod month_view;
pub mod outcome;
pub mod payload;
pub mod record_id;
pub mod work_event;
