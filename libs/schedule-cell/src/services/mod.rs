pub mod advisor;
pub mod fitting;
pub mod schedule;
pub mod week;

pub use advisor::advise;
pub use fitting::{fit_slots, minutes_between, SlotFit};
pub use schedule::ScheduleService;
pub use week::WeekSchedule;
