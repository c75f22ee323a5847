mod debounce;
mod scan;

pub use debounce::{AlertDebouncer, AlertEvent, Direction, Threshold};
pub use scan::{alerting_components, check_alerts};
