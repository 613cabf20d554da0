pub mod crash;
pub mod device;
pub mod stats;
pub mod upgrade_event;
pub mod usage;
