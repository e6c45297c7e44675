pub mod acquisition;
pub mod button;
pub mod command;
pub mod hold_timer;
pub mod link;
