// Messaging - lock-free channels between the game side and the sequencer,
// plus the commands and diagnostics that travel on them

pub mod channels;
pub mod command;
pub mod notification;
