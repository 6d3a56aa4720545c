//! Background tasks spawned at server startup.

pub mod retention;
