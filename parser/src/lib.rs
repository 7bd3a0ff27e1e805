//! This crate works on top of `dcmpix-encoding` to provide a stateful
//! element decoding abstraction: given a header decoder for the active
//! transfer syntax, it reads whole data element values out of a byte
//! source, dispatching on the value representation and keeping track of
//! the reading position.

pub mod stateful;

pub use crate::stateful::decode::{Error, Result, StatefulDecoder};
