//! Test doubles for the register transport.

pub(crate) mod mock;

pub(crate) use mock::{MockDelay, MockInterface};
