#![allow(dead_code)]

pub use taskdag_test_utils::{builders, fixtures, init_tracing, with_timeout};
