//! Provider client implementations

pub mod resend;
