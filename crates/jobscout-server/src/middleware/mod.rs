pub mod client_ip;
pub mod rate_limit;

pub use client_ip::{UNKNOWN_CLIENT, client_id};
pub use rate_limit::{RateLimitedBody, rate_limit};
