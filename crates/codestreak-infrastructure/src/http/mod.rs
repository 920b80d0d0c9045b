mod leetcode;

pub use leetcode::{LeetCodeClient, RetryConfig};
