//! Lookahead buffering.
//!
//! - [`RingBuffer`] - Fixed-capacity circular char store
//! - [`Lookahead`] - Strategy interface the filter drives
//! - [`RingLookahead`] / [`NaiveLookahead`] - Shipped and reference strategies

mod lookahead;
mod ring;

pub use lookahead::{Lookahead, NaiveLookahead, Refill, RingLookahead};
pub use ring::RingBuffer;
