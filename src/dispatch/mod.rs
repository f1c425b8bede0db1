//! Dispatch facade.
//!
//! Ties the matcher, codec, and compression pipeline together behind one
//! call: given a request descriptor, [`Dispatcher::dispatch`] returns the
//! matched route, decoded body, and a response encoder already configured
//! with the negotiated content encoding.
//!
//! The facade also owns the accelerated/fallback engine decision. Whether
//! the fast implementations are active is a capability fixed once at
//! construction and exposed through [`Dispatcher::accelerated`]; the two
//! engines are behaviorally indistinguishable to callers, differing only in
//! latency.

mod core;

pub use core::{
    DispatchError, DispatchResult, Dispatcher, EncodedResponse, ResponseEncoder,
};
