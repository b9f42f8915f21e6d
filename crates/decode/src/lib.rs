//! Decoding of smart-account call data into canonical low-level calls.
//!
//! Each supported account standard exposes a fixed, ordered list of decoding
//! shapes (batched multi-call before single inline call). A dispatcher picks
//! the first shape that decodes without structural error, and refuses to
//! guess: zero matches and multi-standard matches are both hard errors, as is
//! any execution mode flagged as delegate-call or unknown.

pub mod error;
pub use error::DecodeError;

pub mod standards;
pub use standards::{AccountStandard, decode_calls};

pub mod functions;
pub use functions::decode_known_function;
