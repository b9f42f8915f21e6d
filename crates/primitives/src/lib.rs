//! Core types shared across the opguard signing core: operations (legacy
//! transactions and ERC-4337 user operations), decoded low-level calls, and
//! simulation asset-change snapshots.

pub mod entry_points;

pub mod call;
pub use call::{DecodedCall, LowLevelCall};

pub mod operation;
pub use operation::{Operation, Transaction, UserOperation};

pub mod simulation;
pub use simulation::{AssetChange, AssetType, ChangeType, SimulationFailure, SimulationResult};
