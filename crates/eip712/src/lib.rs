//! Declarative EIP-712 signing templates with symbolic references.
//!
//! Smart accounts that authorize session keys through an installed validator
//! module sign a typed-data payload instead of the bare user-operation hash.
//! The payload's shape is account-specific, so it ships as a template: a
//! typed-data skeleton whose string leaves may be `$`-prefixed references
//! (`$userOp.sender`, `$validUntil`, `$chainId`, ...). Resolution replaces
//! every reference with a concrete value from the current operation and
//! signing context; an unknown reference is a configuration bug and fails the
//! whole request.

pub mod error;
pub use error::ReferenceResolutionError;

pub mod reference;
pub use reference::TemplateReference;

pub mod resolver;
pub use resolver::{ResolveContext, resolve_template};

pub mod template;
pub use template::{SigningTemplate, ValidityWindow};
