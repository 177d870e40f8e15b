//! Account-side inputs: client identifiers, scope strings, credentials, and signed assertions.

pub mod assertion;
pub mod credentials;
pub mod id;
pub mod scope;
pub mod secret;

pub use assertion::*;
pub use credentials::*;
pub use id::*;
pub use scope::*;
pub use secret::*;
