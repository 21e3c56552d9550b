//! Flag source adapters
//!
//! - [`RemoteFlagSource`] fetches evaluated flags from the flag service over
//!   HTTP and can keep them fresh in the background
//! - [`LocalFlagSource`] never touches the network; it serves the declared
//!   defaults plus optional fixed overrides

mod local;
mod remote;

pub use local::LocalFlagSource;
pub use remote::RemoteFlagSource;
