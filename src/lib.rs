//! # dxspaces-client
//!
//! Rust client for RESTful DataSpaces, a remote store of named, versioned,
//! namespace-scoped n-dimensional arrays.
//!
//! The client can:
//! - read any rectangular region of a stored array by inclusive bounds
//! - write an array into a region at a given offset
//! - run a server-side operation over one or more regions and fetch only
//!   its result
//! - list variables and their stored objects, and register named entities
//!
//! ## Architecture
//!
//! - **Protocol**: region boxes, execution metadata, response headers
//! - **Codec**: type tags, array payloads, MessagePack blobs
//! - **Transport**: one blocking HTTP request per call, injectable for tests
//!
//! Errors never trigger retries. A not-found answer to a read or register is
//! `Ok(None)`, not an error.
//!
//! ## Example
//!
//! ```ignore
//! use dxspaces_client::{Argument, Operation, SpaceClient};
//! use ndarray::array;
//!
//! fn main() -> dxspaces_client::Result<()> {
//!     let client = SpaceClient::new("http://localhost:8080")?;
//!
//!     client.write_region(&array![[1i32, 2, 3], [4, 5, 6]], "A", 1, &[0, 0], None)?;
//!
//!     if let Some(region) = client.read_region("A", 1, &[0, 0], &[1, 2], None)? {
//!         println!("{:?}", region.to_ndarray::<i32>()?);
//!     }
//!
//!     let total: i64 = client.execute(
//!         &[Argument::new("A", 1, [0, 0], [1, 2])],
//!         &Operation::new("sum"),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod protocol;
pub mod transport;

mod client;

pub use client::{SpaceClient, SpaceClientBuilder};
pub use codec::{EncodeArray, TypeTag, TypedArray};
pub use config::ClientConfig;
pub use error::{Result, SpaceError};
pub use protocol::{Argument, Operation, RegistryHandle};
