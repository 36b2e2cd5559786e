//! Put/Get - write a block to a running space server, read part of it back,
//! and run a server-side reduction over it.
//!
//! This example demonstrates:
//! - Building a client from `DXSPACES_*` environment variables
//! - Writing an `ndarray` into a region
//! - Reading a sub-region and viewing it as an `ndarray`
//! - Executing a named operation next to the data
//!
//! # Running
//!
//! ```text
//! DXSPACES_URL=http://localhost:8080 DXSPACES_DEBUG=1 cargo run --example put_get
//! ```

use dxspaces_client::{Argument, ClientConfig, Operation, SpaceClientBuilder};
use ndarray::Array2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let client = SpaceClientBuilder::from_config(ClientConfig::from_env()?).build()?;

    let block = Array2::<f64>::from_shape_fn((4, 6), |(i, j)| (i * 6 + j) as f64);
    client.write_region(&block, "demo", 1, &[0, 0], None)?;

    match client.read_region("demo", 1, &[1, 2], &[2, 4], None)? {
        Some(region) => println!("region {:?}:\n{}", region.dims(), region.to_ndarray::<f64>()?),
        None => println!("region not found"),
    }

    let total: f64 = client.execute(
        &[Argument::new("demo", 1, [0, 0], [3, 5])],
        &Operation::new("sum"),
    )?;
    println!("sum = {total}");

    println!("variables: {:?}", client.list_variables()?);
    Ok(())
}
