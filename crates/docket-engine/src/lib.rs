// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod filter;
pub mod group;
pub mod position;
pub mod reconcile;
pub mod report;
pub mod resolver;
pub mod snapshot;

pub use filter::*;
pub use group::*;
pub use position::*;
pub use reconcile::*;
pub use report::*;
pub use resolver::*;
pub use snapshot::*;
