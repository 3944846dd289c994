// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod ids;
pub mod record;
pub mod schema;
pub mod state;
pub mod value;

pub use ids::*;
pub use record::*;
pub use schema::*;
pub use state::*;
pub use value::*;
