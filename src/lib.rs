//! Pore-network conversion, percolation filtering, and Statoil export.
//! Records convert from flat host tables, filter down to the subnetwork
//! spanning two opposite sample faces, and render into the six-table ASCII
//! format consumed by classic two-phase network flow solvers.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod compact;
pub mod dump;
pub mod errors;
pub mod network;
pub mod percolation;
pub mod pipeline;
pub mod schema;
pub mod statoil;
pub mod synthetic;
pub mod table;
pub mod voxel;

pub use crate::compact::{compact_network, pore_remap};
pub use crate::dump::{
    dump_network_to_path, dump_network_to_writer, load_network_from_path, load_network_from_reader,
};
pub use crate::errors::PoreNetError;
pub use crate::network::{Column, ElementTable, NetworkMeta, PoreNetwork, Values};
pub use crate::percolation::{Axis, Face, PercolationMasks, percolation_masks};
pub use crate::pipeline::{percolate_and_export, percolating_subnetwork};
pub use crate::statoil::{StatoilConfig, StatoilTables, export_network};
pub use crate::synthetic::{NetworkShape, add_darcy_band, generate_network};
pub use crate::table::{Table, TableSet, network_from_tables, tables_from_network};
pub use crate::voxel::LabeledVolume;
