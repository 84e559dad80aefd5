//! One-call orchestration of the conversion stages: percolation filter,
//! index compaction, and Statoil export. `Ok(None)` signals a network that
//! does not percolate; callers skip it rather than treat it as a failure.

use tracing::info;

use crate::compact::compact_network;
use crate::errors::PoreNetError;
use crate::network::PoreNetwork;
use crate::percolation::{Face, percolation_masks};
use crate::statoil::{StatoilConfig, StatoilTables, export_network};

/// Filters `net` to the subnetwork spanning `inlet` to `outlet` and compacts
/// its indices. Returns `Ok(None)` when nothing spans the two faces.
pub fn percolating_subnetwork(
    net: &PoreNetwork,
    inlet: Face,
    outlet: Face,
) -> Result<Option<PoreNetwork>, PoreNetError> {
    let masks = percolation_masks(net, inlet, outlet)?;
    if !masks.percolates() {
        info!(inlet = ?inlet, outlet = ?outlet, "network does not percolate");
        return Ok(None);
    }
    let compacted = compact_network(net, &masks)?;
    info!(
        kept_pores = compacted.pore_count(),
        kept_throats = compacted.throat_count(),
        "extracted percolating subnetwork"
    );
    Ok(Some(compacted))
}

/// Full pipeline against the configured flow axis: filter, compact, render
/// the six Statoil tables.
pub fn percolate_and_export(
    net: &PoreNetwork,
    cfg: &StatoilConfig,
) -> Result<Option<StatoilTables>, PoreNetError> {
    match percolating_subnetwork(net, cfg.axis.min_face(), cfg.axis.max_face())? {
        Some(subnet) => Ok(Some(export_network(&subnet, cfg)?)),
        None => Ok(None),
    }
}
