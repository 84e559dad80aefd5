//! Index compaction. Applies percolation masks to a record and renumbers the
//! surviving pores densely, rewriting throat endpoints through the remap.
//! Negative boundary sentinels pass through untouched.

use tracing::debug;

use crate::errors::PoreNetError;
use crate::network::{Column, PoreNetwork};
use crate::percolation::PercolationMasks;
use crate::schema::names;

/// Remap from old pore index to new dense index. Dropped positions hold 0;
/// they are never consulted because a throat referencing a dropped pore is
/// itself dropped.
pub fn pore_remap(pore_mask: &[bool]) -> Vec<i64> {
    pore_mask
        .iter()
        .fold((Vec::with_capacity(pore_mask.len()), 0_i64), |(mut remap, next), kept| {
            if *kept {
                remap.push(next);
                (remap, next + 1)
            } else {
                remap.push(0);
                (remap, next)
            }
        })
        .0
}

/// Produces the compacted record for the given masks. Every column is
/// row-filtered, surviving throat endpoints are rewritten to the new dense
/// pore indices, and metadata is carried over. An endpoint beyond the pore
/// range is an error.
pub fn compact_network(
    net: &PoreNetwork,
    masks: &PercolationMasks,
) -> Result<PoreNetwork, PoreNetError> {
    if masks.pores.len() != net.pore_count() || masks.throats.len() != net.throat_count() {
        return Err(PoreNetError::invalid_input(format!(
            "mask sizes {}/{} do not match network {}/{}",
            masks.pores.len(),
            masks.throats.len(),
            net.pore_count(),
            net.throat_count()
        )));
    }
    net.check_endpoint_range()?;

    let remap = pore_remap(&masks.pores);
    let mut out = PoreNetwork {
        pores: net.pores.filtered(&masks.pores)?,
        throats: net.throats.filtered(&masks.throats)?,
        meta: net.meta.clone(),
    };

    if out.throat_count() > 0 {
        let rewritten: Vec<i64> = out
            .conns()?
            .iter()
            .map(|&endpoint| {
                if endpoint >= 0 {
                    remap[endpoint as usize]
                } else {
                    endpoint
                }
            })
            .collect();
        out.throats.insert(names::CONNS, Column::vector_i64(2, rewritten))?;
    }

    debug!(
        pores = out.pore_count(),
        throats = out.throat_count(),
        "compacted network"
    );
    Ok(out)
}
