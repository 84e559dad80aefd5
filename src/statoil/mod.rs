//! Statoil six-table export. Renders a compacted record into the
//! `link1/link2/link3/node1/node2/node3` ASCII tables consumed by classic
//! two-phase network flow solvers: 1-based element ids, boundary sentinels
//! shifted to the solver's inlet/outlet ids, lengths scaled by the
//! configured unit factor, and the flow axis swapped into the first
//! coordinate.

mod geometry;

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::PoreNetError;
use crate::network::PoreNetwork;
use crate::percolation::Axis;
use crate::schema::{INLET, OUTLET};

use geometry::{GeometryResolver, ThroatGeometry};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StatoilConfig {
    /// Length unit of the record relative to meters. Coordinates, radii,
    /// and lengths multiply by this; volumes by its cube.
    pub scale_factor: f64,
    /// Flow axis; its min face is the inlet, its max face the outlet.
    pub axis: Axis,
    /// Shape factor assigned to sub-resolution elements.
    pub subres_shape_factor: f64,
    /// Multiplier on sub-resolution porosity before the clay fraction is
    /// derived from it.
    pub subres_porosity_modifier: f64,
}

impl Default for StatoilConfig {
    fn default() -> Self {
        StatoilConfig {
            scale_factor: 1e-3,
            axis: Axis::X,
            subres_shape_factor: 0.071,
            subres_porosity_modifier: 1.0,
        }
    }
}

/// The six rendered tables, each a complete newline-terminated file body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatoilTables {
    pub link1: String,
    pub link2: String,
    pub link3: String,
    pub node1: String,
    pub node2: String,
    pub node3: String,
}

impl StatoilTables {
    /// Writes `<prefix>_link1.dat` through `<prefix>_node3.dat` under `dir`,
    /// creating the directory if needed.
    pub fn write_to_dir(&self, dir: &Path, prefix: &str) -> Result<(), PoreNetError> {
        fs::create_dir_all(dir)?;
        let files = [
            ("link1", &self.link1),
            ("link2", &self.link2),
            ("link3", &self.link3),
            ("node1", &self.node1),
            ("node2", &self.node2),
            ("node3", &self.node3),
        ];
        for (suffix, body) in files {
            fs::write(dir.join(format!("{prefix}_{suffix}.dat")), body)?;
        }
        Ok(())
    }
}

/// Renders the record into the six Statoil tables. The record must already
/// be percolation-filtered and compacted; an empty pore or throat set is a
/// [`PoreNetError::NonPercolating`]. Kept pores flagged on the flow axis's
/// boundary faces but lacking a throat to the matching sentinel gain one
/// synthetic boundary throat each.
pub fn export_network(
    net: &PoreNetwork,
    cfg: &StatoilConfig,
) -> Result<StatoilTables, PoreNetError> {
    if net.pore_count() == 0 || net.throat_count() == 0 {
        return Err(PoreNetError::non_percolating(format!(
            "cannot export network with {} pores and {} throats",
            net.pore_count(),
            net.throat_count()
        )));
    }
    net.validate()?;
    let resolver = GeometryResolver::new(net, cfg)?;
    let conns = resolver.conns;

    for (throat, pair) in conns.chunks_exact(2).enumerate() {
        for &endpoint in pair {
            if endpoint < 0 && endpoint != INLET && endpoint != OUTLET {
                return Err(PoreNetError::invalid_input(format!(
                    "throat {throat} endpoint {endpoint}: not a pore index or boundary sentinel"
                )));
            }
        }
    }

    let mut throats: Vec<ThroatGeometry> =
        (0..net.throat_count()).map(|t| resolver.throat(t)).collect();

    let mut sentinel_links: AHashSet<(usize, i64)> = AHashSet::new();
    for pair in conns.chunks_exact(2) {
        if pair[0] >= 0 && pair[1] < 0 {
            sentinel_links.insert((pair[0] as usize, pair[1]));
        }
        if pair[1] >= 0 && pair[0] < 0 {
            sentinel_links.insert((pair[1] as usize, pair[0]));
        }
    }

    let real_count = throats.len();
    for (face, sentinel) in [(cfg.axis.min_face(), INLET), (cfg.axis.max_face(), OUTLET)] {
        if let Some(flags) = net.pores.maybe_scalar_bool(face.flag_property()) {
            for (pore, flag) in flags.iter().enumerate() {
                if *flag && !sentinel_links.contains(&(pore, sentinel)) {
                    throats.push(resolver.boundary_throat(pore, sentinel));
                }
            }
        }
    }
    info!(
        pores = net.pore_count(),
        throats = real_count,
        synthetic = throats.len() - real_count,
        "assembled statoil export"
    );

    let n_pores = net.pore_count();
    let mut neighbors: Vec<Vec<(i64, usize)>> = vec![Vec::new(); n_pores];
    let mut at_inlet = vec![false; n_pores];
    let mut at_outlet = vec![false; n_pores];
    for (index, throat) in throats.iter().enumerate() {
        let id = index + 1;
        for (this, other) in [(throat.left, throat.right), (throat.right, throat.left)] {
            if this >= 0 {
                neighbors[this as usize].push((other, id));
                if other == INLET {
                    at_inlet[this as usize] = true;
                }
                if other == OUTLET {
                    at_outlet[this as usize] = true;
                }
            }
        }
    }

    let scale = cfg.scale_factor;
    let cubic = scale.powi(3);
    let domain = reorder(
        cfg.axis,
        net.meta
            .domain_size
            .unwrap_or_else(|| bounding_extent(resolver.coords)),
    );

    let mut link1 = Vec::with_capacity(throats.len() + 1);
    let mut link2 = Vec::with_capacity(throats.len());
    let mut link3 = Vec::with_capacity(throats.len());
    link1.push(throats.len().to_string());
    for (index, t) in throats.iter().enumerate() {
        let id = index + 1;
        let left = statoil_id(t.left);
        let right = statoil_id(t.right);
        link1.push(format!(
            "{id} {left} {right} {} {} {}",
            sci(t.radius * scale),
            sci(t.shape_factor),
            sci(t.total_length * scale)
        ));
        link2.push(format!(
            "{id} {left} {right} {} {} {} {} {}",
            sci(t.left_stub * scale),
            sci(t.right_stub * scale),
            sci(t.mid_length * scale),
            sci(t.volume * cubic),
            sci(t.clay_fraction)
        ));
        link3.push(format!("{id} {left} {right} {}", t.capillary_count));
    }

    let mut node1 = Vec::with_capacity(n_pores + 1);
    let mut node2 = Vec::with_capacity(n_pores);
    let mut node3 = Vec::with_capacity(n_pores);
    node1.push(format!(
        "{n_pores} {} {} {}",
        sci(domain[0] * scale),
        sci(domain[1] * scale),
        sci(domain[2] * scale)
    ));
    for pore in 0..n_pores {
        let id = pore + 1;
        let pos = reorder(
            cfg.axis,
            [
                resolver.coords[pore * 3],
                resolver.coords[pore * 3 + 1],
                resolver.coords[pore * 3 + 2],
            ],
        );
        let list = &neighbors[pore];
        let mut row = format!(
            "{id} {} {} {} {}",
            sci(pos[0] * scale),
            sci(pos[1] * scale),
            sci(pos[2] * scale),
            list.len()
        );
        for (other, _) in list {
            row.push(' ');
            row.push_str(&statoil_id(*other).to_string());
        }
        row.push(' ');
        row.push_str(if at_inlet[pore] { "1" } else { "0" });
        row.push(' ');
        row.push_str(if at_outlet[pore] { "1" } else { "0" });
        for (_, throat_id) in list {
            row.push(' ');
            row.push_str(&throat_id.to_string());
        }
        node1.push(row);

        let g = resolver.pore(pore);
        node2.push(format!(
            "{id} {} {} {} {}",
            sci(g.volume * cubic),
            sci(g.radius * scale),
            sci(g.shape_factor),
            sci(g.clay_fraction)
        ));
        node3.push(format!("{id} {}", g.capillary_count));
    }

    Ok(StatoilTables {
        link1: finish(link1),
        link2: finish(link2),
        link3: finish(link3),
        node1: finish(node1),
        node2: finish(node2),
        node3: finish(node3),
    })
}

/// Uniform 1-based shift: pore `i` becomes `i + 1`, the inlet sentinel
/// becomes 0 and the outlet sentinel -1, the solver's reservoir ids.
fn statoil_id(endpoint: i64) -> i64 {
    endpoint + 1
}

fn sci(value: f64) -> String {
    format!("{value:.6e}")
}

fn finish(lines: Vec<String>) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

fn reorder(axis: Axis, v: [f64; 3]) -> [f64; 3] {
    match axis {
        Axis::X => v,
        Axis::Y => [v[1], v[0], v[2]],
        Axis::Z => [v[2], v[1], v[0]],
    }
}

fn bounding_extent(coords: &[f64]) -> [f64; 3] {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for point in coords.chunks_exact(3) {
        for axis in 0..3 {
            min[axis] = min[axis].min(point[axis]);
            max[axis] = max[axis].max(point[axis]);
        }
    }
    [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statoil_id_shift() {
        assert_eq!(statoil_id(0), 1);
        assert_eq!(statoil_id(41), 42);
        assert_eq!(statoil_id(INLET), 0);
        assert_eq!(statoil_id(OUTLET), -1);
    }

    #[test]
    fn test_scientific_rendering() {
        assert_eq!(sci(0.0005), "5.000000e-4");
        assert_eq!(sci(1.0), "1.000000e0");
    }

    #[test]
    fn test_finish_joins_rows_and_terminates() {
        let body = finish(vec!["3".to_string(), "1 2".to_string()]);
        assert_eq!(body, "3\n1 2\n");
    }

    #[test]
    fn test_axis_reorder_swaps_with_first() {
        assert_eq!(reorder(Axis::X, [1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
        assert_eq!(reorder(Axis::Y, [1.0, 2.0, 3.0]), [2.0, 1.0, 3.0]);
        assert_eq!(reorder(Axis::Z, [1.0, 2.0, 3.0]), [3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_bounding_extent() {
        let coords = [0.0, 0.0, 0.0, 4.0, 1.0, 2.0, 2.0, 5.0, 1.0];
        assert_eq!(bounding_extent(&coords), [4.0, 5.0, 2.0]);
    }
}
