//! Percolation filtering. Builds pore adjacency from interior throat
//! connections, labels connected components, and keeps the components that
//! touch both of two opposite sample faces. Boundary-sentinel throats carry
//! no second pore and never contribute adjacency edges.

use std::collections::VecDeque;
use std::str::FromStr;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PoreNetError;
use crate::network::PoreNetwork;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    XMin,
    XMax,
    YMin,
    YMax,
    ZMin,
    ZMax,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::XMin,
        Face::XMax,
        Face::YMin,
        Face::YMax,
        Face::ZMin,
        Face::ZMax,
    ];

    /// Name of the boolean pore property flagging contact with this face.
    pub fn flag_property(&self) -> &'static str {
        match self {
            Face::XMin => "xmin",
            Face::XMax => "xmax",
            Face::YMin => "ymin",
            Face::YMax => "ymax",
            Face::ZMin => "zmin",
            Face::ZMax => "zmax",
        }
    }

    pub fn opposite(&self) -> Face {
        match self {
            Face::XMin => Face::XMax,
            Face::XMax => Face::XMin,
            Face::YMin => Face::YMax,
            Face::YMax => Face::YMin,
            Face::ZMin => Face::ZMax,
            Face::ZMax => Face::ZMin,
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Face::XMin | Face::XMax => Axis::X,
            Face::YMin | Face::YMax => Axis::Y,
            Face::ZMin | Face::ZMax => Axis::Z,
        }
    }
}

impl FromStr for Face {
    type Err = PoreNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xmin" => Ok(Face::XMin),
            "xmax" => Ok(Face::XMax),
            "ymin" => Ok(Face::YMin),
            "ymax" => Ok(Face::YMax),
            "zmin" => Ok(Face::ZMin),
            "zmax" => Ok(Face::ZMax),
            other => Err(PoreNetError::invalid_face(format!(
                "{other} (expected one of xmin, xmax, ymin, ymax, zmin, zmax)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Coordinate slot of this axis in a `coords` triple.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn min_face(&self) -> Face {
        match self {
            Axis::X => Face::XMin,
            Axis::Y => Face::YMin,
            Axis::Z => Face::ZMin,
        }
    }

    pub fn max_face(&self) -> Face {
        match self {
            Axis::X => Face::XMax,
            Axis::Y => Face::YMax,
            Axis::Z => Face::ZMax,
        }
    }
}

impl FromStr for Axis {
    type Err = PoreNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(PoreNetError::invalid_axis(format!(
                "{other} (expected one of x, y, z)"
            ))),
        }
    }
}

/// Aligned keep masks over the pores and throats of one record. All-false
/// masks mean the network does not percolate; that is a signaled outcome,
/// not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct PercolationMasks {
    pub pores: Vec<bool>,
    pub throats: Vec<bool>,
}

impl PercolationMasks {
    pub fn percolates(&self) -> bool {
        self.pores.iter().any(|kept| *kept)
    }

    fn all_false(n_pores: usize, n_throats: usize) -> Self {
        PercolationMasks {
            pores: vec![false; n_pores],
            throats: vec![false; n_throats],
        }
    }
}

/// Computes the keep masks for the subnetwork connecting `inlet` to `outlet`.
/// A pore is kept when its component touches both faces; a throat is kept
/// when any of its non-negative endpoints is kept. A missing face-flag
/// column means no pore touches that face; an endpoint beyond the pore
/// range is an error.
pub fn percolation_masks(
    net: &PoreNetwork,
    inlet: Face,
    outlet: Face,
) -> Result<PercolationMasks, PoreNetError> {
    let n_pores = net.pore_count();
    let n_throats = net.throat_count();
    if n_pores == 0 {
        return Ok(PercolationMasks::all_false(n_pores, n_throats));
    }
    let conns = if n_throats > 0 {
        net.check_endpoint_range()?;
        Some(net.conns()?)
    } else {
        None
    };

    let mut adjacency = vec![Vec::new(); n_pores];
    if let Some(conns) = conns {
        for pair in conns.chunks_exact(2) {
            let (left, right) = (pair[0], pair[1]);
            if left >= 0 && right >= 0 {
                adjacency[left as usize].push(right as usize);
                adjacency[right as usize].push(left as usize);
            }
        }
    }

    let (labels, component_count) = component_labels(&adjacency);
    let inlet_labels = face_labels(net, inlet, &labels);
    let outlet_labels = face_labels(net, outlet, &labels);
    let spanning: AHashSet<usize> = inlet_labels.intersection(&outlet_labels).copied().collect();
    debug!(
        components = component_count,
        spanning = spanning.len(),
        "labeled percolation components"
    );
    if spanning.is_empty() {
        return Ok(PercolationMasks::all_false(n_pores, n_throats));
    }

    let pores: Vec<bool> = labels.iter().map(|label| spanning.contains(label)).collect();
    let throats: Vec<bool> = match conns {
        Some(conns) => conns
            .chunks_exact(2)
            .map(|pair| {
                pair.iter()
                    .any(|&endpoint| endpoint >= 0 && pores[endpoint as usize])
            })
            .collect(),
        None => Vec::new(),
    };
    Ok(PercolationMasks { pores, throats })
}

fn component_labels(adjacency: &[Vec<usize>]) -> (Vec<usize>, usize) {
    let mut labels = vec![usize::MAX; adjacency.len()];
    let mut next_label = 0;
    let mut queue = VecDeque::new();
    for start in 0..adjacency.len() {
        if labels[start] != usize::MAX {
            continue;
        }
        labels[start] = next_label;
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for &peer in &adjacency[node] {
                if labels[peer] == usize::MAX {
                    labels[peer] = next_label;
                    queue.push_back(peer);
                }
            }
        }
        next_label += 1;
    }
    (labels, next_label)
}

fn face_labels(net: &PoreNetwork, face: Face, labels: &[usize]) -> AHashSet<usize> {
    let mut found = AHashSet::new();
    if let Some(flags) = net.pores.maybe_scalar_bool(face.flag_property()) {
        for (pore, flag) in flags.iter().enumerate() {
            if *flag {
                found.insert(labels[pore]);
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_parsing() {
        assert_eq!("xmin".parse::<Face>().unwrap(), Face::XMin);
        assert_eq!("zmax".parse::<Face>().unwrap(), Face::ZMax);
        assert!(matches!(
            "front".parse::<Face>(),
            Err(PoreNetError::InvalidFace(_))
        ));
    }

    #[test]
    fn test_axis_faces() {
        let axis: Axis = "y".parse().unwrap();
        assert_eq!(axis.min_face(), Face::YMin);
        assert_eq!(axis.max_face(), Face::YMax);
        assert_eq!(Face::YMin.opposite(), Face::YMax);
        assert!(matches!(
            "w".parse::<Axis>(),
            Err(PoreNetError::InvalidAxis(_))
        ));
    }
}
