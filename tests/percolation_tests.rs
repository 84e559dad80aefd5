use porenet::network::{Column, PoreNetwork};
use porenet::percolation::{Face, percolation_masks};
use porenet::synthetic::{NetworkShape, generate_network};
use porenet::PoreNetError;

fn flagged_network(n_pores: usize, conns: &[(i64, i64)]) -> PoreNetwork {
    let mut net = PoreNetwork::new(n_pores, conns.len());
    let xmin: Vec<bool> = (0..n_pores).map(|p| p == 0).collect();
    let xmax: Vec<bool> = (0..n_pores).map(|p| p + 1 == n_pores).collect();
    net.pores.insert("xmin", Column::scalar_bool(xmin)).unwrap();
    net.pores.insert("xmax", Column::scalar_bool(xmax)).unwrap();
    let flat: Vec<i64> = conns.iter().flat_map(|&(a, b)| [a, b]).collect();
    net.throats
        .insert("conns", Column::vector_i64(2, flat))
        .unwrap();
    net
}

#[test]
fn test_spanning_chain_keeps_everything() {
    let net = flagged_network(3, &[(0, 1), (1, 2)]);
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert!(masks.percolates());
    assert_eq!(masks.pores, vec![true, true, true]);
    assert_eq!(masks.throats, vec![true, true]);
}

#[test]
fn test_broken_chain_does_not_percolate() {
    let net = flagged_network(3, &[(0, 1)]);
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert!(!masks.percolates());
    assert_eq!(masks.pores, vec![false, false, false]);
    assert_eq!(masks.throats, vec![false]);
}

#[test]
fn test_missing_face_column_means_no_contact() {
    let mut net = PoreNetwork::new(2, 1);
    net.pores
        .insert("xmin", Column::scalar_bool(vec![true, false]))
        .unwrap();
    net.throats
        .insert("conns", Column::vector_i64(2, vec![0, 1]))
        .unwrap();
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert!(!masks.percolates());
}

#[test]
fn test_sentinel_endpoints_carry_no_adjacency() {
    // both pores hang off the inlet sentinel; they must not join through it
    let net = flagged_network(2, &[(0, -1), (1, -1)]);
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert!(!masks.percolates());
}

#[test]
fn test_sentinel_throat_of_kept_pore_survives() {
    let net = flagged_network(3, &[(0, 1), (1, 2), (0, -1), (2, -2)]);
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert_eq!(masks.throats, vec![true, true, true, true]);
}

#[test]
fn test_side_branch_outside_spanning_component_dropped() {
    // pores 3 and 4 form an island off the main chain
    let mut net = flagged_network(5, &[(0, 1), (1, 2), (3, 4)]);
    net.pores
        .insert("xmax", Column::scalar_bool(vec![false, false, true, false, false]))
        .unwrap();
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert_eq!(masks.pores, vec![true, true, true, false, false]);
    assert_eq!(masks.throats, vec![true, true, false]);
}

#[test]
fn test_out_of_range_endpoints_rejected() {
    let net = flagged_network(2, &[(0, 9)]);
    assert!(matches!(
        percolation_masks(&net, Face::XMin, Face::XMax),
        Err(PoreNetError::InvalidInput(_))
    ));
    // a sentinel pairing must not slip past the range check
    let net = flagged_network(2, &[(9, -1)]);
    assert!(matches!(
        percolation_masks(&net, Face::XMin, Face::XMax),
        Err(PoreNetError::InvalidInput(_))
    ));
}

#[test]
fn test_empty_network() {
    let net = PoreNetwork::new(0, 0);
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert!(!masks.percolates());
    assert!(masks.pores.is_empty());
    assert!(masks.throats.is_empty());
}

#[test]
fn test_isolated_pore_without_throats() {
    let mut net = PoreNetwork::new(1, 0);
    net.pores
        .insert("xmin", Column::scalar_bool(vec![true]))
        .unwrap();
    net.pores
        .insert("xmax", Column::scalar_bool(vec![true]))
        .unwrap();
    // a single pore touching both faces spans on its own
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert!(masks.percolates());
    assert_eq!(masks.pores, vec![true]);
    assert!(masks.throats.is_empty());
}

#[test]
fn test_masks_consistent_on_generated_lattice() {
    let net = generate_network(
        NetworkShape::Lattice {
            nx: 4,
            ny: 3,
            nz: 3,
        },
        7,
    )
    .expect("lattice");
    let masks = percolation_masks(&net, Face::XMin, Face::XMax).expect("masks");
    assert!(masks.percolates());
    let conns = net.conns().expect("conns");
    for (throat, pair) in conns.chunks_exact(2).enumerate() {
        let touches_kept = pair
            .iter()
            .any(|&endpoint| endpoint >= 0 && masks.pores[endpoint as usize]);
        assert_eq!(masks.throats[throat], touches_kept);
    }
}

#[test]
fn test_opposite_axis_on_lattice() {
    let net = generate_network(
        NetworkShape::Lattice {
            nx: 3,
            ny: 2,
            nz: 2,
        },
        11,
    )
    .expect("lattice");
    // the full lattice is one component touching every face
    let masks = percolation_masks(&net, Face::ZMin, Face::ZMax).expect("masks");
    assert!(masks.percolates());
    assert!(masks.pores.iter().all(|kept| *kept));
}
