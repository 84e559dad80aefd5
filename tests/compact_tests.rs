use porenet::compact::{compact_network, pore_remap};
use porenet::network::{Column, PoreNetwork};
use porenet::percolation::PercolationMasks;
use porenet::PoreNetError;

fn five_pore_network() -> PoreNetwork {
    let mut net = PoreNetwork::new(5, 3);
    net.pores
        .insert(
            "volume",
            Column::scalar_f64(vec![10.0, 11.0, 12.0, 13.0, 14.0]),
        )
        .unwrap();
    net.pores
        .insert(
            "coords",
            Column::vector_f64(
                3,
                vec![
                    0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0, 0.0, 0.0, 4.0, 0.0, 0.0,
                ],
            ),
        )
        .unwrap();
    net.throats
        .insert("conns", Column::vector_i64(2, vec![0, 2, 2, 4, 1, 3]))
        .unwrap();
    net.throats
        .insert(
            "inscribed_diameter",
            Column::scalar_f64(vec![0.5, 0.6, 0.7]),
        )
        .unwrap();
    net
}

#[test]
fn test_remap_is_dense_over_kept_pores() {
    let remap = pore_remap(&[true, false, true, false, true]);
    assert_eq!(remap, vec![0, 0, 1, 0, 2]);
}

#[test]
fn test_compaction_renumbers_endpoints() {
    let net = five_pore_network();
    let masks = PercolationMasks {
        pores: vec![true, false, true, false, true],
        throats: vec![true, true, false],
    };
    let compacted = compact_network(&net, &masks).expect("compacted");
    assert_eq!(compacted.pore_count(), 3);
    assert_eq!(compacted.throat_count(), 2);
    assert_eq!(compacted.conns().unwrap(), &[0, 1, 1, 2]);
}

#[test]
fn test_compaction_slices_sibling_columns() {
    let net = five_pore_network();
    let masks = PercolationMasks {
        pores: vec![true, false, true, false, true],
        throats: vec![true, true, false],
    };
    let compacted = compact_network(&net, &masks).expect("compacted");
    assert_eq!(
        compacted.pores.scalar_f64("volume").unwrap(),
        &[10.0, 12.0, 14.0]
    );
    let coords = compacted.pores.get("coords").unwrap();
    assert_eq!(
        coords.as_f64().unwrap(),
        &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 4.0, 0.0, 0.0]
    );
    assert_eq!(
        compacted.throats.scalar_f64("inscribed_diameter").unwrap(),
        &[0.5, 0.6]
    );
}

#[test]
fn test_sentinels_survive_compaction() {
    let mut net = PoreNetwork::new(3, 3);
    net.throats
        .insert("conns", Column::vector_i64(2, vec![0, 2, 2, -1, 1, -2]))
        .unwrap();
    let masks = PercolationMasks {
        pores: vec![true, false, true],
        throats: vec![true, true, false],
    };
    let compacted = compact_network(&net, &masks).expect("compacted");
    assert_eq!(compacted.conns().unwrap(), &[0, 1, 1, -1]);
}

#[test]
fn test_mask_length_mismatch_rejected() {
    let net = five_pore_network();
    let masks = PercolationMasks {
        pores: vec![true, true],
        throats: vec![true, true, true],
    };
    assert!(matches!(
        compact_network(&net, &masks),
        Err(PoreNetError::InvalidInput(_))
    ));
}

#[test]
fn test_out_of_range_endpoint_rejected() {
    let mut net = PoreNetwork::new(2, 1);
    net.throats
        .insert("conns", Column::vector_i64(2, vec![0, 9]))
        .unwrap();
    let masks = PercolationMasks {
        pores: vec![true, true],
        throats: vec![true],
    };
    assert!(matches!(
        compact_network(&net, &masks),
        Err(PoreNetError::InvalidInput(_))
    ));
}

#[test]
fn test_meta_carried_over() {
    let mut net = five_pore_network();
    net.meta.extraction_algorithm = Some("porespy".to_string());
    net.meta.domain_size = Some([4.0, 1.0, 1.0]);
    let masks = PercolationMasks {
        pores: vec![true; 5],
        throats: vec![true; 3],
    };
    let compacted = compact_network(&net, &masks).expect("compacted");
    assert_eq!(compacted.meta, net.meta);
}

#[test]
fn test_all_false_masks_empty_the_network() {
    let net = five_pore_network();
    let masks = PercolationMasks {
        pores: vec![false; 5],
        throats: vec![false; 3],
    };
    let compacted = compact_network(&net, &masks).expect("compacted");
    assert_eq!(compacted.pore_count(), 0);
    assert_eq!(compacted.throat_count(), 0);
}
