//! Deterministic synthetic networks for tests and benches. Shapes are
//! generated from a seed so failures reproduce exactly; geometry columns are
//! deliberately partial (no shape factors, no stub lengths) to exercise the
//! export fallback chains.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::errors::PoreNetError;
use crate::network::{Column, PoreNetwork};
use crate::schema::{FACE_FLAGS, names};

#[derive(Clone, Copy, Debug)]
pub enum NetworkShape {
    /// Pores spaced 1.0 apart along x, consecutive pores linked. The first
    /// pore touches xmin, the last xmax.
    Chain { pores: usize },
    /// Cubic lattice with +x/+y/+z neighbor links and boundary face flags on
    /// all six sides.
    Lattice { nx: usize, ny: usize, nz: usize },
}

pub fn generate_network(shape: NetworkShape, seed: u64) -> Result<PoreNetwork, PoreNetError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = Builder::default();
    match shape {
        NetworkShape::Chain { pores } => {
            for i in 0..pores {
                let jitter = [0.0, 0.2 * rng.r#gen::<f64>(), 0.2 * rng.r#gen::<f64>()];
                builder.add_pore(
                    [i as f64, jitter[1], jitter[2]],
                    [i == 0, i + 1 == pores, false, false, false, false],
                    rng.gen_range(0.3..0.5),
                );
            }
            for i in 1..pores {
                builder.add_throat(i - 1, i, rng.gen_range(0.1..0.2), 1.0);
            }
        }
        NetworkShape::Lattice { nx, ny, nz } => {
            let id = |x: usize, y: usize, z: usize| x + nx * (y + ny * z);
            for z in 0..nz {
                for y in 0..ny {
                    for x in 0..nx {
                        let jitter = 0.1 * rng.r#gen::<f64>();
                        builder.add_pore(
                            [x as f64 + jitter, y as f64, z as f64],
                            [
                                x == 0,
                                x + 1 == nx,
                                y == 0,
                                y + 1 == ny,
                                z == 0,
                                z + 1 == nz,
                            ],
                            rng.gen_range(0.3..0.5),
                        );
                    }
                }
            }
            for z in 0..nz {
                for y in 0..ny {
                    for x in 0..nx {
                        let radius = rng.gen_range(0.1..0.2);
                        if x + 1 < nx {
                            builder.add_throat(id(x, y, z), id(x + 1, y, z), radius, 1.0);
                        }
                        if y + 1 < ny {
                            builder.add_throat(id(x, y, z), id(x, y + 1, z), radius, 1.0);
                        }
                        if z + 1 < nz {
                            builder.add_throat(id(x, y, z), id(x, y, z + 1), radius, 1.0);
                        }
                    }
                }
            }
        }
    }
    builder.finish()
}

/// Marks every pore whose x position lies in `[from, to)` as sub-resolution
/// and attaches default capillary properties, rebuilding the dependent phase
/// columns.
pub fn add_darcy_band(net: &mut PoreNetwork, from: f64, to: f64) -> Result<(), PoreNetError> {
    let (width, coords) = net.pores.vector_f64(names::COORDS)?;
    if width != 3 {
        return Err(PoreNetError::column("coords: expected float triple"));
    }
    let in_band: Vec<bool> = coords
        .chunks_exact(3)
        .map(|c| c[0] >= from && c[0] < to)
        .collect();
    let mut phase: Vec<i64> = net.pores.scalar_i64(names::PHASE)?.to_vec();
    for (value, flagged) in phase.iter_mut().zip(&in_band) {
        if *flagged {
            *value = 2;
        }
    }
    let cap_radius: Vec<f64> = match net.pores.maybe_scalar_f64(names::INSCRIBED_DIAMETER) {
        Some(inscribed) => inscribed.iter().map(|d| d / 4.0).collect(),
        None => vec![0.1; net.pore_count()],
    };
    let throat_phases: Vec<i64> = if net.throat_count() > 0 {
        net.conns()?
            .iter()
            .map(|&endpoint| {
                if endpoint >= 0 {
                    phase[endpoint as usize]
                } else {
                    1
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let n = net.pore_count();
    net.pores.insert(
        names::PHASE1,
        Column::scalar_bool(phase.iter().map(|&p| p == 1).collect()),
    )?;
    net.pores.insert(
        names::PHASE2,
        Column::scalar_bool(phase.iter().map(|&p| p == 2).collect()),
    )?;
    net.pores.insert(names::PHASE, Column::scalar_i64(phase))?;
    net.pores
        .insert(names::CAP_RADIUS, Column::scalar_f64(cap_radius))?;
    net.pores.insert(
        names::SUBRESOLUTION_POROSITY,
        Column::scalar_f64(vec![0.5; n]),
    )?;
    net.pores.insert(
        names::NUMBER_OF_CAPILLARIES,
        Column::scalar_i64(vec![2; n]),
    )?;
    if net.throat_count() > 0 {
        net.throats
            .insert(names::PHASES, Column::vector_i64(2, throat_phases))?;
    }
    Ok(())
}

#[derive(Default)]
struct Builder {
    coords: Vec<f64>,
    inscribed: Vec<f64>,
    extended: Vec<f64>,
    equivalent: Vec<f64>,
    volume: Vec<f64>,
    phase: Vec<i64>,
    flags: [Vec<bool>; 6],
    conns: Vec<i64>,
    phases: Vec<i64>,
    throat_inscribed: Vec<f64>,
    throat_area: Vec<f64>,
    throat_perimeter: Vec<f64>,
    throat_direct: Vec<f64>,
    throat_volume: Vec<f64>,
}

impl Builder {
    fn add_pore(&mut self, position: [f64; 3], faces: [bool; 6], inscribed_diameter: f64) {
        self.coords.extend_from_slice(&position);
        self.inscribed.push(inscribed_diameter);
        self.extended.push(inscribed_diameter * 1.6);
        self.equivalent.push(inscribed_diameter * 1.2);
        self.volume
            .push(PI / 6.0 * (inscribed_diameter * 1.2).powi(3));
        self.phase.push(1);
        for (column, flag) in self.flags.iter_mut().zip(faces) {
            column.push(flag);
        }
    }

    fn add_throat(&mut self, a: usize, b: usize, radius: f64, length: f64) {
        self.conns.push(a as i64);
        self.conns.push(b as i64);
        self.phases.push(1);
        self.phases.push(1);
        self.throat_inscribed.push(radius * 2.0);
        self.throat_area.push(PI * radius * radius);
        self.throat_perimeter.push(2.0 * PI * radius);
        self.throat_direct.push(length);
        self.throat_volume.push(PI * radius * radius * length * 0.6);
    }

    fn finish(self) -> Result<PoreNetwork, PoreNetError> {
        let n_pores = self.phase.len();
        let n_throats = self.phases.len() / 2;
        let mut net = PoreNetwork::new(n_pores, n_throats);
        net.pores
            .insert(names::COORDS, Column::vector_f64(3, self.coords))?;
        net.pores.insert(
            names::INSCRIBED_DIAMETER,
            Column::scalar_f64(self.inscribed),
        )?;
        net.pores
            .insert(names::EXTENDED_DIAMETER, Column::scalar_f64(self.extended))?;
        net.pores.insert(
            names::EQUIVALENT_DIAMETER,
            Column::scalar_f64(self.equivalent),
        )?;
        net.pores
            .insert(names::VOLUME, Column::scalar_f64(self.volume))?;
        net.pores.insert(
            names::PHASE1,
            Column::scalar_bool(self.phase.iter().map(|&p| p == 1).collect()),
        )?;
        net.pores.insert(
            names::PHASE2,
            Column::scalar_bool(self.phase.iter().map(|&p| p == 2).collect()),
        )?;
        net.pores
            .insert(names::PHASE, Column::scalar_i64(self.phase))?;
        for (name, values) in FACE_FLAGS.iter().zip(self.flags) {
            net.pores.insert(*name, Column::scalar_bool(values))?;
        }
        net.throats
            .insert(names::CONNS, Column::vector_i64(2, self.conns))?;
        net.throats
            .insert(names::PHASES, Column::vector_i64(2, self.phases))?;
        net.throats.insert(
            names::INSCRIBED_DIAMETER,
            Column::scalar_f64(self.throat_inscribed),
        )?;
        net.throats.insert(
            names::CROSS_SECTIONAL_AREA,
            Column::scalar_f64(self.throat_area),
        )?;
        net.throats
            .insert(names::PERIMETER, Column::scalar_f64(self.throat_perimeter))?;
        net.throats
            .insert(names::DIRECT_LENGTH, Column::scalar_f64(self.throat_direct))?;
        net.throats
            .insert(names::VOLUME, Column::scalar_f64(self.throat_volume))?;
        net.validate()?;
        Ok(net)
    }
}
