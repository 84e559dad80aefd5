//! Per-element geometry resolution for the Statoil tables. Every quantity
//! resolves through a documented fallback chain over the optional network
//! properties; chains end in a defined default and never error. Quantities
//! leave this module in native length units; scaling happens at rendering.

use std::f64::consts::PI;

use crate::errors::PoreNetError;
use crate::network::PoreNetwork;
use crate::schema::names;

use super::StatoilConfig;

/// Shape factor of a circular cross-section, the weakest fallback.
pub(crate) const CIRCLE_SHAPE_FACTOR: f64 = 1.0 / (4.0 * PI);

#[derive(Clone, Copy, Debug)]
pub(crate) struct PoreGeometry {
    pub radius: f64,
    pub volume: f64,
    pub shape_factor: f64,
    pub clay_fraction: f64,
    pub capillary_count: i64,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ThroatGeometry {
    pub left: i64,
    pub right: i64,
    pub radius: f64,
    pub shape_factor: f64,
    pub total_length: f64,
    pub left_stub: f64,
    pub right_stub: f64,
    pub mid_length: f64,
    pub volume: f64,
    pub clay_fraction: f64,
    pub capillary_count: i64,
}

/// Borrows every column the export reads and resolves pore geometries
/// eagerly; throat geometries are resolved per call against them.
pub(crate) struct GeometryResolver<'a> {
    cfg: &'a StatoilConfig,
    pub coords: &'a [f64],
    pub conns: &'a [i64],
    pore_phase: Option<&'a [i64]>,
    throat_phases: Option<&'a [i64]>,
    throat_inscribed: Option<&'a [f64]>,
    throat_area: Option<&'a [f64]>,
    throat_perimeter: Option<&'a [f64]>,
    throat_shape: Option<&'a [f64]>,
    throat_direct: Option<&'a [f64]>,
    throat_mid: Option<&'a [f64]>,
    throat_conn_lengths: Option<&'a [f64]>,
    throat_volume: Option<&'a [f64]>,
    throat_cap_radius: Option<&'a [f64]>,
    throat_cap_count: Option<&'a [i64]>,
    pore_extended: Option<&'a [f64]>,
    min_positive_perimeter: Option<f64>,
    volume_factor: f64,
    pores: Vec<PoreGeometry>,
}

impl<'a> GeometryResolver<'a> {
    pub fn new(net: &'a PoreNetwork, cfg: &'a StatoilConfig) -> Result<Self, PoreNetError> {
        let coords = match net.pores.maybe_vector_f64(names::COORDS) {
            Some((3, values)) => values,
            _ => {
                return Err(PoreNetError::invalid_input(
                    "coords: float triple required for export",
                ));
            }
        };
        let conns = net.conns()?;

        let pore_phase = net.pores.maybe_scalar_i64(names::PHASE);
        let pore_inscribed = net.pores.maybe_scalar_f64(names::INSCRIBED_DIAMETER);
        let pore_extended = net.pores.maybe_scalar_f64(names::EXTENDED_DIAMETER);
        let pore_equivalent = net.pores.maybe_scalar_f64(names::EQUIVALENT_DIAMETER);
        let pore_volume = net.pores.maybe_scalar_f64(names::VOLUME);
        let pore_shape = net.pores.maybe_scalar_f64(names::SHAPE_FACTOR);
        let pore_porosity = net.pores.maybe_scalar_f64(names::SUBRESOLUTION_POROSITY);
        let pore_cap_radius = net.pores.maybe_scalar_f64(names::CAP_RADIUS);
        let pore_cap_count = net.pores.maybe_scalar_i64(names::NUMBER_OF_CAPILLARIES);

        let throat_perimeter = net.throats.maybe_scalar_f64(names::PERIMETER);
        let min_positive_perimeter = throat_perimeter.and_then(|values| {
            values
                .iter()
                .copied()
                .filter(|p| *p > 0.0)
                .fold(None, |acc: Option<f64>, p| {
                    Some(acc.map_or(p, |m| m.min(p)))
                })
        });

        let volume_factor = if net.meta.extraction_algorithm.as_deref() == Some("porespy") {
            0.5
        } else {
            1.0
        };

        let mut pores = Vec::with_capacity(net.pore_count());
        for pore in 0..net.pore_count() {
            let darcy = pore_phase.map(|p| p[pore] == 2).unwrap_or(false);
            let radius = darcy
                .then(|| pore_cap_radius.map(|v| v[pore]))
                .flatten()
                .or_else(|| pore_inscribed.map(|v| v[pore] / 2.0))
                .or_else(|| pore_extended.map(|v| v[pore] / 2.0))
                .or_else(|| pore_equivalent.map(|v| v[pore] / 2.0))
                .unwrap_or(0.0);
            let shape_factor = if darcy {
                cfg.subres_shape_factor
            } else {
                pore_shape.map(|v| v[pore]).unwrap_or(CIRCLE_SHAPE_FACTOR)
            };
            let volume = pore_volume
                .map(|v| v[pore])
                .or_else(|| pore_equivalent.map(|v| PI / 6.0 * v[pore].powi(3)))
                .unwrap_or(0.0)
                * volume_factor;
            let clay_fraction = if darcy {
                let porosity = pore_porosity.map(|v| v[pore]).unwrap_or(1.0);
                (1.0 - porosity * cfg.subres_porosity_modifier).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let capillary_count = if darcy {
                pore_cap_count.map(|v| v[pore]).unwrap_or(1)
            } else {
                1
            };
            pores.push(PoreGeometry {
                radius,
                volume,
                shape_factor,
                clay_fraction,
                capillary_count,
            });
        }

        Ok(GeometryResolver {
            cfg,
            coords,
            conns,
            pore_phase,
            throat_phases: net
                .throats
                .maybe_vector_i64(names::PHASES)
                .and_then(|(width, values)| (width == 2).then_some(values)),
            throat_inscribed: net.throats.maybe_scalar_f64(names::INSCRIBED_DIAMETER),
            throat_area: net.throats.maybe_scalar_f64(names::CROSS_SECTIONAL_AREA),
            throat_perimeter,
            throat_shape: net.throats.maybe_scalar_f64(names::SHAPE_FACTOR),
            throat_direct: net.throats.maybe_scalar_f64(names::DIRECT_LENGTH),
            throat_mid: net.throats.maybe_scalar_f64(names::MID_LENGTH),
            throat_conn_lengths: net
                .throats
                .maybe_vector_f64(names::CONN_LENGTHS)
                .and_then(|(width, values)| (width == 2).then_some(values)),
            throat_volume: net.throats.maybe_scalar_f64(names::VOLUME),
            throat_cap_radius: net.throats.maybe_scalar_f64(names::CAP_RADIUS),
            throat_cap_count: net.throats.maybe_scalar_i64(names::NUMBER_OF_CAPILLARIES),
            pore_extended,
            min_positive_perimeter,
            volume_factor,
            pores,
        })
    }

    pub fn pore(&self, pore: usize) -> &PoreGeometry {
        &self.pores[pore]
    }

    fn pore_is_darcy(&self, pore: usize) -> bool {
        self.pore_phase.map(|p| p[pore] == 2).unwrap_or(false)
    }

    /// Phase of one throat side: the `phases` pair when present, else the
    /// endpoint pore's phase, else resolved.
    fn endpoint_phase(&self, throat: usize, slot: usize) -> i64 {
        if let Some(phases) = self.throat_phases {
            return phases[throat * 2 + slot];
        }
        let endpoint = self.conns[throat * 2 + slot];
        if endpoint >= 0 {
            self.pore_phase
                .map(|p| p[endpoint as usize])
                .unwrap_or(1)
        } else {
            1
        }
    }

    /// The Darcy endpoint whose capillary properties govern a mixed or fully
    /// sub-resolution throat. With two Darcy endpoints the smaller capillary
    /// radius governs.
    fn governing_darcy_pore(&self, throat: usize) -> Option<usize> {
        let left = self.conns[throat * 2];
        let right = self.conns[throat * 2 + 1];
        let l = (left >= 0 && self.pore_is_darcy(left as usize)).then_some(left as usize);
        let r = (right >= 0 && self.pore_is_darcy(right as usize)).then_some(right as usize);
        match (l, r) {
            (Some(a), Some(b)) => {
                if self.pores[b].radius < self.pores[a].radius {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    fn derived_shape_factor(&self, throat: usize) -> f64 {
        let area = match self.throat_area {
            Some(v) => v[throat],
            None => return CIRCLE_SHAPE_FACTOR,
        };
        let perimeter = self.throat_perimeter.map(|v| v[throat]).unwrap_or(0.0);
        let perimeter = if perimeter > 0.0 {
            perimeter
        } else {
            match self.min_positive_perimeter {
                Some(p) => p,
                None => return CIRCLE_SHAPE_FACTOR,
            }
        };
        (area / (perimeter * perimeter)).min(1.0)
    }

    fn fallback_total_length(&self, throat: usize) -> f64 {
        let left = self.conns[throat * 2];
        let right = self.conns[throat * 2 + 1];
        match (left >= 0, right >= 0) {
            (true, true) => distance(self.coords, left as usize, right as usize),
            (true, false) => 2.0 * self.pores[left as usize].radius,
            (false, true) => 2.0 * self.pores[right as usize].radius,
            (false, false) => 0.0,
        }
    }

    fn fallback_stub(&self, endpoint: i64) -> f64 {
        if endpoint < 0 {
            return 0.0;
        }
        self.pore_extended
            .map(|v| v[endpoint as usize] / 2.0)
            .unwrap_or(0.0)
    }

    pub fn throat(&self, throat: usize) -> ThroatGeometry {
        let left = self.conns[throat * 2];
        let right = self.conns[throat * 2 + 1];
        let left_darcy = self.endpoint_phase(throat, 0) == 2;
        let right_darcy = self.endpoint_phase(throat, 1) == 2;
        let darcy = left_darcy || right_darcy;
        let governing = darcy.then(|| self.governing_darcy_pore(throat)).flatten();

        let radius = darcy
            .then(|| {
                self.throat_cap_radius
                    .map(|v| v[throat])
                    .or_else(|| governing.map(|p| self.pores[p].radius))
            })
            .flatten()
            .or_else(|| self.throat_inscribed.map(|v| v[throat] / 2.0))
            .or_else(|| self.throat_area.map(|v| (v[throat] / PI).sqrt()))
            .unwrap_or(0.0);

        let shape_factor = if darcy {
            self.cfg.subres_shape_factor
        } else {
            self.throat_shape
                .map(|v| v[throat])
                .unwrap_or_else(|| self.derived_shape_factor(throat))
        };

        let total_length = self
            .throat_direct
            .map(|v| v[throat])
            .unwrap_or_else(|| self.fallback_total_length(throat));

        let (mut left_stub, mut right_stub) = match self.throat_conn_lengths {
            Some(cl) => (cl[throat * 2], cl[throat * 2 + 1]),
            None => (self.fallback_stub(left), self.fallback_stub(right)),
        };
        // a Darcy side has no resolved pore body to stub into
        if left_darcy {
            left_stub = 0.0;
        }
        if right_darcy {
            right_stub = 0.0;
        }

        let mid_length = if darcy {
            (total_length - left_stub - right_stub).max(0.0)
        } else {
            self.throat_mid
                .map(|v| v[throat])
                .unwrap_or_else(|| (total_length - left_stub - right_stub).max(0.0))
        };

        let volume = self
            .throat_volume
            .map(|v| v[throat])
            .unwrap_or_else(|| self.throat_area.map(|v| v[throat]).unwrap_or(0.0) * mid_length)
            * self.volume_factor;

        let clay_fraction = if darcy {
            governing
                .map(|p| self.pores[p].clay_fraction)
                .unwrap_or_else(|| {
                    (1.0 - self.cfg.subres_porosity_modifier).clamp(0.0, 1.0)
                })
        } else {
            0.0
        };

        let capillary_count = if darcy {
            self.throat_cap_count
                .map(|v| v[throat])
                .or_else(|| governing.map(|p| self.pores[p].capillary_count))
                .unwrap_or(1)
        } else {
            1
        };

        ThroatGeometry {
            left,
            right,
            radius,
            shape_factor,
            total_length,
            left_stub,
            right_stub,
            mid_length,
            volume,
            clay_fraction,
            capillary_count,
        }
    }

    /// Geometry of a synthetic boundary throat from `pore` to a face
    /// sentinel: best effort from the pore itself, zero volume.
    pub fn boundary_throat(&self, pore: usize, sentinel: i64) -> ThroatGeometry {
        let geom = &self.pores[pore];
        let darcy = self.pore_is_darcy(pore);
        let pore_stub = if darcy { 0.0 } else { geom.radius };
        ThroatGeometry {
            left: pore as i64,
            right: sentinel,
            radius: geom.radius,
            shape_factor: geom.shape_factor,
            total_length: 2.0 * geom.radius,
            left_stub: pore_stub,
            right_stub: 0.0,
            mid_length: 2.0 * geom.radius - pore_stub,
            volume: 0.0,
            clay_fraction: geom.clay_fraction,
            capillary_count: geom.capillary_count,
        }
    }
}

fn distance(coords: &[f64], a: usize, b: usize) -> f64 {
    let pa = &coords[a * 3..a * 3 + 3];
    let pb = &coords[b * 3..b * 3 + 3];
    pa.iter()
        .zip(pb)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
