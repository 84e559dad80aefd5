//! Typed property schema for pore-network records. The enumeration here is the
//! single authority on element kinds, column dtypes, and which properties are
//! fixed-width vectors; the tabular adapter consults it before falling back to
//! structural suffix detection, and the exporter reads properties through the
//! name constants below.

use serde::{Deserialize, Serialize};

/// Throat endpoint sentinel for the inlet side of the sample.
pub const INLET: i64 = -1;
/// Throat endpoint sentinel for the outlet side of the sample.
pub const OUTLET: i64 = -2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Pore,
    Throat,
}

impl ElementKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ElementKind::Pore => "pore.",
            ElementKind::Throat => "throat.",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dtype {
    Float,
    Int,
    Bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar(Dtype),
    Vector(Dtype, usize),
}

impl PropertyKind {
    pub fn dtype(&self) -> Dtype {
        match self {
            PropertyKind::Scalar(dtype) => *dtype,
            PropertyKind::Vector(dtype, _) => *dtype,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            PropertyKind::Scalar(_) => 1,
            PropertyKind::Vector(_, width) => *width,
        }
    }
}

/// Property names read by the filter, compactor, and exporter. Producers may
/// attach any further columns; those ride along untyped.
pub mod names {
    pub const COORDS: &str = "coords";
    pub const CONNS: &str = "conns";
    pub const PHASE: &str = "phase";
    pub const PHASES: &str = "phases";
    pub const PHASE1: &str = "phase1";
    pub const PHASE2: &str = "phase2";
    pub const EXTENDED_DIAMETER: &str = "extended_diameter";
    pub const INSCRIBED_DIAMETER: &str = "inscribed_diameter";
    pub const EQUIVALENT_DIAMETER: &str = "equivalent_diameter";
    pub const VOLUME: &str = "volume";
    pub const SURFACE_AREA: &str = "surface_area";
    pub const SHAPE_FACTOR: &str = "shape_factor";
    pub const CROSS_SECTIONAL_AREA: &str = "cross_sectional_area";
    pub const PERIMETER: &str = "perimeter";
    pub const DIRECT_LENGTH: &str = "direct_length";
    pub const MID_LENGTH: &str = "mid_length";
    pub const CONN_LENGTHS: &str = "conn_lengths";
    pub const SUBRESOLUTION_POROSITY: &str = "subresolution_porosity";
    pub const CAP_RADIUS: &str = "cap_radius";
    pub const NUMBER_OF_CAPILLARIES: &str = "number_of_capillaries";
}

/// Boundary-face flag properties in `Face` declaration order.
pub const FACE_FLAGS: [&str; 6] = ["xmin", "xmax", "ymin", "ymax", "zmin", "zmax"];

/// Returns the declared kind of a known property, or `None` for columns the
/// schema does not govern.
pub fn known_kind(element: ElementKind, name: &str) -> Option<PropertyKind> {
    use Dtype::*;
    use PropertyKind::*;
    match element {
        ElementKind::Pore => match name {
            "coords" => Some(Vector(Float, 3)),
            "extended_diameter" | "inscribed_diameter" | "equivalent_diameter" | "volume"
            | "surface_area" | "shape_factor" | "subresolution_porosity" | "cap_radius" => {
                Some(Scalar(Float))
            }
            "phase" | "number_of_capillaries" => Some(Scalar(Int)),
            "phase1" | "phase2" => Some(Scalar(Bool)),
            _ if FACE_FLAGS.contains(&name) => Some(Scalar(Bool)),
            _ => None,
        },
        ElementKind::Throat => match name {
            "conns" | "phases" => Some(Vector(Int, 2)),
            "conn_lengths" => Some(Vector(Float, 2)),
            "inscribed_diameter" | "cross_sectional_area" | "perimeter" | "shape_factor"
            | "direct_length" | "mid_length" | "volume" | "cap_radius" => Some(Scalar(Float)),
            "number_of_capillaries" => Some(Scalar(Int)),
            _ => None,
        },
    }
}
