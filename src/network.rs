//! In-memory pore-network record: two aligned column tables (pore bodies and
//! throats) plus provenance metadata. Row index identifies the element across
//! every column of its table; `ElementTable::insert` enforces the alignment,
//! and [`PoreNetwork::validate`] re-audits records that arrive from outside
//! (tabular conversion, dump files).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::PoreNetError;
use crate::schema::{self, Dtype, ElementKind, PropertyKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Values {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Bool(Vec<bool>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Float(v) => v.len(),
            Values::Int(v) => v.len(),
            Values::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            Values::Float(_) => Dtype::Float,
            Values::Int(_) => Dtype::Int,
            Values::Bool(_) => Dtype::Bool,
        }
    }
}

/// One named property: scalar (`width == 1`) or fixed-width vector
/// (`width > 1`, row-major).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    width: usize,
    values: Values,
}

impl Column {
    pub fn scalar_f64(values: Vec<f64>) -> Self {
        Column {
            width: 1,
            values: Values::Float(values),
        }
    }

    pub fn scalar_i64(values: Vec<i64>) -> Self {
        Column {
            width: 1,
            values: Values::Int(values),
        }
    }

    pub fn scalar_bool(values: Vec<bool>) -> Self {
        Column {
            width: 1,
            values: Values::Bool(values),
        }
    }

    pub fn vector_f64(width: usize, values: Vec<f64>) -> Self {
        debug_assert!(width >= 1);
        Column {
            width,
            values: Values::Float(values),
        }
    }

    pub fn vector_i64(width: usize, values: Vec<i64>) -> Self {
        debug_assert!(width >= 1);
        Column {
            width,
            values: Values::Int(values),
        }
    }

    pub fn vector_bool(width: usize, values: Vec<bool>) -> Self {
        debug_assert!(width >= 1);
        Column {
            width,
            values: Values::Bool(values),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn dtype(&self) -> Dtype {
        self.values.dtype()
    }

    pub fn rows(&self) -> usize {
        self.values.len() / self.width
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.values {
            Values::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.values {
            Values::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match &self.values {
            Values::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Keeps the rows flagged in `keep`; vector rows move as whole blocks.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Column, PoreNetError> {
        if keep.len() != self.rows() {
            return Err(PoreNetError::column(format!(
                "mask length {} does not match {} rows",
                keep.len(),
                self.rows()
            )));
        }
        let values = match &self.values {
            Values::Float(v) => Values::Float(filter_blocks(v, self.width, keep)),
            Values::Int(v) => Values::Int(filter_blocks(v, self.width, keep)),
            Values::Bool(v) => Values::Bool(filter_blocks(v, self.width, keep)),
        };
        Ok(Column {
            width: self.width,
            values,
        })
    }
}

fn filter_blocks<T: Copy>(values: &[T], width: usize, keep: &[bool]) -> Vec<T> {
    let kept = keep.iter().filter(|k| **k).count();
    let mut out = Vec::with_capacity(kept * width);
    for (row, flag) in keep.iter().enumerate() {
        if *flag {
            out.extend_from_slice(&values[row * width..(row + 1) * width]);
        }
    }
    out
}

/// Named columns for one element collection, all holding exactly `count` rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementTable {
    count: usize,
    columns: BTreeMap<String, Column>,
}

impl ElementTable {
    pub fn new(count: usize) -> Self {
        ElementTable {
            count,
            columns: BTreeMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn insert<T: Into<String>>(
        &mut self,
        name: T,
        column: Column,
    ) -> Result<(), PoreNetError> {
        let name = name.into();
        if column.rows() != self.count {
            return Err(PoreNetError::column(format!(
                "{name}: {} rows inserted into table of {}",
                column.rows(),
                self.count
            )));
        }
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    pub fn scalar_f64(&self, name: &str) -> Result<&[f64], PoreNetError> {
        self.maybe_scalar_f64(name)
            .ok_or_else(|| missing(name, "float scalar"))
    }

    pub fn scalar_i64(&self, name: &str) -> Result<&[i64], PoreNetError> {
        self.maybe_scalar_i64(name)
            .ok_or_else(|| missing(name, "int scalar"))
    }

    pub fn scalar_bool(&self, name: &str) -> Result<&[bool], PoreNetError> {
        self.maybe_scalar_bool(name)
            .ok_or_else(|| missing(name, "bool scalar"))
    }

    pub fn vector_f64(&self, name: &str) -> Result<(usize, &[f64]), PoreNetError> {
        self.maybe_vector_f64(name)
            .ok_or_else(|| missing(name, "float vector"))
    }

    pub fn vector_i64(&self, name: &str) -> Result<(usize, &[i64]), PoreNetError> {
        self.get(name)
            .filter(|col| col.width() > 1)
            .and_then(|col| col.as_i64().map(|v| (col.width(), v)))
            .ok_or_else(|| missing(name, "int vector"))
    }

    pub fn maybe_scalar_f64(&self, name: &str) -> Option<&[f64]> {
        self.get(name).filter(|col| col.width() == 1)?.as_f64()
    }

    pub fn maybe_scalar_i64(&self, name: &str) -> Option<&[i64]> {
        self.get(name).filter(|col| col.width() == 1)?.as_i64()
    }

    pub fn maybe_scalar_bool(&self, name: &str) -> Option<&[bool]> {
        self.get(name).filter(|col| col.width() == 1)?.as_bool()
    }

    pub fn maybe_vector_f64(&self, name: &str) -> Option<(usize, &[f64])> {
        let col = self.get(name).filter(|col| col.width() > 1)?;
        col.as_f64().map(|v| (col.width(), v))
    }

    pub fn maybe_vector_i64(&self, name: &str) -> Option<(usize, &[i64])> {
        let col = self.get(name).filter(|col| col.width() > 1)?;
        col.as_i64().map(|v| (col.width(), v))
    }

    /// Filters every column by the same row mask, producing a table whose
    /// count is the number of kept rows.
    pub fn filtered(&self, keep: &[bool]) -> Result<ElementTable, PoreNetError> {
        if keep.len() != self.count {
            return Err(PoreNetError::column(format!(
                "mask length {} does not match table count {}",
                keep.len(),
                self.count
            )));
        }
        let mut out = ElementTable::new(keep.iter().filter(|k| **k).count());
        for (name, column) in &self.columns {
            out.insert(name.clone(), column.filter_rows(keep)?)?;
        }
        Ok(out)
    }
}

fn missing(name: &str, expected: &str) -> PoreNetError {
    PoreNetError::column(format!("{name}: expected {expected}"))
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMeta {
    /// Name of the extraction tool that produced the record. `"porespy"`
    /// marks volumes as double-counted per voxel and halved at export.
    pub extraction_algorithm: Option<String>,
    /// Physical sample extent in native length units, x/y/z.
    pub domain_size: Option<[f64; 3]>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoreNetwork {
    pub pores: ElementTable,
    pub throats: ElementTable,
    pub meta: NetworkMeta,
}

impl PoreNetwork {
    pub fn new(n_pores: usize, n_throats: usize) -> Self {
        PoreNetwork {
            pores: ElementTable::new(n_pores),
            throats: ElementTable::new(n_throats),
            meta: NetworkMeta::default(),
        }
    }

    pub fn pore_count(&self) -> usize {
        self.pores.count()
    }

    pub fn throat_count(&self) -> usize {
        self.throats.count()
    }

    /// Flat endpoint pairs, one `[left, right]` block per throat. Negative
    /// endpoints are boundary sentinels, not pore indices.
    pub fn conns(&self) -> Result<&[i64], PoreNetError> {
        let (width, values) = self.throats.vector_i64(schema::names::CONNS)?;
        if width != 2 {
            return Err(PoreNetError::column(format!(
                "conns: expected width 2, found {width}"
            )));
        }
        Ok(values)
    }

    /// Rejects any non-negative throat endpoint outside `0..pore_count`.
    /// Negative sentinels are not checked here.
    pub(crate) fn check_endpoint_range(&self) -> Result<(), PoreNetError> {
        if self.throat_count() == 0 {
            return Ok(());
        }
        let conns = self.conns()?;
        for (throat, pair) in conns.chunks_exact(2).enumerate() {
            for &endpoint in pair {
                if endpoint >= 0 && endpoint as usize >= self.pore_count() {
                    return Err(PoreNetError::invalid_input(format!(
                        "throat {throat} endpoint {endpoint} out of range for {} pores",
                        self.pore_count()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Structural audit: endpoint columns present and in range, known
    /// properties carrying their declared dtype and width.
    pub fn validate(&self) -> Result<(), PoreNetError> {
        self.check_endpoint_range()?;
        validate_kinds(ElementKind::Pore, &self.pores)?;
        validate_kinds(ElementKind::Throat, &self.throats)?;
        Ok(())
    }
}

fn validate_kinds(element: ElementKind, table: &ElementTable) -> Result<(), PoreNetError> {
    for (name, column) in table.iter() {
        if let Some(kind) = schema::known_kind(element, name) {
            let matches = match kind {
                PropertyKind::Scalar(dtype) => column.width() == 1 && column.dtype() == dtype,
                PropertyKind::Vector(dtype, width) => {
                    column.width() == width && column.dtype() == dtype
                }
            };
            if !matches {
                return Err(PoreNetError::column(format!(
                    "{}{name}: dtype/width does not match schema",
                    element.prefix()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_misaligned_column() {
        let mut table = ElementTable::new(3);
        let err = table.insert("volume", Column::scalar_f64(vec![1.0, 2.0]));
        assert!(err.is_err());
    }

    #[test]
    fn test_filter_rows_moves_vector_blocks() {
        let col = Column::vector_i64(2, vec![0, 1, 1, 2, 2, 0]);
        let kept = col.filter_rows(&[true, false, true]).unwrap();
        assert_eq!(kept.as_i64().unwrap(), &[0, 1, 2, 0]);
        assert_eq!(kept.rows(), 2);
    }

    #[test]
    fn test_validate_flags_out_of_range_endpoint() {
        let mut net = PoreNetwork::new(2, 1);
        net.throats
            .insert("conns", Column::vector_i64(2, vec![0, 5]))
            .unwrap();
        assert!(net.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_sentinel_endpoints() {
        let mut net = PoreNetwork::new(2, 2);
        net.throats
            .insert("conns", Column::vector_i64(2, vec![0, 1, 1, -1]))
            .unwrap();
        assert!(net.validate().is_ok());
    }

    #[test]
    fn test_validate_checks_schema_dtype() {
        let mut net = PoreNetwork::new(1, 0);
        net.pores
            .insert("volume", Column::scalar_i64(vec![3]))
            .unwrap();
        assert!(net.validate().is_err());
    }
}
