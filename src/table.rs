//! Tabular interchange encoding. Host applications exchange pore networks as
//! pairs of flat tables whose scalar columns carry `pore.` / `throat.` name
//! prefixes and `<name>_<index>` suffixes for flattened vector properties.
//! Conversion into the stacked record consults the property schema first and
//! falls back to structural detection (a complete `_0.._{k-1}` run of
//! same-dtype columns) for producer-specific extras; anything else passes
//! through as a scalar untouched.

use std::collections::BTreeMap;

use crate::errors::PoreNetError;
use crate::network::{Column, ElementTable, NetworkMeta, PoreNetwork, Values};
use crate::schema::{self, ElementKind, PropertyKind, names};

/// Attribute naming the logical role of a flat table.
pub const TABLE_TYPE_ATTR: &str = "table_type";
pub const PORE_TABLE_TYPE: &str = "pore_table";
pub const THROAT_TABLE_TYPE: &str = "throat_table";
pub const EXTRACTION_ATTR: &str = "extraction_algorithm";
pub const DOMAIN_ATTR: &str = "domain_size";

/// One flat table: scalar columns plus string attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub columns: BTreeMap<String, Values>,
}

impl Table {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Table {
            name: name.into(),
            attrs: BTreeMap::new(),
            columns: BTreeMap::new(),
        }
    }

    pub fn table_type(&self) -> Option<&str> {
        self.attrs.get(TABLE_TYPE_ATTR).map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.columns.values().next().map(Values::len).unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSet {
    pub tables: Vec<Table>,
}

impl TableSet {
    pub fn find_by_type(&self, table_type: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.table_type() == Some(table_type))
    }
}

/// Converts a flat table pair into a stacked record. The pores table and its
/// companion throats table are located by the `table_type` attribute; either
/// side missing is a [`PoreNetError::MissingPairedTable`]. Throats whose both
/// endpoints are negative (degenerate extractor artifacts) are dropped.
pub fn network_from_tables(set: &TableSet) -> Result<PoreNetwork, PoreNetError> {
    let pore_table = set.find_by_type(PORE_TABLE_TYPE).ok_or_else(|| {
        PoreNetError::missing_paired_table("no pore table in set")
    })?;
    let throat_table = set.find_by_type(THROAT_TABLE_TYPE).ok_or_else(|| {
        PoreNetError::missing_paired_table(format!(
            "{}: no companion throat table",
            pore_table.name
        ))
    })?;

    let mut pores = element_from_table(ElementKind::Pore, pore_table)?;
    let mut throats = element_from_table(ElementKind::Throat, throat_table)?;
    derive_phase_flags(&mut pores)?;

    if let Some(col) = throats.get(names::CONNS) {
        if let Some(conns) = col.as_i64() {
            let keep: Vec<bool> = conns
                .chunks_exact(2)
                .map(|pair| pair[0] >= 0 || pair[1] >= 0)
                .collect();
            if keep.iter().any(|kept| !kept) {
                throats = throats.filtered(&keep)?;
            }
        }
    }

    let net = PoreNetwork {
        pores,
        throats,
        meta: meta_from_attrs(pore_table)?,
    };
    net.validate()?;
    Ok(net)
}

/// Inverse conversion. Vector properties re-expand into suffixed scalar
/// columns, prefixes are re-applied, metadata lands in the pore table
/// attributes.
pub fn tables_from_network(net: &PoreNetwork) -> TableSet {
    let mut pore_table = element_to_table(ElementKind::Pore, &net.pores, "pores", PORE_TABLE_TYPE);
    let throat_table =
        element_to_table(ElementKind::Throat, &net.throats, "throats", THROAT_TABLE_TYPE);

    if let Some(algorithm) = &net.meta.extraction_algorithm {
        pore_table
            .attrs
            .insert(EXTRACTION_ATTR.to_string(), algorithm.clone());
    }
    if let Some(domain) = &net.meta.domain_size {
        if let Ok(json) = serde_json::to_string(domain) {
            pore_table.attrs.insert(DOMAIN_ATTR.to_string(), json);
        }
    }

    TableSet {
        tables: vec![pore_table, throat_table],
    }
}

fn element_from_table(element: ElementKind, table: &Table) -> Result<ElementTable, PoreNetError> {
    let prefix = element.prefix();
    let count = table.row_count();
    for (name, values) in &table.columns {
        if values.len() != count {
            return Err(PoreNetError::column(format!(
                "{name}: {} rows, expected {count}",
                values.len()
            )));
        }
    }

    let mut scalars: Vec<(String, &Values)> = Vec::new();
    let mut groups: BTreeMap<String, BTreeMap<usize, &Values>> = BTreeMap::new();
    for (name, values) in &table.columns {
        let stripped = name.strip_prefix(prefix).unwrap_or(name);
        match split_indexed(stripped) {
            Some((base, index)) => {
                groups
                    .entry(base.to_string())
                    .or_default()
                    .insert(index, values);
            }
            None => scalars.push((stripped.to_string(), values)),
        }
    }

    let mut out = ElementTable::new(count);
    for (name, values) in scalars {
        out.insert(name, scalar_column(values))?;
    }
    for (base, members) in groups {
        match group_width(element, &base, &members) {
            Some(width) => {
                let parts: Vec<&Values> = members.values().copied().collect();
                out.insert(base, interleave(width, count, &parts))?;
            }
            None => {
                for (index, values) in members {
                    out.insert(format!("{base}_{index}"), scalar_column(values))?;
                }
            }
        }
    }
    Ok(out)
}

/// Decides whether a suffixed column family forms one vector property.
/// Schema-declared vectors group on a complete run of the declared width and
/// dtype; undeclared families group on any complete `_0.._{k-1}` run (k >= 2)
/// of one dtype.
fn group_width(
    element: ElementKind,
    base: &str,
    members: &BTreeMap<usize, &Values>,
) -> Option<usize> {
    let width = match schema::known_kind(element, base) {
        Some(PropertyKind::Vector(dtype, width)) => {
            if members.values().any(|v| v.dtype() != dtype) {
                return None;
            }
            width
        }
        Some(PropertyKind::Scalar(_)) => return None,
        None => {
            let width = members.len();
            if width < 2 {
                return None;
            }
            let dtype = members.values().next()?.dtype();
            if members.values().any(|v| v.dtype() != dtype) {
                return None;
            }
            width
        }
    };
    if members.len() == width && (0..width).all(|i| members.contains_key(&i)) {
        Some(width)
    } else {
        None
    }
}

fn split_indexed(name: &str) -> Option<(&str, usize)> {
    let (base, suffix) = name.rsplit_once('_')?;
    if base.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().map(|index| (base, index))
}

fn scalar_column(values: &Values) -> Column {
    match values {
        Values::Float(v) => Column::scalar_f64(v.clone()),
        Values::Int(v) => Column::scalar_i64(v.clone()),
        Values::Bool(v) => Column::scalar_bool(v.clone()),
    }
}

fn interleave(width: usize, count: usize, parts: &[&Values]) -> Column {
    match parts[0] {
        Values::Float(_) => {
            let slices: Vec<&[f64]> = parts
                .iter()
                .filter_map(|v| match v {
                    Values::Float(x) => Some(x.as_slice()),
                    _ => None,
                })
                .collect();
            Column::vector_f64(width, interleave_rows(count, &slices))
        }
        Values::Int(_) => {
            let slices: Vec<&[i64]> = parts
                .iter()
                .filter_map(|v| match v {
                    Values::Int(x) => Some(x.as_slice()),
                    _ => None,
                })
                .collect();
            Column::vector_i64(width, interleave_rows(count, &slices))
        }
        Values::Bool(_) => {
            let slices: Vec<&[bool]> = parts
                .iter()
                .filter_map(|v| match v {
                    Values::Bool(x) => Some(x.as_slice()),
                    _ => None,
                })
                .collect();
            Column::vector_bool(width, interleave_rows(count, &slices))
        }
    }
}

fn interleave_rows<T: Copy>(count: usize, slices: &[&[T]]) -> Vec<T> {
    let mut out = Vec::with_capacity(count * slices.len());
    for row in 0..count {
        for slice in slices {
            out.push(slice[row]);
        }
    }
    out
}

fn derive_phase_flags(pores: &mut ElementTable) -> Result<(), PoreNetError> {
    let Some(phase) = pores.maybe_scalar_i64(names::PHASE) else {
        return Ok(());
    };
    let phase1: Vec<bool> = phase.iter().map(|&p| p == 1).collect();
    let phase2: Vec<bool> = phase.iter().map(|&p| p == 2).collect();
    if !pores.contains(names::PHASE1) {
        pores.insert(names::PHASE1, Column::scalar_bool(phase1))?;
    }
    if !pores.contains(names::PHASE2) {
        pores.insert(names::PHASE2, Column::scalar_bool(phase2))?;
    }
    Ok(())
}

fn meta_from_attrs(table: &Table) -> Result<NetworkMeta, PoreNetError> {
    let extraction_algorithm = table.attrs.get(EXTRACTION_ATTR).cloned();
    let domain_size = match table.attrs.get(DOMAIN_ATTR) {
        Some(json) => Some(serde_json::from_str::<[f64; 3]>(json).map_err(|e| {
            PoreNetError::invalid_input(format!("{DOMAIN_ATTR}: {e}"))
        })?),
        None => None,
    };
    Ok(NetworkMeta {
        extraction_algorithm,
        domain_size,
    })
}

fn element_to_table(
    element: ElementKind,
    table: &ElementTable,
    name: &str,
    table_type: &str,
) -> Table {
    let prefix = element.prefix();
    let mut out = Table::new(name);
    out.attrs
        .insert(TABLE_TYPE_ATTR.to_string(), table_type.to_string());
    for (property, column) in table.iter() {
        if column.width() == 1 {
            out.columns
                .insert(format!("{prefix}{property}"), column.values().clone());
        } else {
            for part in 0..column.width() {
                out.columns.insert(
                    format!("{prefix}{property}_{part}"),
                    stride_part(column.values(), column.width(), part),
                );
            }
        }
    }
    out
}

fn stride_part(values: &Values, width: usize, part: usize) -> Values {
    match values {
        Values::Float(v) => Values::Float(strided(v, width, part)),
        Values::Int(v) => Values::Int(strided(v, width, part)),
        Values::Bool(v) => Values::Bool(strided(v, width, part)),
    }
}

fn strided<T: Copy>(values: &[T], width: usize, part: usize) -> Vec<T> {
    values.iter().skip(part).step_by(width).copied().collect()
}
