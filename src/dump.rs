//! JSON-lines persistence for pore-network records: one header line with the
//! element counts and metadata, then one line per column. The format is
//! line-oriented so partial files fail cleanly on load and dumps diff well
//! under version control.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::errors::PoreNetError;
use crate::network::{Column, NetworkMeta, PoreNetwork, Values};
use crate::schema::ElementKind;

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DumpRecord {
    Header {
        pore_count: usize,
        throat_count: usize,
        meta: NetworkMeta,
    },
    Column {
        element: ElementKind,
        name: String,
        width: usize,
        values: Values,
    },
}

pub fn dump_network_to_path<P: AsRef<Path>>(
    net: &PoreNetwork,
    path: P,
) -> Result<(), PoreNetError> {
    let file = File::create(path.as_ref())?;
    dump_network_to_writer(net, BufWriter::new(file))
}

pub fn dump_network_to_writer<W: Write>(
    net: &PoreNetwork,
    mut writer: W,
) -> Result<(), PoreNetError> {
    write_record(
        &mut writer,
        &DumpRecord::Header {
            pore_count: net.pore_count(),
            throat_count: net.throat_count(),
            meta: net.meta.clone(),
        },
    )?;
    for (element, table) in [
        (ElementKind::Pore, &net.pores),
        (ElementKind::Throat, &net.throats),
    ] {
        for (name, column) in table.iter() {
            write_record(
                &mut writer,
                &DumpRecord::Column {
                    element,
                    name: name.to_string(),
                    width: column.width(),
                    values: column.values().clone(),
                },
            )?;
        }
    }
    Ok(())
}

pub fn load_network_from_path<P: AsRef<Path>>(path: P) -> Result<PoreNetwork, PoreNetError> {
    let file = File::open(path.as_ref())?;
    load_network_from_reader(BufReader::new(file))
}

pub fn load_network_from_reader<R: BufRead>(reader: R) -> Result<PoreNetwork, PoreNetError> {
    let mut net: Option<PoreNetwork> = None;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: DumpRecord = serde_json::from_str(&line)
            .map_err(|e| PoreNetError::invalid_input(e.to_string()))?;
        match record {
            DumpRecord::Header {
                pore_count,
                throat_count,
                meta,
            } => {
                if net.is_some() {
                    return Err(PoreNetError::invalid_input("duplicate header record"));
                }
                let mut fresh = PoreNetwork::new(pore_count, throat_count);
                fresh.meta = meta;
                net = Some(fresh);
            }
            DumpRecord::Column {
                element,
                name,
                width,
                values,
            } => {
                let Some(net) = net.as_mut() else {
                    return Err(PoreNetError::invalid_input(format!(
                        "column record {name} before header"
                    )));
                };
                if width == 0 {
                    return Err(PoreNetError::invalid_input(format!(
                        "column {name}: zero width"
                    )));
                }
                let table = match element {
                    ElementKind::Pore => &mut net.pores,
                    ElementKind::Throat => &mut net.throats,
                };
                table.insert(name, column_from(width, values))?;
            }
        }
    }
    let net = net.ok_or_else(|| PoreNetError::invalid_input("missing header record"))?;
    net.validate()?;
    Ok(net)
}

fn column_from(width: usize, values: Values) -> Column {
    match (width, values) {
        (1, Values::Float(v)) => Column::scalar_f64(v),
        (1, Values::Int(v)) => Column::scalar_i64(v),
        (1, Values::Bool(v)) => Column::scalar_bool(v),
        (w, Values::Float(v)) => Column::vector_f64(w, v),
        (w, Values::Int(v)) => Column::vector_i64(w, v),
        (w, Values::Bool(v)) => Column::vector_bool(w, v),
    }
}

fn write_record<W: Write>(writer: &mut W, record: &DumpRecord) -> Result<(), PoreNetError> {
    serde_json::to_writer(&mut *writer, record)
        .map_err(|e| PoreNetError::invalid_input(e.to_string()))?;
    writer.write_all(b"\n")?;
    Ok(())
}
