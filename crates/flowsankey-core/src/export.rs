//! Tabular export of the last built graph.

use crate::graph::FlowGraph;
use crate::locale::{Localizer, NumberFormat};

pub const CSV_FILENAME: &str = "data.csv";
pub const CSV_HEADER: [&str; 4] = ["origin", "destination", "amount", "composition"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: &'static str,
    pub text: String,
}

/// One row per link: origin label, destination label (or "Stock"), localized amount with
/// unit, flattened composition. Tab separated, CRLF terminated; fields containing tabs,
/// quotes or line breaks are quoted.
pub fn graph_to_csv(
    graph: &FlowGraph,
    localizer: &dyn Localizer,
    numbers: NumberFormat,
) -> crate::Result<CsvExport> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    let header = CSV_HEADER.map(|h| localizer.gettext(h));
    wtr.write_record(header.iter().map(|h| h.as_bytes()))?;

    let stock_label = localizer.gettext("Stock");
    for link in &graph.links {
        let origin = graph.source_of(link).name.as_str();
        let destination = if link.is_stock {
            stock_label.as_ref()
        } else {
            graph.target_of(link).name.as_str()
        };
        let amount = format!("{} {}", numbers.format(link.value), link.units);
        wtr.write_record([origin, destination, amount.as_str(), link.composition.as_str()])?;
    }

    let bytes = wtr.into_inner().map_err(|err| err.into_error())?;
    Ok(CsvExport {
        filename: CSV_FILENAME,
        text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
