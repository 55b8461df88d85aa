use crate::render::RenderTable;
use crate::util::rw::WriteHandle;

use super::model::{Error, OutputType, TableWriter};

/// Writes tables as CSV, one after the other. Notes and errors are not
/// part of the data, so they go to the error stream.
pub struct CsvWriter {
    w: WriteHandle,
    err_w: WriteHandle,
}

impl CsvWriter {
    pub fn new(w: WriteHandle, err_w: WriteHandle) -> CsvWriter {
        CsvWriter { w, err_w }
    }
}

impl TableWriter for CsvWriter {
    fn print_render_table(
        &mut self,
        _out_type: OutputType,
        _name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        for err in &table_model.errors {
            crate::write_errln!(self.err_w, "[!] {}", err);
        }

        let mut csv_w = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(self.w.clone());

        csv_w
            .write_record(&table_model.header)
            .map_err(|e| e.to_string())?;
        for row in &table_model.rows {
            csv_w.write_record(row).map_err(|e| e.to_string())?;
        }
        csv_w.flush().map_err(|e| e.to_string())?;

        for note in &table_model.notes {
            crate::write_errln!(self.err_w, "{}", note);
        }
        Ok(())
    }
}
