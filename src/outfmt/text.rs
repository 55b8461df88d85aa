use std::io::Write;

use tabled::settings::{object::{Columns, Rows}, Alignment, Style};

use crate::{render::RenderTable, util::rw::WriteHandle};

use super::model::{Error, OutputType, TableWriter};

pub struct TextWriter {
    w: WriteHandle,
}

impl TextWriter {
    pub fn new(w: WriteHandle) -> TextWriter {
        TextWriter { w }
    }
}

impl TableWriter for TextWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        let map_write_err = |e| format!("{e}");

        for err in &table_model.errors {
            writeln!(self.w, "[!] {}", err).map_err(map_write_err)?;
        }

        let title = match out_type {
            OutputType::Rates => format!("{} Rates", name),
            OutputType::AllRates => "All Rates".to_string(),
            OutputType::Sales => format!("Sales in {}", name),
        };
        writeln!(self.w, "{}", title).map_err(map_write_err)?;

        let mut table_bldr = tabled::builder::Builder::default();
        table_bldr.push_record(
            table_model.header.iter().map(|h| h.to_uppercase()).collect::<Vec<String>>(),
        );
        for row in &table_model.rows {
            table_bldr.push_record(row);
        }

        let mut table = table_bldr.build();
        table.with(Style::ascii());
        // Numbers line up better on the right. The date/file column stays left.
        table.modify(Columns::new(1..), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(self.w, "{table}").map_err(map_write_err)?;

        for note in &table_model.notes {
            writeln!(self.w, "{note}").map_err(map_write_err)?;
        }
        writeln!(self.w).map_err(map_write_err)?;
        Ok(())
    }
}
