use crate::render::RenderTable;

pub enum OutputType {
    Rates,
    AllRates,
    Sales,
}

pub type Error = String;

pub trait TableWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error>;
}
