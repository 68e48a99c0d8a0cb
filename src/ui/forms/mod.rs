//! Form rendering

mod field_renderer;
mod invoice_form;

pub use invoice_form::draw_invoice_form;
