//! Input and output surfaces

pub mod formatter;
pub mod input;
pub mod session;

pub use formatter::{
    DESCRIPTION, Formatter, FormatterFactory, JsonFormatter, MarkdownFormatter, OutputFormat,
    TITLE, TextFormatter,
};
pub use input::InputError;
pub use session::Session;
