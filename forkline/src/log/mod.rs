//! Session log reading.

mod line;
mod reader;

pub use line::{is_root_sentinel, LogLine};
pub use reader::{parse_session_lines, read_raw_records, read_session_record, RecordBuilder};
