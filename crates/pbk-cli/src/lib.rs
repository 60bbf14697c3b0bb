//! Library components of the `pbk2dicom` command line tool.

pub mod logging;
pub mod sinks;
