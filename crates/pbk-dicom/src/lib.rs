//! Part 10 encoding of output datasets.
//!
//! Converts the encoder-neutral [`Dataset`](pbk_model::Dataset) of the
//! builders into an in-memory object of the `dicom` crate, adds the file meta
//! group and writes it with explicit VR little endian transfer syntax.
//!
//! # Example
//!
//! ```ignore
//! use pbk_dicom::write_part10;
//!
//! write_part10(&dataset, "out/CT_001.1.2.3.dcm")?;
//! ```

mod encode;
mod error;

pub use encode::{
    IMPLEMENTATION_CLASS_UID, IMPLEMENTATION_VERSION_NAME, encode, to_dicom_object, write_part10,
};
pub use error::{EncodeError, EncoderError, Result};
