//! Conversion of output datasets into `dicom` objects and Part 10 files.

use std::path::Path;

use dicom::core::value::DataSetSequence;
use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use pbk_model::tags::{SOP_CLASS_UID, SOP_INSTANCE_UID};
use pbk_model::{Dataset, EXPLICIT_VR_LITTLE_ENDIAN, Element, Tag, Value, Vr};
use tracing::debug;

use crate::error::{EncodeError, Result};

/// Implementation class written to the file meta group.
pub const IMPLEMENTATION_CLASS_UID: &str = "1.2.826.0.1.3680043.8.498.1";
pub const IMPLEMENTATION_VERSION_NAME: &str = "PBK2DICOM";

type InMemElement = DataElement<InMemDicomObject>;

/// Converts a dataset, sequences included, into an in-memory object.
pub fn to_dicom_object(dataset: &Dataset) -> InMemDicomObject {
    InMemDicomObject::from_element_iter(dataset.iter().map(to_element))
}

/// Converts a dataset and attaches the file meta group built from its SOP
/// class and instance identifiers.
pub fn encode(dataset: &Dataset) -> Result<FileDicomObject<InMemDicomObject>> {
    let sop_class_uid = identifier(dataset, SOP_CLASS_UID)?;
    let sop_instance_uid = identifier(dataset, SOP_INSTANCE_UID)?;
    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
        .media_storage_sop_class_uid(sop_class_uid)
        .media_storage_sop_instance_uid(sop_instance_uid)
        .implementation_class_uid(IMPLEMENTATION_CLASS_UID)
        .implementation_version_name(IMPLEMENTATION_VERSION_NAME);
    to_dicom_object(dataset)
        .with_meta(meta)
        .map_err(|source| EncodeError::Meta {
            sop_instance_uid: sop_instance_uid.to_string(),
            source: Box::new(source),
        })
}

/// Encodes a dataset and writes it as a Part 10 file at `path`.
pub fn write_part10(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = encode(dataset)?;
    file.write_to_file(path)
        .map_err(|source| EncodeError::Write {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
    debug!(path = %path.display(), elements = dataset.len(), "wrote part 10 file");
    Ok(())
}

fn identifier(dataset: &Dataset, tag: Tag) -> Result<&str> {
    dataset
        .text(tag)
        .filter(|uid| !uid.is_empty())
        .ok_or(EncodeError::MissingIdentifier { tag })
}

fn to_element(element: &Element) -> InMemElement {
    let tag = dicom::core::Tag(element.tag.0, element.tag.1);
    let vr = to_vr(element.vr);
    match &element.value {
        Value::Sequence(items) => {
            let items: Vec<InMemDicomObject> = items.iter().map(to_dicom_object).collect();
            DataElement::new(tag, VR::SQ, DataSetSequence::from(items))
        }
        Value::Empty if element.vr == Vr::SQ => {
            DataElement::new(tag, VR::SQ, DataSetSequence::<InMemDicomObject>::empty())
        }
        value => DataElement::new(tag, vr, to_primitive(value)),
    }
}

fn to_primitive(value: &Value) -> PrimitiveValue {
    match value {
        Value::Empty | Value::Sequence(_) => PrimitiveValue::Empty,
        Value::Text(values) => PrimitiveValue::Strs(values.iter().cloned().collect()),
        Value::U16(values) => PrimitiveValue::U16(values.iter().copied().collect()),
        Value::I16(values) => PrimitiveValue::I16(values.iter().copied().collect()),
        Value::U32(values) => PrimitiveValue::U32(values.iter().copied().collect()),
        Value::F32(values) => PrimitiveValue::F32(values.iter().copied().collect()),
        Value::F64(values) => PrimitiveValue::F64(values.iter().copied().collect()),
        Value::Bytes(bytes) => PrimitiveValue::U8(bytes.iter().copied().collect()),
        Value::Tags(tags) => PrimitiveValue::Tags(
            tags.iter()
                .map(|tag| dicom::core::Tag(tag.0, tag.1))
                .collect(),
        ),
    }
}

fn to_vr(vr: Vr) -> VR {
    match vr {
        Vr::AE => VR::AE,
        Vr::AS => VR::AS,
        Vr::AT => VR::AT,
        Vr::CS => VR::CS,
        Vr::DA => VR::DA,
        Vr::DS => VR::DS,
        Vr::DT => VR::DT,
        Vr::FD => VR::FD,
        Vr::FL => VR::FL,
        Vr::IS => VR::IS,
        Vr::LO => VR::LO,
        Vr::LT => VR::LT,
        Vr::OB => VR::OB,
        Vr::OW => VR::OW,
        Vr::PN => VR::PN,
        Vr::SH => VR::SH,
        Vr::SQ => VR::SQ,
        Vr::SS => VR::SS,
        Vr::ST => VR::ST,
        Vr::TM => VR::TM,
        Vr::UI => VR::UI,
        Vr::UL => VR::UL,
        Vr::US => VR::US,
    }
}
