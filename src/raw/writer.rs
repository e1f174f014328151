use crate::{
    Bson,
    bson::{DbPointer, JavaScriptCodeWithScope, Regex},
    error::{Error, Result},
    spec::BinarySubtype,
};

/// Appends elements to an encoded document in place, keeping its length prefix and terminator
/// consistent.
pub(crate) struct RawWriter<'a> {
    data: &'a mut Vec<u8>,
}

impl<'a> RawWriter<'a> {
    /// `data` must hold a complete, terminated document.
    pub(crate) fn new(data: &'a mut Vec<u8>) -> Self {
        Self { data }
    }

    pub(crate) fn append(&mut self, key: &str, value: &Bson) -> Result<()> {
        let original_len = self.data.len();
        // the terminator becomes the new element's type tag
        self.data.truncate(original_len - 1);

        if let Err(e) = write_element(self.data, key, value) {
            self.data.truncate(original_len - 1);
            self.data.push(0);
            return Err(e);
        }

        self.data.push(0);
        if let Err(e) = write_length(self.data, 0) {
            self.data.truncate(original_len - 1);
            self.data.push(0);
            return Err(e);
        }
        Ok(())
    }
}

/// Overwrites the four bytes at `at` with the length of everything from `at` onwards.
pub(crate) fn write_length(data: &mut [u8], at: usize) -> Result<()> {
    let len = i32::try_from(data.len() - at).map_err(|_| {
        Error::invalid_value(format!(
            "document of {} bytes exceeds the maximum BSON size",
            data.len() - at
        ))
    })?;
    data[at..at + 4].copy_from_slice(&len.to_le_bytes());
    Ok(())
}

pub(crate) fn write_cstring(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    if s.contains('\0') {
        return Err(Error::invalid_value(format!(
            "cstring with interior null: {:?}",
            s
        )));
    }
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    Ok(())
}

pub(crate) fn write_string(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = i32::try_from(s.len() + 1)
        .map_err(|_| Error::invalid_value("string exceeds the maximum BSON size"))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    Ok(())
}

/// Writes a complete element: type tag, key and payload.
pub(crate) fn write_element(buf: &mut Vec<u8>, key: &str, value: &Bson) -> Result<()> {
    buf.push(value.element_type() as u8);
    write_cstring(buf, key)?;
    write_value(buf, value)
}

/// Writes the payload of `value` with no type tag or key.
pub(crate) fn write_value(buf: &mut Vec<u8>, value: &Bson) -> Result<()> {
    match value {
        Bson::Double(f) => buf.extend_from_slice(&f.to_le_bytes()),
        Bson::String(s) | Bson::JavaScriptCode(s) | Bson::Symbol(s) => write_string(buf, s)?,
        Bson::Array(values) => write_array(buf, values)?,
        Bson::Document(doc) => buf.extend_from_slice(doc.as_bytes()),
        Bson::Boolean(b) => buf.push(u8::from(*b)),
        Bson::RegularExpression(Regex { pattern, options }) => {
            write_cstring(buf, pattern)?;
            write_cstring(buf, options)?;
        }
        Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope }) => {
            let start = buf.len();
            buf.extend_from_slice(&[0; 4]);
            write_string(buf, code)?;
            buf.extend_from_slice(scope.as_bytes());
            write_length(buf, start)?;
        }
        Bson::Int32(i) => buf.extend_from_slice(&i.to_le_bytes()),
        Bson::Int64(i) => buf.extend_from_slice(&i.to_le_bytes()),
        Bson::Timestamp(ts) => {
            buf.extend_from_slice(&ts.increment.to_le_bytes());
            buf.extend_from_slice(&ts.time.to_le_bytes());
        }
        Bson::Binary(binary) => {
            let bytes = binary.bytes();
            let old = binary.subtype() == BinarySubtype::BinaryOld;
            let total = if old { bytes.len() + 4 } else { bytes.len() };
            let total = i32::try_from(total)
                .map_err(|_| Error::invalid_value("binary exceeds the maximum BSON size"))?;
            buf.extend_from_slice(&total.to_le_bytes());
            buf.push(binary.subtype().into());
            if old {
                buf.extend_from_slice(&(total - 4).to_le_bytes());
            }
            buf.extend_from_slice(bytes);
        }
        Bson::ObjectId(oid) => buf.extend_from_slice(&oid.bytes()),
        Bson::DateTime(dt) => buf.extend_from_slice(&dt.timestamp_millis().to_le_bytes()),
        Bson::Decimal128(d) => buf.extend_from_slice(&d.bytes()),
        Bson::DbPointer(DbPointer { namespace, id }) => {
            write_string(buf, namespace)?;
            buf.extend_from_slice(&id.bytes());
        }
        Bson::Null | Bson::Undefined | Bson::MinKey | Bson::MaxKey => {}
    }
    Ok(())
}

fn write_array(buf: &mut Vec<u8>, values: &[Bson]) -> Result<()> {
    let start = buf.len();
    buf.extend_from_slice(&[0; 4]);
    for (index, value) in values.iter().enumerate() {
        write_element(buf, &index.to_string(), value).map_err(|e| e.with_index(index))?;
    }
    buf.push(0);
    write_length(buf, start)
}
