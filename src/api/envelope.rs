//! Purpose: Declare the request envelopes served over HTTP.
//! Exports: `DateTimeRequest`, `ListRequest`.
//! Role: Static binding of wire field names to codecs for each endpoint.
//! Invariants: Field names match the HTTP contract (`time_at`, `list`).

use crate::core::codec::CodecSet;
use crate::core::decode::{FieldReader, FieldWriter, RequestShape};
use crate::core::error::Error;
use crate::core::failure::FieldFailure;
use crate::core::list::DelimitedList;
use crate::core::timestamp::Timestamp;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateTimeRequest {
    pub time_at: Timestamp,
}

impl RequestShape for DateTimeRequest {
    const FIELDS: &'static [&'static str] = &["time_at"];

    fn decode(fields: &FieldReader<'_>, codecs: &CodecSet) -> Result<Self, FieldFailure> {
        Ok(Self {
            time_at: fields.read("time_at", &codecs.timestamp)?,
        })
    }

    fn encode(&self, fields: &mut FieldWriter, codecs: &CodecSet) -> Result<(), Error> {
        fields.write("time_at", &codecs.timestamp, &self.time_at)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListRequest {
    pub list: DelimitedList,
}

impl RequestShape for ListRequest {
    const FIELDS: &'static [&'static str] = &["list"];

    fn decode(fields: &FieldReader<'_>, codecs: &CodecSet) -> Result<Self, FieldFailure> {
        Ok(Self {
            list: fields.read("list", &codecs.list)?,
        })
    }

    fn encode(&self, fields: &mut FieldWriter, codecs: &CodecSet) -> Result<(), Error> {
        fields.write("list", &codecs.list, &self.list)
    }
}
