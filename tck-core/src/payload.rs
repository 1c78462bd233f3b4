//! Sparkplug B payload schema and decoders.
//!
//! The protobuf messages are derived by hand with `prost` rather than
//! generated from the `.proto` file. Only the fields the monitor inspects
//! are declared; prost skips unknown fields (metadata, property sets,
//! template parameters, extensions) while decoding.
//!
//! Host application STATE payloads are JSON and decode into
//! [`StatePayload`].

use serde::{Deserialize, Serialize};

use crate::constants::REBIRTH_METRIC;
use crate::errors::TckError;

/// Top-level Sparkplug B payload.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Payload {
    #[prost(uint64, optional, tag = "1")]
    pub timestamp: Option<u64>,
    #[prost(message, repeated, tag = "2")]
    pub metrics: Vec<Metric>,
    #[prost(uint64, optional, tag = "3")]
    pub seq: Option<u64>,
    #[prost(string, optional, tag = "4")]
    pub uuid: Option<String>,
    #[prost(bytes = "vec", optional, tag = "5")]
    pub body: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Metric {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(uint64, optional, tag = "2")]
    pub alias: Option<u64>,
    #[prost(uint64, optional, tag = "3")]
    pub timestamp: Option<u64>,
    #[prost(uint32, optional, tag = "4")]
    pub datatype: Option<u32>,
    #[prost(bool, optional, tag = "5")]
    pub is_historical: Option<bool>,
    #[prost(bool, optional, tag = "6")]
    pub is_transient: Option<bool>,
    #[prost(bool, optional, tag = "7")]
    pub is_null: Option<bool>,
    #[prost(oneof = "metric::Value", tags = "10, 11, 12, 13, 14, 15, 16, 17, 18")]
    pub value: Option<metric::Value>,
}

pub mod metric {
    /// Metric value (oneof).
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        #[prost(uint32, tag = "10")]
        IntValue(u32),
        #[prost(uint64, tag = "11")]
        LongValue(u64),
        #[prost(float, tag = "12")]
        FloatValue(f32),
        #[prost(double, tag = "13")]
        DoubleValue(f64),
        #[prost(bool, tag = "14")]
        BooleanValue(bool),
        #[prost(string, tag = "15")]
        StringValue(String),
        #[prost(bytes = "vec", tag = "16")]
        BytesValue(Vec<u8>),
        #[prost(message, tag = "17")]
        DatasetValue(super::DataSet),
        #[prost(message, tag = "18")]
        TemplateValue(super::Template),
    }
}

/// A template definition (`is_definition = true`) or instance.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Template {
    #[prost(string, optional, tag = "1")]
    pub version: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub metrics: Vec<Metric>,
    #[prost(string, optional, tag = "4")]
    pub template_ref: Option<String>,
    #[prost(bool, optional, tag = "5")]
    pub is_definition: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DataSet {
    #[prost(uint64, optional, tag = "1")]
    pub num_of_columns: Option<u64>,
    #[prost(string, repeated, tag = "2")]
    pub columns: Vec<String>,
    #[prost(uint32, repeated, packed = "false", tag = "3")]
    pub types: Vec<u32>,
    #[prost(message, repeated, tag = "4")]
    pub rows: Vec<Row>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Row {
    #[prost(message, repeated, tag = "1")]
    pub elements: Vec<DataSetValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DataSetValue {
    #[prost(oneof = "data_set_value::Value", tags = "1, 2, 3, 4, 5, 6")]
    pub value: Option<data_set_value::Value>,
}

pub mod data_set_value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        #[prost(uint32, tag = "1")]
        IntValue(u32),
        #[prost(uint64, tag = "2")]
        LongValue(u64),
        #[prost(float, tag = "3")]
        FloatValue(f32),
        #[prost(double, tag = "4")]
        DoubleValue(f64),
        #[prost(bool, tag = "5")]
        BooleanValue(bool),
        #[prost(string, tag = "6")]
        StringValue(String),
    }
}

/// Sparkplug B metric datatypes (`Metric.datatype` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataType {
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    UInt8 = 5,
    UInt16 = 6,
    UInt32 = 7,
    UInt64 = 8,
    Float = 9,
    Double = 10,
    Boolean = 11,
    String = 12,
    DateTime = 13,
    Text = 14,
    Uuid = 15,
    DataSet = 16,
    Bytes = 17,
    File = 18,
    Template = 19,
    PropertySet = 20,
    PropertySetList = 21,
    Int8Array = 22,
    Int16Array = 23,
    Int32Array = 24,
    Int64Array = 25,
    UInt8Array = 26,
    UInt16Array = 27,
    UInt32Array = 28,
    UInt64Array = 29,
    FloatArray = 30,
    DoubleArray = 31,
    BooleanArray = 32,
    StringArray = 33,
    DateTimeArray = 34,
}

impl DataType {
    /// Map a wire code to a datatype. `0` (Unknown) and codes past the end
    /// of the table are not valid metric datatypes.
    pub fn from_code(code: u32) -> Option<Self> {
        use DataType::*;
        const TABLE: [DataType; 34] = [
            Int8, Int16, Int32, Int64, UInt8, UInt16, UInt32, UInt64, Float, Double, Boolean,
            String, DateTime, Text, Uuid, DataSet, Bytes, File, Template, PropertySet,
            PropertySetList, Int8Array, Int16Array, Int32Array, Int64Array, UInt8Array,
            UInt16Array, UInt32Array, UInt64Array, FloatArray, DoubleArray, BooleanArray,
            StringArray, DateTimeArray,
        ];
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        TABLE.get(index).copied()
    }

    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl Payload {
    /// First metric named `name`.
    pub fn find_metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name.as_deref() == Some(name))
    }

    /// A rebirth request addressed to an edge node (NCMD payload).
    pub fn rebirth_command(timestamp_ms: u64) -> Self {
        Payload {
            timestamp: Some(timestamp_ms),
            metrics: vec![Metric::boolean(REBIRTH_METRIC, true, timestamp_ms)],
            ..Default::default()
        }
    }
}

impl Metric {
    /// A named Boolean metric.
    pub fn boolean(name: &str, value: bool, timestamp_ms: u64) -> Self {
        Metric {
            name: Some(name.to_owned()),
            timestamp: Some(timestamp_ms),
            datatype: Some(DataType::Boolean.code()),
            value: Some(metric::Value::BooleanValue(value)),
            ..Default::default()
        }
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.datatype.and_then(DataType::from_code)
    }

    /// Integer value of the metric, whichever integer field carries it.
    pub fn integer_value(&self) -> Option<u64> {
        match self.value {
            Some(metric::Value::IntValue(v)) => Some(u64::from(v)),
            Some(metric::Value::LongValue(v)) => Some(v),
            _ => None,
        }
    }

    pub fn boolean_value(&self) -> Option<bool> {
        match self.value {
            Some(metric::Value::BooleanValue(v)) => Some(v),
            _ => None,
        }
    }

    pub fn template(&self) -> Option<&Template> {
        match &self.value {
            Some(metric::Value::TemplateValue(t)) => Some(t),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&DataSet> {
        match &self.value {
            Some(metric::Value::DatasetValue(d)) => Some(d),
            _ => None,
        }
    }

    /// `true` unless the metric is flagged historical.
    pub fn is_current(&self) -> bool {
        !self.is_historical.unwrap_or(false)
    }
}

/// Decodes raw bytes claimed to be a Sparkplug B payload.
///
/// The engine is handed a decoder rather than calling prost directly so a
/// host integration can substitute its own (e.g. one that also understands
/// vendor extensions).
pub trait PayloadDecoder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TckError::Decode`] if `bytes` is not a valid payload.
    fn decode(&self, bytes: &[u8]) -> Result<Payload, TckError>;
}

/// Protobuf decoder for the Sparkplug B schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufDecoder;

impl PayloadDecoder for ProtobufDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Payload, TckError> {
        Ok(<Payload as prost::Message>::decode(bytes)?)
    }
}

/// Host application STATE payload.
///
/// All fields are optional so that a payload missing one of them still
/// decodes and the omission is reported as a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatePayload {
    pub online: Option<bool>,
    #[serde(rename = "bdSeq")]
    pub bd_seq: Option<i64>,
    pub timestamp: Option<i64>,
}

impl StatePayload {
    /// # Errors
    ///
    /// Returns [`TckError::Decode`] if `bytes` is not a JSON object of the
    /// expected shape.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TckError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// `bdSeq` narrowed to the counter range, if present and in range.
    pub fn bd_seq_u8(&self) -> Option<u8> {
        self.bd_seq.and_then(|v| u8::try_from(v).ok())
    }

    /// `timestamp` as unsigned milliseconds, if present and non-negative.
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.timestamp.and_then(|v| u64::try_from(v).ok())
    }

    /// `true` when all three keys are present and in range.
    pub fn is_well_formed(&self) -> bool {
        self.online.is_some() && self.bd_seq_u8().is_some() && self.timestamp_ms().is_some()
    }
}
