//! Single-or-batch request bodies

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// A write request carrying one record or an ordered batch
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: DeserializeOwned + Validate> Submission<T> {
    /// Parse and validate a JSON body. A batch is accepted only if every
    /// element is valid.
    pub fn parse(payload: Value) -> AppResult<Self> {
        match payload {
            Value::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    parse_record(value)
                        .map_err(|reason| AppError::Validation(format!("record {}: {}", index, reason)))
                })
                .collect::<AppResult<Vec<T>>>()
                .map(Submission::Many),
            value => parse_record(value)
                .map(Submission::One)
                .map_err(AppError::Validation),
        }
    }
}

impl<T> Submission<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            Submission::One(record) => vec![record],
            Submission::Many(records) => records,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Submission::Many(_))
    }
}

fn parse_record<T: DeserializeOwned + Validate>(value: Value) -> Result<T, String> {
    let record: T = serde_json::from_value(value).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}

/// Created record(s), shaped like the submission that produced them
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Created<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Created<T> {
    /// Reshape stored records to match a submission
    pub fn shaped(batch: bool, mut records: Vec<T>) -> Option<Self> {
        if batch {
            Some(Created::Many(records))
        } else {
            records.pop().map(Created::One)
        }
    }
}
