use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Document;

/// An invoice. Line items, parties and amounts live in `fields`.
///
/// Records written with the older `invoiceNumber` field name still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
#[document(kind = "invoice")]
pub struct Invoice {
    #[serde(default, alias = "invoiceNumber", skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A receipt. Same shape as [`Invoice`], stored under its own namespace.
///
/// Records written with the older `receiptNumber` field name still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
#[document(kind = "receipt")]
pub struct Receipt {
    #[serde(default, alias = "receiptNumber", skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

macro_rules! impl_record {
    ($record:ident) => {
        impl $record {
            /// An empty record with no number and no issue date.
            pub fn new() -> Self {
                Self::default()
            }

            /// A record carrying an explicit number.
            pub fn with_number(number: impl Into<String>) -> Self {
                Self {
                    document_number: Some(number.into()),
                    ..Self::default()
                }
            }

            /// Builder-style [`set_field`](Self::set_field).
            pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
                self.set_field(key, value);
                self
            }

            pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
                self.fields.insert(key.into(), value.into());
            }

            pub fn field(&self, key: &str) -> Option<&Value> {
                self.fields.get(key)
            }
        }
    };
}

impl_record!(Invoice);
impl_record!(Receipt);
