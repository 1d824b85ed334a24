mod document;

use proc_macro::TokenStream;

/// Derive macro for implementing the `Document` trait.
///
/// # Usage
///
/// ```ignore
/// use folio::Document;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(kind = "receipt")]
/// pub struct DonationReceipt {
///     #[document(number)]
///     pub receipt_no: Option<String>,
///     pub date_issued: Option<String>,
///     pub donor: String,
///     pub amount: u64,
/// }
/// ```
///
/// - `#[document(kind = "...")]` selects `"invoice"` or `"receipt"`.
///   If omitted, the snake_case struct name is used.
/// - `#[document(number)]` marks the `Option<String>` field holding the
///   document number. If omitted, defaults to a field named `document_number`.
/// - `#[document(date_issued)]` marks the `Option<String>` issue date field.
///   If omitted, defaults to a field named `date_issued`.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
