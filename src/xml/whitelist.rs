use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::SzamlaError;

/// Schema version label of the built-in whitelist.
pub const OSA_3_0: &str = "OSA 3.0";

/// Element names that always decode to a list, even when they occur once.
///
/// The set belongs to a schema version: a new schema release that turns a
/// field into a repeatable one needs a new whitelist document, not a code
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayWhitelist {
    schema_version: String,
    tags: BTreeSet<String>,
}

impl ArrayWhitelist {
    pub fn new<I, S>(schema_version: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema_version: schema_version.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Repeatable elements of the NAV Online Invoice 3.0 data schema.
    pub fn osa_3_0() -> Self {
        Self::new(OSA_3_0, OSA_3_0_TAGS.iter().copied())
    }

    /// Parse a `{ "schemaVersion": ..., "tags": [...] }` document.
    pub fn from_json_str(json: &str) -> Result<Self, SzamlaError> {
        serde_json::from_str(json)
            .map_err(|e| SzamlaError::Settings(format!("invalid array whitelist: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SzamlaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SzamlaError::Settings(format!("cannot read {}: {e}", path.display())))?;
        let whitelist = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            schema_version = %whitelist.schema_version,
            tags = whitelist.tags.len(),
            "Loaded array whitelist"
        );
        Ok(whitelist)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for ArrayWhitelist {
    fn default() -> Self {
        Self::osa_3_0()
    }
}

/// Sorted for readability; lookups go through the `BTreeSet`.
static OSA_3_0_TAGS: &[&str] = &[
    "additionalInvoiceData",
    "additionalLineData",
    "batchInvoice",
    "contractNumber",
    "costCenter",
    "customerCompanyCode",
    "dealerCode",
    "deliveryNote",
    "ekaerId",
    "generalLedgerAccountNumber",
    "glnNumber",
    "itemNumber",
    "line",
    "lineProductFeeContent",
    "materialNumber",
    "orderNumber",
    "productCode",
    "productFeeData",
    "productFeeSummary",
    "projectNumber",
    "referenceToOtherLine",
    "shippingDate",
    "summaryByVatRate",
    "summarySimplified",
    "supplierCompanyCode",
];
