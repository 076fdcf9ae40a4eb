//! Typed business keys for ERP records.
//!
//! The ERP replica identifies invoices, customers and vendors by their
//! document and account numbers. Wrapping them prevents accidentally passing
//! a party number where an invoice number is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed key wrappers.
macro_rules! business_key {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a key, trimming the padding the ERP leaves on fixed-width columns.
            #[must_use]
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(value.as_ref().trim().to_string())
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

business_key!(InvoiceNo, "Invoice (document) number.");
business_key!(PartyNo, "Customer or vendor account number.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
