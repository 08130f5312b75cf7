//! SFDMU import object descriptors

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::normalize::ID_COLUMN;

/// Operation every generated object uses
pub const INSERT_OPERATION: &str = "Insert";

/// One entry of the `objects` list in export.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDescriptor {
    pub query: String,
    pub operation: String,
    pub external_id: String,
}

impl ImportDescriptor {
    /// Build the descriptor for a data file from its normalized header
    ///
    /// The query always starts with `Id`, so a header that already has an
    /// `Id` column produces `SELECT Id, ..., Id, ...`. The repeat is kept.
    pub fn from_header<S: AsRef<str>>(file_name: &str, header: &[S]) -> Self {
        let columns: Vec<&str> = header.iter().map(AsRef::as_ref).collect();

        Self {
            query: format!(
                "SELECT {}, {} FROM {}",
                ID_COLUMN,
                columns.join(", "),
                object_name(file_name)
            ),
            operation: INSERT_OPERATION.to_string(),
            external_id: ID_COLUMN.to_string(),
        }
    }
}

/// sObject name for a data file: the file name without its last extension
///
/// `Account.csv` -> `Account`, `Custom.Object.csv` -> `Custom.Object`.
/// A leading dot is not treated as an extension.
pub fn object_name(file_name: &str) -> String {
    Path::new(file_name)
        .with_extension("")
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_descriptor() {
        let descriptor = ImportDescriptor::from_header("Account.csv", &["Name", "Id", "Amount"]);
        assert_eq!(
            descriptor,
            ImportDescriptor {
                query: "SELECT Id, Name, Id, Amount FROM Account".to_string(),
                operation: "Insert".to_string(),
                external_id: "Id".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_id_in_query() {
        // Header already normalized to contain Id; the leading Id is still added
        let descriptor = ImportDescriptor::from_header("Contact.csv", &["Id", "LastName"]);
        assert_eq!(descriptor.query, "SELECT Id, Id, LastName FROM Contact");
        assert_eq!(descriptor.query.matches("Id").count(), 2);
    }

    #[test]
    fn test_header_without_id() {
        let header = vec!["Name".to_string(), "Company".to_string()];
        let descriptor = ImportDescriptor::from_header("Lead.csv", &header);
        assert_eq!(descriptor.query, "SELECT Id, Name, Company FROM Lead");
    }

    #[test]
    fn test_serialized_field_names() {
        let descriptor = ImportDescriptor::from_header("Account.csv", &["Name"]);
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "query": "SELECT Id, Name FROM Account",
                "operation": "Insert",
                "externalId": "Id"
            })
        );
    }

    #[test]
    fn test_object_name() {
        assert_eq!(object_name("Account.csv"), "Account");
        assert_eq!(object_name("Custom.Object.csv"), "Custom.Object");
        assert_eq!(object_name("NoExtension"), "NoExtension");
        assert_eq!(object_name(".csv"), ".csv");
        assert_eq!(object_name("Namespace__Thing__c.csv"), "Namespace__Thing__c");
    }
}
