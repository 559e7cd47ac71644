//! OData v4 adapter family

use super::AdapterVersion;

family_adapter!(
    /// Adapter for services reporting 4.0
    ODataAdapterV4,
    AdapterVersion::V4
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::adapter::{ODataAdapter, deferred_batch_writer_for};
    use crate::api::naming::NameMatcher;
    use std::sync::Arc;
    use crate::api::metadata::CsdlParser;
    use crate::api::test_fixtures::V4_METADATA;

    fn adapter() -> Arc<dyn ODataAdapter> {
        Arc::new(
            ODataAdapterV4::from_document("4.0", V4_METADATA, &CsdlParser, NameMatcher::default())
                .unwrap(),
        )
    }

    #[test]
    fn test_adapter_binds_resolver_to_document() {
        let adapter = adapter();
        assert_eq!(adapter.adapter_version(), AdapterVersion::V4);
        assert_eq!(adapter.protocol_version(), "4.0");

        let metadata = adapter.metadata();
        assert_eq!(metadata.resolve_entity_type_name("Products/Book").unwrap(), "Book");
        assert_eq!(metadata.resolve_function_name("GetBestSellers").unwrap(), "GetBestSellers");
    }

    #[test]
    fn test_request_writer_uses_odata_version_headers() {
        let adapter = adapter();
        let writer = adapter.request_writer(deferred_batch_writer_for(adapter.clone()));

        assert_eq!(
            writer.request_headers(),
            vec![
                ("OData-Version", "4.0".to_string()),
                ("OData-MaxVersion", "4.0".to_string()),
                ("Accept", "application/json;odata.metadata=minimal".to_string()),
            ]
        );
        assert!(!writer.has_batch());
    }

    #[test]
    fn test_each_batch_writer_gets_its_own_boundary() {
        let adapter = adapter();
        assert_ne!(
            adapter.batch_writer().boundary(),
            adapter.batch_writer().boundary()
        );
    }
}
