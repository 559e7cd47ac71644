//! OData v1-v3 adapter family

use super::AdapterVersion;

family_adapter!(
    /// Adapter for services reporting 1.0, 2.0 or 3.0
    ODataAdapterV3,
    AdapterVersion::V3
);
